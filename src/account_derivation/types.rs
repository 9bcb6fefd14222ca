use anchor_lang::prelude::*;

#[derive(Clone)]
pub struct ProgramIds {
    pub token_program: Pubkey,
}

impl Default for ProgramIds {
    fn default() -> Self {
        Self {
            token_program: anchor_spl::token::ID,
        }
    }
}

/// PDA种子常量 - 用于账户推导
pub mod pda_seeds {
    // 路由器自身 PDA
    pub const CONFIG: &[u8] = b"config";
    pub const ESCROW: &[u8] = b"escrow";
    pub const DELEGATE: &[u8] = b"delegate";

    // 注册表程序下的池记录: [POOL_RECORD, pool_state]
    pub const POOL_RECORD: &[u8] = b"pool";
}

/// 指令选择器常量 - 用于构造池子 CPI 调用
/// sha256("global:<name>")[..8]
pub mod instruction_discriminators {
    pub const QUOTE_BUY: &[u8; 8] = &[83, 9, 231, 110, 146, 31, 40, 12];
    pub const QUOTE_SELL: &[u8; 8] = &[5, 178, 49, 206, 140, 231, 131, 145];
    pub const SWAP_BUY: &[u8; 8] = &[76, 98, 154, 93, 42, 113, 62, 139];
    pub const BEGIN_SELL: &[u8; 8] = &[131, 165, 105, 158, 217, 111, 26, 197];
    pub const COMPLETE_SELL: &[u8; 8] = &[155, 155, 112, 18, 14, 173, 31, 127];
}

/// 账户数据布局
pub mod layout {
    /// sha256("account:PoolRecord")[..8]
    pub const POOL_RECORD_DISCRIMINATOR: &[u8; 8] = &[117, 217, 136, 145, 181, 104, 107, 17];
    // discriminator(8) + pool(32) + variant(1)
    pub const POOL_RECORD_LEN: usize = 8 + 32 + 1;

    /// 池子账户: discriminator 之后第一个字节是 variant tag
    pub const POOL_VARIANT_OFFSET: usize = 8;

    // 报价返回: status(1) + amount(8)
    pub const QUOTE_RETURN_LEN: usize = 1 + 8;
}
