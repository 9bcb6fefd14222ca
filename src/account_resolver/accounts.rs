use anchor_lang::prelude::*;

/// 每条腿固定在前面的账户数
pub const LEG_FIXED_ACCOUNT_COUNT: usize = 3;

/// 单条腿的账户块
/// 对应客户端传递顺序: [pool_program, pool_state, registry_record, extras...]
#[derive(Clone, Debug)]
pub struct LegAccounts<'info> {
    pub pool_program: &'info AccountInfo<'info>,    // 1. 池子程序
    pub pool_state: &'info AccountInfo<'info>,      // 2. 池地址 (leg.pool)
    pub registry_record: &'info AccountInfo<'info>, // 3. 注册表里的池记录
    pub extras: &'info [AccountInfo<'info>],        // 4.. 池子自定义账户, 原样转发给 CPI

    // 注意: 以下账户不在块里，由路由器提供：
    // - caller / escrow / delegate
    // - 调用者的代币账户 (按 mint+owner 扫描)
    // - token_program / system_program
}

impl<'info> LegAccounts<'info> {
    pub fn pool_key(&self) -> Pubkey {
        self.pool_state.key()
    }
}
