use anchor_lang::prelude::*;
use solana_program::program_pack::Pack;
use spl_token::state::Account as SplTokenAccount;

use super::types::{layout, pda_seeds, ProgramIds};
use crate::errors::RouterError;
use crate::state::PoolVariant;

/// 账户推导（路由器 PDA + 注册表记录）
///
/// 路由器自身只有三类 PDA：
/// - config   `[CONFIG]`               不可变配置（注册表程序 id）
/// - escrow   `[ESCROW, caller]`       原生币暂存，系统账户，调用结束前清空
/// - delegate `[DELEGATE, caller]`     调用者对其代币账户 approve 的委托人
///
/// 池子是否可信只看注册表程序下的 `[POOL_RECORD, pool_state]` 记录。

pub fn config_address(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[pda_seeds::CONFIG], program_id)
}

pub fn escrow_address(caller: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[pda_seeds::ESCROW, caller.as_ref()], program_id)
}

pub fn delegate_address(caller: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[pda_seeds::DELEGATE, caller.as_ref()], program_id)
}

pub fn pool_record_address(pool: &Pubkey, registry_program: &Pubkey) -> Pubkey {
    let (pda, _) =
        Pubkey::find_program_address(&[pda_seeds::POOL_RECORD, pool.as_ref()], registry_program);
    pda
}

/// SPL token account 的快速识别: mint = data[0..32], owner = data[32..64]
pub fn is_token_account_for(owner: &Pubkey, mint: &Pubkey, ai: &AccountInfo) -> bool {
    if ai.owner != &ProgramIds::default().token_program || ai.data_len() < SplTokenAccount::LEN {
        return false;
    }
    if let Ok(data) = ai.try_borrow_data() {
        return &data[0..32] == mint.as_ref() && &data[32..64] == owner.as_ref();
    }
    false
}

/// 在账户表里找 (mint, owner) 对应的代币账户
pub fn find_token_account<'a, 'info>(
    accounts: &'a [AccountInfo<'info>],
    mint: &Pubkey,
    owner: &Pubkey,
) -> Result<&'a AccountInfo<'info>> {
    match accounts.iter().find(|ai| is_token_account_for(owner, mint, ai)) {
        Some(ai) => Ok(ai),
        None => {
            msg!("[ATA] no token account for mint={} owner={}", mint, owner);
            err!(RouterError::AccountNotFound)
        }
    }
}

pub fn token_account_amount(ai: &AccountInfo) -> Result<u64> {
    require!(
        ai.owner == &ProgramIds::default().token_program,
        RouterError::InvalidAccount
    );
    let data = ai.try_borrow_data()?;
    let account =
        SplTokenAccount::unpack(&data).map_err(|_| error!(RouterError::InvalidAccount))?;
    Ok(account.amount)
}

/// 读取池子账户里的 variant tag（每次调用都现读，不缓存）
pub fn read_pool_variant(pool_state: &AccountInfo) -> Result<PoolVariant> {
    let data = pool_state.try_borrow_data()?;
    let tag = *data
        .get(layout::POOL_VARIANT_OFFSET)
        .ok_or_else(|| error!(RouterError::InvalidAccount))?;
    PoolVariant::try_from(tag).map_err(|_| {
        msg!("[VERIFY] pool={} unknown variant tag={}", pool_state.key, tag);
        error!(RouterError::UnknownPoolVariant)
    })
}

/// 打印账户指纹（长度 + 前8字节），用于多版本池识别
pub fn log_account_fingerprint(ai: &AccountInfo, label: &str) {
    let len = ai.data_len();
    let head8 = match ai.try_borrow_data() {
        Ok(data) => format!("{:?}", &data[..data.len().min(8)]),
        Err(_) => String::new(),
    };
    msg!("[FINGERPRINT] {} len={} head8={}", label, len, head8);
}
