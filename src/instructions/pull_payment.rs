use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::account_derivation::{pda_seeds, read_pool_variant};
use crate::engine::{PoolAttestation, PullPayment, PullPaymentGateway};
use crate::errors::RouterError;
use crate::pool_cpi::{AccountRegistry, CpiCustody, PdaSigner};
use crate::state::{PoolVariant, RouterConfig};

// ==============================================================================================
// 代币池拉款入口
// - 调用方必须是池子账户本身（池子程序用 invoke_signed 签名）；
// - 池子声明的 variant 必须与账户里的 tag 一致，且由注册表记录背书；
// - 资金只会转入池子自己的代币账户，来源是已授权 delegate PDA 的账户。
// ==============================================================================================

#[derive(Accounts)]
pub struct RouterPullPayment<'info> {
    pub pool: Signer<'info>,
    #[account(seeds = [pda_seeds::CONFIG], bump = config.bump)]
    pub config: Account<'info, RouterConfig>,
    /// CHECK: registry record for `pool`; address, owner and contents checked by AccountRegistry
    pub registry_record: UncheckedAccount<'info>,
    pub mint: Account<'info, Mint>,
    #[account(mut, token::mint = mint)]
    pub source: Account<'info, TokenAccount>,
    #[account(mut, token::mint = mint, token::authority = pool)]
    pub destination: Account<'info, TokenAccount>,
    /// CHECK: PDA the source owner approved as delegate
    #[account(seeds = [pda_seeds::DELEGATE, source.owner.as_ref()], bump)]
    pub delegate: UncheckedAccount<'info>,
    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn pull_payment<'info>(
    ctx: Context<'_, '_, 'info, 'info, RouterPullPayment<'info>>,
    amount: u64,
    variant: PoolVariant,
) -> Result<()> {
    let accounts = &ctx.accounts;
    let pool = accounts.pool.to_account_info();

    // 1. 声明的 variant 必须是池子自己的 tag
    let tagged = read_pool_variant(&pool)?;
    if tagged != variant {
        msg!("[PULL] pool={} claimed {:?} tagged {:?}", pool.key, variant, tagged);
        return err!(RouterError::UnauthorizedPullPayment);
    }

    // 2. 组装托管与注册表视图
    let owner = accounts.source.owner;
    let registry = AccountRegistry::new(
        accounts.config.registry,
        &[accounts.registry_record.to_account_info()],
    );
    let custody = CpiCustody::new(
        pool,
        accounts.token_program.to_account_info(),
        accounts.system_program.to_account_info(),
        &[accounts.source.to_account_info(), accounts.destination.to_account_info()],
    )
    .with_delegate(
        PdaSigner::new(
            accounts.delegate.to_account_info(),
            &[pda_seeds::DELEGATE, owner.as_ref()],
            ctx.bumps.delegate,
        ),
        accounts.mint.key(),
    );

    // 3. 网关校验并划转
    let claim = PoolAttestation {
        pool: accounts.pool.key(),
        variant,
    };
    PullPaymentGateway::new(&registry, &custody).pull_payment(
        &claim,
        &accounts.mint.key(),
        &owner,
        amount,
    )
}
