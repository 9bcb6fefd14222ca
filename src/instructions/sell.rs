use anchor_lang::prelude::*;

use super::context::*;
use crate::engine::SwapRouter;
use crate::pool_cpi::AccountRegistry;
use crate::state::{LegAccountMapping, LegSpecific, Rail};

pub fn swap_nfts_for_native<'info>(
    ctx: Context<'_, '_, 'info, 'info, NativeSwap<'info>>,
    legs: Vec<LegSpecific>,
    leg_accounts: Vec<LegAccountMapping>,
    min_output: u64,
    deadline: i64,
) -> Result<u64> {
    let accounts = &ctx.accounts;
    let custody = accounts.custody(ctx.remaining_accounts, ctx.bumps.escrow);
    let registry = AccountRegistry::new(accounts.config.registry, ctx.remaining_accounts);
    let pool_keys: Vec<Pubkey> = legs.iter().map(|leg| leg.pool).collect();
    let pools = resolve_pools(ctx.remaining_accounts, &leg_accounts, &pool_keys, &custody)?;

    let router = SwapRouter::new(&registry, &custody, accounts.caller.key(), now()?);
    router.swap_nfts_for_currency(
        &sell_legs(&pools, &legs),
        Rail::Native,
        min_output,
        &accounts.currency_recipient.key(),
        deadline,
    )
}

pub fn swap_nfts_for_token<'info>(
    ctx: Context<'_, '_, 'info, 'info, TokenSwap<'info>>,
    legs: Vec<LegSpecific>,
    leg_accounts: Vec<LegAccountMapping>,
    min_output: u64,
    deadline: i64,
) -> Result<u64> {
    let accounts = &ctx.accounts;
    let custody = accounts.custody(ctx.remaining_accounts, ctx.bumps.delegate);
    let registry = AccountRegistry::new(accounts.config.registry, ctx.remaining_accounts);
    let pool_keys: Vec<Pubkey> = legs.iter().map(|leg| leg.pool).collect();
    let pools = resolve_pools(ctx.remaining_accounts, &leg_accounts, &pool_keys, &custody)?;

    let router = SwapRouter::new(&registry, &custody, accounts.caller.key(), now()?);
    router.swap_nfts_for_currency(
        &sell_legs(&pools, &legs),
        Rail::Token,
        min_output,
        &accounts.currency_recipient.key(),
        deadline,
    )
}
