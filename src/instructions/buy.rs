use anchor_lang::prelude::*;

use super::context::*;
use crate::engine::SwapRouter;
use crate::pool_cpi::AccountRegistry;
use crate::state::{ItemSelection, LegAccountMapping, LegAny, LegSpecific};

pub fn swap_native_for_any_nfts<'info>(
    ctx: Context<'_, '_, 'info, 'info, NativeSwap<'info>>,
    legs: Vec<LegAny>,
    leg_accounts: Vec<LegAccountMapping>,
    input_amount: u64,
    max_cost: u64,
    deadline: i64,
) -> Result<u64> {
    let pools = legs.iter().map(|leg| leg.pool).collect();
    let selections = legs.iter().map(LegAny::selection).collect();
    native_buy(ctx, pools, selections, &leg_accounts, input_amount, max_cost, deadline)
}

pub fn swap_native_for_specific_nfts<'info>(
    ctx: Context<'_, '_, 'info, 'info, NativeSwap<'info>>,
    legs: Vec<LegSpecific>,
    leg_accounts: Vec<LegAccountMapping>,
    input_amount: u64,
    max_cost: u64,
    deadline: i64,
) -> Result<u64> {
    let pools = legs.iter().map(|leg| leg.pool).collect();
    let selections = legs.iter().map(LegSpecific::selection).collect();
    native_buy(ctx, pools, selections, &leg_accounts, input_amount, max_cost, deadline)
}

pub fn swap_token_for_any_nfts<'info>(
    ctx: Context<'_, '_, 'info, 'info, TokenSwap<'info>>,
    legs: Vec<LegAny>,
    leg_accounts: Vec<LegAccountMapping>,
    input_amount: u64,
    deadline: i64,
) -> Result<u64> {
    let pools = legs.iter().map(|leg| leg.pool).collect();
    let selections = legs.iter().map(LegAny::selection).collect();
    token_buy(ctx, pools, selections, &leg_accounts, input_amount, deadline)
}

pub fn swap_token_for_specific_nfts<'info>(
    ctx: Context<'_, '_, 'info, 'info, TokenSwap<'info>>,
    legs: Vec<LegSpecific>,
    leg_accounts: Vec<LegAccountMapping>,
    input_amount: u64,
    deadline: i64,
) -> Result<u64> {
    let pools = legs.iter().map(|leg| leg.pool).collect();
    let selections = legs.iter().map(LegSpecific::selection).collect();
    token_buy(ctx, pools, selections, &leg_accounts, input_amount, deadline)
}

fn native_buy<'info>(
    ctx: Context<'_, '_, 'info, 'info, NativeSwap<'info>>,
    pool_keys: Vec<Pubkey>,
    selections: Vec<ItemSelection>,
    leg_accounts: &[LegAccountMapping],
    input_amount: u64,
    max_cost: u64,
    deadline: i64,
) -> Result<u64> {
    let accounts = &ctx.accounts;
    let custody = accounts.custody(ctx.remaining_accounts, ctx.bumps.escrow);
    let registry = AccountRegistry::new(accounts.config.registry, ctx.remaining_accounts);
    let pools = resolve_pools(ctx.remaining_accounts, leg_accounts, &pool_keys, &custody)?;
    let legs = buy_legs(&pools, selections);

    let router = SwapRouter::new(&registry, &custody, accounts.caller.key(), now()?);
    router.swap_native_for_nfts(&legs, input_amount, max_cost, &accounts.recipients(), deadline)
}

fn token_buy<'info>(
    ctx: Context<'_, '_, 'info, 'info, TokenSwap<'info>>,
    pool_keys: Vec<Pubkey>,
    selections: Vec<ItemSelection>,
    leg_accounts: &[LegAccountMapping],
    input_amount: u64,
    deadline: i64,
) -> Result<u64> {
    let accounts = &ctx.accounts;
    let custody = accounts.custody(ctx.remaining_accounts, ctx.bumps.delegate);
    let registry = AccountRegistry::new(accounts.config.registry, ctx.remaining_accounts);
    let pools = resolve_pools(ctx.remaining_accounts, leg_accounts, &pool_keys, &custody)?;
    let legs = buy_legs(&pools, selections);

    let router = SwapRouter::new(&registry, &custody, accounts.caller.key(), now()?);
    router.swap_token_for_nfts(&legs, input_amount, &accounts.nft_recipient.key(), deadline)
}
