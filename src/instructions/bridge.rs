use anchor_lang::prelude::*;

use super::context::*;
use crate::engine::SwapRouter;
use crate::pool_cpi::AccountRegistry;
use crate::state::{BridgeTrade, LegAccountMapping, LegSpecific, Rail, RoundTripTrade};

// 组合交易: leg_accounts 先卖出腿，后买入腿

pub fn swap_nfts_for_nfts_through_native<'info>(
    ctx: Context<'_, '_, 'info, 'info, NativeSwap<'info>>,
    trade: BridgeTrade,
    leg_accounts: Vec<LegAccountMapping>,
    input_amount: u64,
    min_output: u64,
    deadline: i64,
) -> Result<u64> {
    let accounts = &ctx.accounts;
    let custody = accounts.custody(ctx.remaining_accounts, ctx.bumps.escrow);
    let registry = AccountRegistry::new(accounts.config.registry, ctx.remaining_accounts);

    let (sell_maps, buy_maps) = split_mappings(&leg_accounts, trade.sell_legs.len())?;
    let (buy_keys, selections): (Vec<Pubkey>, Vec<_>) = trade.buy_legs.selections().into_iter().unzip();
    let sell_pools = resolve_pools(ctx.remaining_accounts, sell_maps, &pool_keys(&trade.sell_legs), &custody)?;
    let buy_pools = resolve_pools(ctx.remaining_accounts, buy_maps, &buy_keys, &custody)?;

    let router = SwapRouter::new(&registry, &custody, accounts.caller.key(), now()?);
    router.swap_nfts_for_nfts(
        &sell_legs(&sell_pools, &trade.sell_legs),
        &buy_legs(&buy_pools, selections),
        Rail::Native,
        input_amount,
        min_output,
        &accounts.recipients(),
        deadline,
    )
}

pub fn swap_nfts_for_nfts_through_token<'info>(
    ctx: Context<'_, '_, 'info, 'info, TokenSwap<'info>>,
    trade: BridgeTrade,
    leg_accounts: Vec<LegAccountMapping>,
    input_amount: u64,
    min_output: u64,
    deadline: i64,
) -> Result<u64> {
    let accounts = &ctx.accounts;
    let custody = accounts.custody(ctx.remaining_accounts, ctx.bumps.delegate);
    let registry = AccountRegistry::new(accounts.config.registry, ctx.remaining_accounts);

    let (sell_maps, buy_maps) = split_mappings(&leg_accounts, trade.sell_legs.len())?;
    let (buy_keys, selections): (Vec<Pubkey>, Vec<_>) = trade.buy_legs.selections().into_iter().unzip();
    let sell_pools = resolve_pools(ctx.remaining_accounts, sell_maps, &pool_keys(&trade.sell_legs), &custody)?;
    let buy_pools = resolve_pools(ctx.remaining_accounts, buy_maps, &buy_keys, &custody)?;

    let router = SwapRouter::new(&registry, &custody, accounts.caller.key(), now()?);
    router.swap_nfts_for_nfts(
        &sell_legs(&sell_pools, &trade.sell_legs),
        &buy_legs(&buy_pools, selections),
        Rail::Token,
        input_amount,
        min_output,
        &accounts.recipients(),
        deadline,
    )
}

pub fn round_trip_through_native<'info>(
    ctx: Context<'_, '_, 'info, 'info, NativeSwap<'info>>,
    trade: RoundTripTrade,
    leg_accounts: Vec<LegAccountMapping>,
    input_amount: u64,
    min_profit: u64,
    deadline: i64,
) -> Result<u64> {
    let accounts = &ctx.accounts;
    let custody = accounts.custody(ctx.remaining_accounts, ctx.bumps.escrow);
    let registry = AccountRegistry::new(accounts.config.registry, ctx.remaining_accounts);

    let (sell_maps, buy_maps) = split_mappings(&leg_accounts, trade.sell_legs.len())?;
    let buy_pools = resolve_pools(ctx.remaining_accounts, buy_maps, &pool_keys(&trade.buy_legs), &custody)?;
    let sell_pools = resolve_pools(ctx.remaining_accounts, sell_maps, &pool_keys(&trade.sell_legs), &custody)?;
    let selections = trade.buy_legs.iter().map(LegSpecific::selection).collect();

    let router = SwapRouter::new(&registry, &custody, accounts.caller.key(), now()?);
    router.round_trip(
        &buy_legs(&buy_pools, selections),
        &sell_legs(&sell_pools, &trade.sell_legs),
        Rail::Native,
        input_amount,
        min_profit,
        &accounts.currency_recipient.key(),
        deadline,
    )
}

pub fn round_trip_through_token<'info>(
    ctx: Context<'_, '_, 'info, 'info, TokenSwap<'info>>,
    trade: RoundTripTrade,
    leg_accounts: Vec<LegAccountMapping>,
    input_amount: u64,
    min_profit: u64,
    deadline: i64,
) -> Result<u64> {
    let accounts = &ctx.accounts;
    let custody = accounts.custody(ctx.remaining_accounts, ctx.bumps.delegate);
    let registry = AccountRegistry::new(accounts.config.registry, ctx.remaining_accounts);

    let (sell_maps, buy_maps) = split_mappings(&leg_accounts, trade.sell_legs.len())?;
    let buy_pools = resolve_pools(ctx.remaining_accounts, buy_maps, &pool_keys(&trade.buy_legs), &custody)?;
    let sell_pools = resolve_pools(ctx.remaining_accounts, sell_maps, &pool_keys(&trade.sell_legs), &custody)?;
    let selections = trade.buy_legs.iter().map(LegSpecific::selection).collect();

    let router = SwapRouter::new(&registry, &custody, accounts.caller.key(), now()?);
    router.round_trip(
        &buy_legs(&buy_pools, selections),
        &sell_legs(&sell_pools, &trade.sell_legs),
        Rail::Token,
        input_amount,
        min_profit,
        &accounts.currency_recipient.key(),
        deadline,
    )
}

fn pool_keys(legs: &[LegSpecific]) -> Vec<Pubkey> {
    legs.iter().map(|leg| leg.pool).collect()
}
