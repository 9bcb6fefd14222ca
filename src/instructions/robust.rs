use anchor_lang::prelude::*;

use super::context::*;
use crate::engine::{BuyLeg, RobustBuy, RobustSell, SellLeg, SwapRouter};
use crate::pool_cpi::{AccountRegistry, CpiPool};
use crate::state::{LegAccountMapping, Rail, RobustBuyLeg, RobustSellLeg, RobustSettlement, RobustTrade};

// 容错路由: 报价不可用或超出单腿上下限的腿被跳过，其余照常成交

pub fn robust_swap_native_for_nfts<'info>(
    ctx: Context<'_, '_, 'info, 'info, NativeSwap<'info>>,
    legs: Vec<RobustBuyLeg>,
    leg_accounts: Vec<LegAccountMapping>,
    input_amount: u64,
    deadline: i64,
) -> Result<u64> {
    let accounts = &ctx.accounts;
    let custody = accounts.custody(ctx.remaining_accounts, ctx.bumps.escrow);
    let registry = AccountRegistry::new(accounts.config.registry, ctx.remaining_accounts);
    let pools = resolve_pools(ctx.remaining_accounts, &leg_accounts, &buy_keys(&legs), &custody)?;

    let router = SwapRouter::new(&registry, &custody, accounts.caller.key(), now()?);
    router.robust_swap_for_nfts(
        &robust_buys(&pools, &legs),
        Rail::Native,
        input_amount,
        &accounts.recipients(),
        deadline,
    )
}

pub fn robust_swap_token_for_nfts<'info>(
    ctx: Context<'_, '_, 'info, 'info, TokenSwap<'info>>,
    legs: Vec<RobustBuyLeg>,
    leg_accounts: Vec<LegAccountMapping>,
    input_amount: u64,
    deadline: i64,
) -> Result<u64> {
    let accounts = &ctx.accounts;
    let custody = accounts.custody(ctx.remaining_accounts, ctx.bumps.delegate);
    let registry = AccountRegistry::new(accounts.config.registry, ctx.remaining_accounts);
    let pools = resolve_pools(ctx.remaining_accounts, &leg_accounts, &buy_keys(&legs), &custody)?;

    let router = SwapRouter::new(&registry, &custody, accounts.caller.key(), now()?);
    router.robust_swap_for_nfts(
        &robust_buys(&pools, &legs),
        Rail::Token,
        input_amount,
        &accounts.recipients(),
        deadline,
    )
}

pub fn robust_swap_nfts_for_native<'info>(
    ctx: Context<'_, '_, 'info, 'info, NativeSwap<'info>>,
    legs: Vec<RobustSellLeg>,
    leg_accounts: Vec<LegAccountMapping>,
    deadline: i64,
) -> Result<u64> {
    let accounts = &ctx.accounts;
    let custody = accounts.custody(ctx.remaining_accounts, ctx.bumps.escrow);
    let registry = AccountRegistry::new(accounts.config.registry, ctx.remaining_accounts);
    let pools = resolve_pools(ctx.remaining_accounts, &leg_accounts, &sell_keys(&legs), &custody)?;

    let router = SwapRouter::new(&registry, &custody, accounts.caller.key(), now()?);
    router.robust_swap_nfts_for_currency(
        &robust_sells(&pools, &legs),
        Rail::Native,
        &accounts.currency_recipient.key(),
        deadline,
    )
}

pub fn robust_swap_nfts_for_token<'info>(
    ctx: Context<'_, '_, 'info, 'info, TokenSwap<'info>>,
    legs: Vec<RobustSellLeg>,
    leg_accounts: Vec<LegAccountMapping>,
    deadline: i64,
) -> Result<u64> {
    let accounts = &ctx.accounts;
    let custody = accounts.custody(ctx.remaining_accounts, ctx.bumps.delegate);
    let registry = AccountRegistry::new(accounts.config.registry, ctx.remaining_accounts);
    let pools = resolve_pools(ctx.remaining_accounts, &leg_accounts, &sell_keys(&legs), &custody)?;

    let router = SwapRouter::new(&registry, &custody, accounts.caller.key(), now()?);
    router.robust_swap_nfts_for_currency(
        &robust_sells(&pools, &legs),
        Rail::Token,
        &accounts.currency_recipient.key(),
        deadline,
    )
}

pub fn robust_swap_native_for_nfts_and_nfts_for_native<'info>(
    ctx: Context<'_, '_, 'info, 'info, NativeSwap<'info>>,
    trade: RobustTrade,
    leg_accounts: Vec<LegAccountMapping>,
    input_amount: u64,
    deadline: i64,
) -> Result<RobustSettlement> {
    let accounts = &ctx.accounts;
    let custody = accounts.custody(ctx.remaining_accounts, ctx.bumps.escrow);
    let registry = AccountRegistry::new(accounts.config.registry, ctx.remaining_accounts);

    let (sell_maps, buy_maps) = split_mappings(&leg_accounts, trade.sell_legs.len())?;
    let sell_pools = resolve_pools(ctx.remaining_accounts, sell_maps, &sell_keys(&trade.sell_legs), &custody)?;
    let buy_pools = resolve_pools(ctx.remaining_accounts, buy_maps, &buy_keys(&trade.buy_legs), &custody)?;

    let router = SwapRouter::new(&registry, &custody, accounts.caller.key(), now()?);
    router.robust_swap_for_nfts_and_nfts_for_currency(
        &robust_buys(&buy_pools, &trade.buy_legs),
        &robust_sells(&sell_pools, &trade.sell_legs),
        Rail::Native,
        input_amount,
        &accounts.recipients(),
        deadline,
    )
}

pub fn robust_swap_token_for_nfts_and_nfts_for_token<'info>(
    ctx: Context<'_, '_, 'info, 'info, TokenSwap<'info>>,
    trade: RobustTrade,
    leg_accounts: Vec<LegAccountMapping>,
    input_amount: u64,
    deadline: i64,
) -> Result<RobustSettlement> {
    let accounts = &ctx.accounts;
    let custody = accounts.custody(ctx.remaining_accounts, ctx.bumps.delegate);
    let registry = AccountRegistry::new(accounts.config.registry, ctx.remaining_accounts);

    let (sell_maps, buy_maps) = split_mappings(&leg_accounts, trade.sell_legs.len())?;
    let sell_pools = resolve_pools(ctx.remaining_accounts, sell_maps, &sell_keys(&trade.sell_legs), &custody)?;
    let buy_pools = resolve_pools(ctx.remaining_accounts, buy_maps, &buy_keys(&trade.buy_legs), &custody)?;

    let router = SwapRouter::new(&registry, &custody, accounts.caller.key(), now()?);
    router.robust_swap_for_nfts_and_nfts_for_currency(
        &robust_buys(&buy_pools, &trade.buy_legs),
        &robust_sells(&sell_pools, &trade.sell_legs),
        Rail::Token,
        input_amount,
        &accounts.recipients(),
        deadline,
    )
}

fn buy_keys(legs: &[RobustBuyLeg]) -> Vec<Pubkey> {
    legs.iter().map(|leg| leg.pool).collect()
}

fn sell_keys(legs: &[RobustSellLeg]) -> Vec<Pubkey> {
    legs.iter().map(|leg| leg.leg.pool).collect()
}

fn robust_buys<'p>(pools: &'p [CpiPool<'_, '_>], legs: &[RobustBuyLeg]) -> Vec<RobustBuy<'p>> {
    pools
        .iter()
        .zip(legs)
        .map(|(pool, leg)| RobustBuy {
            leg: BuyLeg {
                pool,
                items: leg.items.clone(),
            },
            max_cost: leg.max_cost,
        })
        .collect()
}

fn robust_sells<'p>(pools: &'p [CpiPool<'_, '_>], legs: &[RobustSellLeg]) -> Vec<RobustSell<'p>> {
    pools
        .iter()
        .zip(legs)
        .map(|(pool, leg)| RobustSell {
            leg: SellLeg {
                pool,
                ids: leg.leg.ids.clone(),
            },
            min_output: leg.min_output,
        })
        .collect()
}
