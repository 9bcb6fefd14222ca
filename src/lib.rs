use anchor_lang::prelude::*;

pub mod instructions;
pub mod state;
pub mod errors;
pub mod math;
pub mod engine;
pub mod account_resolver;
pub mod account_derivation;
pub mod pool_cpi;

pub use instructions::*;
pub use state::*;
pub use errors::*;

declare_id!("6PVmfGnmGkFCeKeFQbfnXv37dZjCeeebut3eHF82X9ZV");

#[program]
pub mod nft_swap_router {
    use super::*;

    pub fn initialize(ctx: Context<Initialize>, registry: Pubkey) -> Result<()> {
        instructions::initialize(ctx, registry)
    }

    // ---- 买入 ----

    pub fn swap_native_for_any_nfts<'info>(
        ctx: Context<'_, '_, 'info, 'info, NativeSwap<'info>>,
        legs: Vec<LegAny>,
        leg_accounts: Vec<LegAccountMapping>,
        input_amount: u64,
        max_cost: u64,
        deadline: i64,
    ) -> Result<u64> {
        instructions::swap_native_for_any_nfts(ctx, legs, leg_accounts, input_amount, max_cost, deadline)
    }

    pub fn swap_native_for_specific_nfts<'info>(
        ctx: Context<'_, '_, 'info, 'info, NativeSwap<'info>>,
        legs: Vec<LegSpecific>,
        leg_accounts: Vec<LegAccountMapping>,
        input_amount: u64,
        max_cost: u64,
        deadline: i64,
    ) -> Result<u64> {
        instructions::swap_native_for_specific_nfts(ctx, legs, leg_accounts, input_amount, max_cost, deadline)
    }

    pub fn swap_token_for_any_nfts<'info>(
        ctx: Context<'_, '_, 'info, 'info, TokenSwap<'info>>,
        legs: Vec<LegAny>,
        leg_accounts: Vec<LegAccountMapping>,
        input_amount: u64,
        deadline: i64,
    ) -> Result<u64> {
        instructions::swap_token_for_any_nfts(ctx, legs, leg_accounts, input_amount, deadline)
    }

    pub fn swap_token_for_specific_nfts<'info>(
        ctx: Context<'_, '_, 'info, 'info, TokenSwap<'info>>,
        legs: Vec<LegSpecific>,
        leg_accounts: Vec<LegAccountMapping>,
        input_amount: u64,
        deadline: i64,
    ) -> Result<u64> {
        instructions::swap_token_for_specific_nfts(ctx, legs, leg_accounts, input_amount, deadline)
    }

    // ---- 卖出 ----

    pub fn swap_nfts_for_native<'info>(
        ctx: Context<'_, '_, 'info, 'info, NativeSwap<'info>>,
        legs: Vec<LegSpecific>,
        leg_accounts: Vec<LegAccountMapping>,
        min_output: u64,
        deadline: i64,
    ) -> Result<u64> {
        instructions::swap_nfts_for_native(ctx, legs, leg_accounts, min_output, deadline)
    }

    pub fn swap_nfts_for_token<'info>(
        ctx: Context<'_, '_, 'info, 'info, TokenSwap<'info>>,
        legs: Vec<LegSpecific>,
        leg_accounts: Vec<LegAccountMapping>,
        min_output: u64,
        deadline: i64,
    ) -> Result<u64> {
        instructions::swap_nfts_for_token(ctx, legs, leg_accounts, min_output, deadline)
    }

    // ---- NFT 换 NFT / 往返套利 ----

    pub fn swap_nfts_for_nfts_through_native<'info>(
        ctx: Context<'_, '_, 'info, 'info, NativeSwap<'info>>,
        trade: BridgeTrade,
        leg_accounts: Vec<LegAccountMapping>,
        input_amount: u64,
        min_output: u64,
        deadline: i64,
    ) -> Result<u64> {
        instructions::swap_nfts_for_nfts_through_native(ctx, trade, leg_accounts, input_amount, min_output, deadline)
    }

    pub fn swap_nfts_for_nfts_through_token<'info>(
        ctx: Context<'_, '_, 'info, 'info, TokenSwap<'info>>,
        trade: BridgeTrade,
        leg_accounts: Vec<LegAccountMapping>,
        input_amount: u64,
        min_output: u64,
        deadline: i64,
    ) -> Result<u64> {
        instructions::swap_nfts_for_nfts_through_token(ctx, trade, leg_accounts, input_amount, min_output, deadline)
    }

    pub fn round_trip_through_native<'info>(
        ctx: Context<'_, '_, 'info, 'info, NativeSwap<'info>>,
        trade: RoundTripTrade,
        leg_accounts: Vec<LegAccountMapping>,
        input_amount: u64,
        min_profit: u64,
        deadline: i64,
    ) -> Result<u64> {
        instructions::round_trip_through_native(ctx, trade, leg_accounts, input_amount, min_profit, deadline)
    }

    pub fn round_trip_through_token<'info>(
        ctx: Context<'_, '_, 'info, 'info, TokenSwap<'info>>,
        trade: RoundTripTrade,
        leg_accounts: Vec<LegAccountMapping>,
        input_amount: u64,
        min_profit: u64,
        deadline: i64,
    ) -> Result<u64> {
        instructions::round_trip_through_token(ctx, trade, leg_accounts, input_amount, min_profit, deadline)
    }

    // ---- 容错路由 ----

    pub fn robust_swap_native_for_nfts<'info>(
        ctx: Context<'_, '_, 'info, 'info, NativeSwap<'info>>,
        legs: Vec<RobustBuyLeg>,
        leg_accounts: Vec<LegAccountMapping>,
        input_amount: u64,
        deadline: i64,
    ) -> Result<u64> {
        instructions::robust_swap_native_for_nfts(ctx, legs, leg_accounts, input_amount, deadline)
    }

    pub fn robust_swap_token_for_nfts<'info>(
        ctx: Context<'_, '_, 'info, 'info, TokenSwap<'info>>,
        legs: Vec<RobustBuyLeg>,
        leg_accounts: Vec<LegAccountMapping>,
        input_amount: u64,
        deadline: i64,
    ) -> Result<u64> {
        instructions::robust_swap_token_for_nfts(ctx, legs, leg_accounts, input_amount, deadline)
    }

    pub fn robust_swap_nfts_for_native<'info>(
        ctx: Context<'_, '_, 'info, 'info, NativeSwap<'info>>,
        legs: Vec<RobustSellLeg>,
        leg_accounts: Vec<LegAccountMapping>,
        deadline: i64,
    ) -> Result<u64> {
        instructions::robust_swap_nfts_for_native(ctx, legs, leg_accounts, deadline)
    }

    pub fn robust_swap_nfts_for_token<'info>(
        ctx: Context<'_, '_, 'info, 'info, TokenSwap<'info>>,
        legs: Vec<RobustSellLeg>,
        leg_accounts: Vec<LegAccountMapping>,
        deadline: i64,
    ) -> Result<u64> {
        instructions::robust_swap_nfts_for_token(ctx, legs, leg_accounts, deadline)
    }

    pub fn robust_swap_native_for_nfts_and_nfts_for_native<'info>(
        ctx: Context<'_, '_, 'info, 'info, NativeSwap<'info>>,
        trade: RobustTrade,
        leg_accounts: Vec<LegAccountMapping>,
        input_amount: u64,
        deadline: i64,
    ) -> Result<RobustSettlement> {
        instructions::robust_swap_native_for_nfts_and_nfts_for_native(ctx, trade, leg_accounts, input_amount, deadline)
    }

    pub fn robust_swap_token_for_nfts_and_nfts_for_token<'info>(
        ctx: Context<'_, '_, 'info, 'info, TokenSwap<'info>>,
        trade: RobustTrade,
        leg_accounts: Vec<LegAccountMapping>,
        input_amount: u64,
        deadline: i64,
    ) -> Result<RobustSettlement> {
        instructions::robust_swap_token_for_nfts_and_nfts_for_token(ctx, trade, leg_accounts, input_amount, deadline)
    }

    // ---- 代币池拉款 ----

    pub fn pull_payment<'info>(
        ctx: Context<'_, '_, 'info, 'info, RouterPullPayment<'info>>,
        amount: u64,
        variant: PoolVariant,
    ) -> Result<()> {
        instructions::pull_payment(ctx, amount, variant)
    }
}
