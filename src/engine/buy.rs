use anchor_lang::prelude::*;

use super::router::SwapRouter;
use super::types::{BuyLeg, Recipients};
use crate::errors::RouterError;
use crate::math::{debit, spent};
use crate::state::Rail;

impl<'a> SwapRouter<'a> {
    /// Buys every leg in order against `budget`; returns what is left of it.
    pub(crate) fn execute_buys(
        &self,
        legs: &[BuyLeg<'_>],
        rail: Rail,
        budget: u64,
        nft_recipient: &Pubkey,
    ) -> Result<u64> {
        let mut remaining = budget;
        for (i, leg) in legs.iter().enumerate() {
            leg.items.validate()?;
            let handle = self.verify_pool(leg.pool, rail)?;
            let quote = leg.pool.quote_buy(leg.items.count())?.require_amount()?;
            // 报价超出剩余预算直接失败, 不把调用交给池子
            debit(remaining, quote)?;

            let charged = self.buy_leg(leg, quote, nft_recipient, rail)?;
            remaining = debit(remaining, charged)?;
            msg!(
                "[BUY] leg={} pool={} items={} charged={} remaining={}",
                i,
                handle.key,
                leg.items.count(),
                charged,
                remaining
            );
        }
        Ok(remaining)
    }

    /// One pool swap, capped at `max_input`.
    pub(crate) fn buy_leg(
        &self,
        leg: &BuyLeg<'_>,
        max_input: u64,
        nft_recipient: &Pubkey,
        rail: Rail,
    ) -> Result<u64> {
        let charged = leg
            .pool
            .swap_buy(&leg.items, max_input, nft_recipient, self.payment(rail)?)?;
        if charged > max_input {
            msg!("[BUY] pool={} charged={} max={}", leg.pool.key(), charged, max_input);
            return err!(RouterError::ChargeExceedsMaximum);
        }
        Ok(charged)
    }

    /// Native-rail buy. `input_amount` is attached up front; what the legs do not
    /// spend goes back to `recipients.currency`.
    pub fn swap_native_for_nfts(
        &self,
        legs: &[BuyLeg<'_>],
        input_amount: u64,
        max_cost: u64,
        recipients: &Recipients,
        deadline: i64,
    ) -> Result<u64> {
        self.check_deadline(deadline)?;
        require!(!legs.is_empty(), RouterError::EmptyBatch);

        self.attach(Rail::Native, input_amount)?;
        let remaining = self.execute_buys(legs, Rail::Native, input_amount, &recipients.nfts)?;
        let total = spent(input_amount, remaining)?;
        if total > max_cost {
            msg!("[BUY] spent={} max_cost={}", total, max_cost);
            return err!(RouterError::AggregateSlippageExceeded);
        }
        self.refund(Rail::Native, &recipients.currency, remaining)?;

        msg!("[BUY] native legs={} spent={} refunded={}", legs.len(), total, remaining);
        Ok(remaining)
    }

    /// Token-rail buy. Pools pull from the caller; `input_amount` is the
    /// caller-declared budget and the return value is what was not spent.
    pub fn swap_token_for_nfts(
        &self,
        legs: &[BuyLeg<'_>],
        input_amount: u64,
        nft_recipient: &Pubkey,
        deadline: i64,
    ) -> Result<u64> {
        self.check_deadline(deadline)?;
        require!(!legs.is_empty(), RouterError::EmptyBatch);

        let remaining = self.execute_buys(legs, Rail::Token, input_amount, nft_recipient)?;
        msg!(
            "[BUY] token legs={} spent={} remaining={}",
            legs.len(),
            spent(input_amount, remaining)?,
            remaining
        );
        Ok(remaining)
    }
}
