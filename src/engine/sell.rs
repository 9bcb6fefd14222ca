use anchor_lang::prelude::*;

use super::router::SwapRouter;
use super::types::SellLeg;
use crate::errors::RouterError;
use crate::math::credit;
use crate::state::{validate_ids, Rail};

impl<'a> SwapRouter<'a> {
    /// Sells every leg with no per-leg floor; returns total proceeds.
    pub(crate) fn execute_sells(
        &self,
        legs: &[SellLeg<'_>],
        rail: Rail,
        recipient: &Pubkey,
    ) -> Result<u64> {
        let mut total = 0u64;
        for (i, leg) in legs.iter().enumerate() {
            let handle = self.verify_pool(leg.pool, rail)?;
            let output = self.sell_leg(leg, rail, 0, recipient)?;
            total = credit(total, output)?;
            msg!(
                "[SELL] leg={} pool={} items={} output={} total={}",
                i,
                handle.key,
                leg.ids.len(),
                output,
                total
            );
        }
        Ok(total)
    }

    /// Hands the leg's NFTs to the pool between `begin_sell` and `complete_sell`.
    ///
    /// The reported output only counts if `recipient` really received it.
    pub(crate) fn sell_leg(
        &self,
        leg: &SellLeg<'_>,
        rail: Rail,
        min_output: u64,
        recipient: &Pubkey,
    ) -> Result<u64> {
        validate_ids(&leg.ids)?;
        let pool = leg.pool.key();

        leg.pool.begin_sell(leg.ids.len() as u64)?;
        for id in &leg.ids {
            self.custody.transfer_nft(id, &self.caller, &pool)?;
        }
        let before = self.custody.balance(rail, recipient)?;
        let output = leg.pool.complete_sell(min_output, recipient)?;
        let after = self.custody.balance(rail, recipient)?;
        if after.checked_sub(before) != Some(output) {
            msg!(
                "[SELL] pool={} reported={} before={} after={}",
                pool,
                output,
                before,
                after
            );
            return err!(RouterError::PaymentMismatch);
        }
        require!(output >= min_output, RouterError::AggregateSlippageExceeded);
        Ok(output)
    }

    /// Sells the caller's NFTs; proceeds go to `recipient`.
    pub fn swap_nfts_for_currency(
        &self,
        legs: &[SellLeg<'_>],
        rail: Rail,
        min_output: u64,
        recipient: &Pubkey,
        deadline: i64,
    ) -> Result<u64> {
        self.check_deadline(deadline)?;
        require!(!legs.is_empty(), RouterError::EmptyBatch);

        let total = self.execute_sells(legs, rail, recipient)?;
        if total < min_output {
            msg!("[SELL] output={} min_output={}", total, min_output);
            return err!(RouterError::AggregateSlippageExceeded);
        }
        msg!("[SELL] {:?} legs={} output={}", rail, legs.len(), total);
        Ok(total)
    }
}
