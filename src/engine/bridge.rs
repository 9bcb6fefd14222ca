use anchor_lang::prelude::*;

use super::router::SwapRouter;
use super::types::{BuyLeg, Recipients, SellLeg};
use crate::errors::RouterError;
use crate::math::{credit, spent};
use crate::state::Rail;

impl<'a> SwapRouter<'a> {
    /// Sells, then spends the proceeds plus `input_amount` on the buy legs.
    ///
    /// Returns the net currency left over, which must be at least `min_output`.
    /// On the native rail it is released to `recipients.currency`; token
    /// proceeds are paid to the caller and the leftover stays there.
    #[allow(clippy::too_many_arguments)]
    pub fn swap_nfts_for_nfts(
        &self,
        sells: &[SellLeg<'_>],
        buys: &[BuyLeg<'_>],
        rail: Rail,
        input_amount: u64,
        min_output: u64,
        recipients: &Recipients,
        deadline: i64,
    ) -> Result<u64> {
        self.check_deadline(deadline)?;
        require!(!sells.is_empty() && !buys.is_empty(), RouterError::EmptyBatch);

        self.attach(rail, input_amount)?;
        let proceeds_to = match rail {
            Rail::Native => self.custody.escrow()?,
            Rail::Token => self.caller,
        };
        let proceeds = self.execute_sells(sells, rail, &proceeds_to)?;
        let budget = credit(input_amount, proceeds)?;
        let max_cost = match budget.checked_sub(min_output) {
            Some(max_cost) => max_cost,
            None => {
                msg!("[BRIDGE] budget={} min_output={}", budget, min_output);
                return err!(RouterError::AggregateSlippageExceeded);
            }
        };

        let remaining = self.execute_buys(buys, rail, budget, &recipients.nfts)?;
        let cost = spent(budget, remaining)?;
        if cost > max_cost {
            msg!("[BRIDGE] cost={} max_cost={}", cost, max_cost);
            return err!(RouterError::AggregateSlippageExceeded);
        }
        self.refund(rail, &recipients.currency, remaining)?;

        msg!(
            "[BRIDGE] {:?} proceeds={} cost={} net={}",
            rail,
            proceeds,
            cost,
            remaining
        );
        Ok(remaining)
    }

    /// Buys, refunds what the buys left over, then sells the bought NFTs back out.
    ///
    /// Returns the profit `output - spent`, which must be at least `min_profit`.
    #[allow(clippy::too_many_arguments)]
    pub fn round_trip(
        &self,
        buys: &[BuyLeg<'_>],
        sells: &[SellLeg<'_>],
        rail: Rail,
        input_amount: u64,
        min_profit: u64,
        recipient: &Pubkey,
        deadline: i64,
    ) -> Result<u64> {
        self.check_deadline(deadline)?;
        require!(!buys.is_empty() && !sells.is_empty(), RouterError::EmptyBatch);

        self.attach(rail, input_amount)?;
        let caller = self.caller;
        let remaining = self.execute_buys(buys, rail, input_amount, &caller)?;
        let cost = spent(input_amount, remaining)?;
        self.refund(rail, recipient, remaining)?;

        let min_output = credit(min_profit, cost)?;
        let output = self.execute_sells(sells, rail, recipient)?;
        if output < min_output {
            msg!("[BRIDGE] round trip output={} needed={}", output, min_output);
            return err!(RouterError::AggregateSlippageExceeded);
        }

        let profit = spent(output, cost)?;
        msg!("[BRIDGE] round trip {:?} cost={} output={} profit={}", rail, cost, output, profit);
        Ok(profit)
    }
}
