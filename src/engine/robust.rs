//! Batches that skip mispriced legs instead of aborting.
//!
//! A leg is skipped when its live quote is unavailable or violates the leg's
//! own bound. Deadline, pool identity and rail, caller funds and pull-payment
//! authorization still abort the whole call.

use anchor_lang::prelude::*;

use super::router::SwapRouter;
use super::types::{Recipients, RobustBuy, RobustSell};
use crate::errors::RouterError;
use crate::math::{credit, debit};
use crate::state::{validate_ids, Rail, RobustSettlement};

impl<'a> SwapRouter<'a> {
    pub(crate) fn execute_robust_buys(
        &self,
        legs: &[RobustBuy<'_>],
        rail: Rail,
        budget: u64,
        nft_recipient: &Pubkey,
    ) -> Result<u64> {
        let mut remaining = budget;
        for (i, robust) in legs.iter().enumerate() {
            let leg = &robust.leg;
            leg.items.validate()?;
            let handle = self.verify_pool(leg.pool, rail)?;

            let quote = match leg.pool.quote_buy(leg.items.count())?.amount() {
                Some(quote) if quote <= robust.max_cost => quote,
                quote => {
                    msg!(
                        "[ROBUST] skip buy leg={} pool={} quote={:?} max_cost={}",
                        i,
                        handle.key,
                        quote,
                        robust.max_cost
                    );
                    continue;
                }
            };
            debit(remaining, quote)?;

            let charged = self.buy_leg(leg, quote, nft_recipient, rail)?;
            remaining = debit(remaining, charged)?;
            msg!(
                "[ROBUST] buy leg={} pool={} charged={} remaining={}",
                i,
                handle.key,
                charged,
                remaining
            );
        }
        Ok(remaining)
    }

    pub(crate) fn execute_robust_sells(
        &self,
        legs: &[RobustSell<'_>],
        rail: Rail,
        recipient: &Pubkey,
    ) -> Result<u64> {
        let mut total = 0u64;
        for (i, robust) in legs.iter().enumerate() {
            let leg = &robust.leg;
            validate_ids(&leg.ids)?;
            let handle = self.verify_pool(leg.pool, rail)?;

            match leg.pool.quote_sell(leg.ids.len() as u64)?.amount() {
                Some(quote) if quote >= robust.min_output => {}
                quote => {
                    msg!(
                        "[ROBUST] skip sell leg={} pool={} quote={:?} min_output={}",
                        i,
                        handle.key,
                        quote,
                        robust.min_output
                    );
                    continue;
                }
            }

            let output = self.sell_leg(leg, rail, robust.min_output, recipient)?;
            total = credit(total, output)?;
            msg!(
                "[ROBUST] sell leg={} pool={} output={} total={}",
                i,
                handle.key,
                output,
                total
            );
        }
        Ok(total)
    }

    /// Robust buy on either rail. Returns the unspent part of `input_amount`,
    /// refunded to `recipients.currency` on the native rail.
    pub fn robust_swap_for_nfts(
        &self,
        legs: &[RobustBuy<'_>],
        rail: Rail,
        input_amount: u64,
        recipients: &Recipients,
        deadline: i64,
    ) -> Result<u64> {
        self.check_deadline(deadline)?;
        require!(!legs.is_empty(), RouterError::EmptyBatch);

        self.attach(rail, input_amount)?;
        let remaining = self.execute_robust_buys(legs, rail, input_amount, &recipients.nfts)?;
        self.refund(rail, &recipients.currency, remaining)?;
        Ok(remaining)
    }

    /// Robust sell. No value is attached on this path.
    pub fn robust_swap_nfts_for_currency(
        &self,
        legs: &[RobustSell<'_>],
        rail: Rail,
        recipient: &Pubkey,
        deadline: i64,
    ) -> Result<u64> {
        self.check_deadline(deadline)?;
        require!(!legs.is_empty(), RouterError::EmptyBatch);

        self.execute_robust_sells(legs, rail, recipient)
    }

    /// Robust buys, refund, then robust sells of NFTs the caller already holds.
    pub fn robust_swap_for_nfts_and_nfts_for_currency(
        &self,
        buys: &[RobustBuy<'_>],
        sells: &[RobustSell<'_>],
        rail: Rail,
        input_amount: u64,
        recipients: &Recipients,
        deadline: i64,
    ) -> Result<RobustSettlement> {
        self.check_deadline(deadline)?;
        require!(!buys.is_empty() || !sells.is_empty(), RouterError::EmptyBatch);

        self.attach(rail, input_amount)?;
        let remaining = self.execute_robust_buys(buys, rail, input_amount, &recipients.nfts)?;
        self.refund(rail, &recipients.currency, remaining)?;
        let output = self.execute_robust_sells(sells, rail, &recipients.currency)?;

        msg!("[ROBUST] {:?} remaining={} output={}", rail, remaining, output);
        Ok(RobustSettlement { remaining, output })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testkit::*;
    use crate::engine::types::{BuyLeg, PoolAttestation, SellLeg};
    use crate::errors::assert_router_error;
    use crate::state::{ItemSelection, PoolVariant};

    fn buy(pool: &MockPool, num_items: u64, max_cost: u64) -> RobustBuy<'_> {
        RobustBuy {
            leg: BuyLeg {
                pool,
                items: ItemSelection::Any { num_items },
            },
            max_cost,
        }
    }

    fn sell(pool: &MockPool, ids: Vec<Pubkey>, min_output: u64) -> RobustSell<'_> {
        RobustSell {
            leg: SellLeg { pool, ids },
            min_output,
        }
    }

    #[test]
    fn over_cap_middle_leg_is_skipped_and_its_budget_refunded() {
        let world = World::new();
        let (a, _) = stocked_pool(&world, PoolVariant::EnumerableNative, 10, 9, 3);
        let (b, _) = stocked_pool(&world, PoolVariant::EnumerableNative, 50, 45, 3);
        let (c, _) = stocked_pool(&world, PoolVariant::MissingEnumerableNative, 20, 18, 3);
        world.fund_native(&world.caller, 500);

        let legs = [buy(&a, 1, 10), buy(&b, 1, 40), buy(&c, 1, 25)];
        let remaining = world
            .router()
            .robust_swap_for_nfts(&legs, Rail::Native, 100, &recipients(&world), DEADLINE)
            .unwrap();

        assert_eq!(remaining, 70);
        assert_eq!(world.lamports(&world.caller), 470);
        assert_eq!(world.lamports(&world.escrow), 0);
        assert_eq!(world.nfts_of(&b.key).len(), 3);
        assert_eq!(b.calls(), vec!["quote_buy"]);
        assert_eq!(world.nfts_of(&world.caller).len(), 2);
    }

    #[test]
    fn unavailable_quote_is_a_skip() {
        let world = World::new();
        let (a, _) = stocked_pool(&world, PoolVariant::EnumerableToken, 10, 9, 3);
        let (b, _) = stocked_pool(&world, PoolVariant::EnumerableToken, 10, 9, 3);
        a.quotes_available.set(false);
        world.fund_token(&world.caller, 100);

        let remaining = world
            .router()
            .robust_swap_for_nfts(
                &[buy(&a, 1, 50), buy(&b, 2, 50)],
                Rail::Token,
                100,
                &recipients(&world),
                DEADLINE,
            )
            .unwrap();
        assert_eq!(remaining, 80);
        assert_eq!(world.tokens(&world.caller), 80);
    }

    #[test]
    fn identity_and_funds_still_abort() {
        let world = World::new();
        let (a, _) = stocked_pool(&world, PoolVariant::EnumerableNative, 10, 9, 3);
        let (token, _) = stocked_pool(&world, PoolVariant::EnumerableToken, 1, 1, 3);
        world.fund_native(&world.caller, 500);
        let before = world.snapshot();
        let router = world.router();

        assert_router_error(
            world.atomically(|| {
                router.robust_swap_for_nfts(
                    &[buy(&a, 1, 10), buy(&token, 1, 10)],
                    Rail::Native,
                    100,
                    &recipients(&world),
                    DEADLINE,
                )
            }),
            RouterError::WrongSettlementRail,
        );
        assert_router_error(
            world.atomically(|| {
                router.robust_swap_for_nfts(
                    &[buy(&a, 3, 100)],
                    Rail::Native,
                    25,
                    &recipients(&world),
                    DEADLINE,
                )
            }),
            RouterError::InsufficientCallerFunds,
        );
        assert_router_error(
            world.atomically(|| {
                router.robust_swap_for_nfts(&[buy(&a, 1, 10)], Rail::Native, 100, &recipients(&world), NOW - 1)
            }),
            RouterError::DeadlineExpired,
        );
        assert_eq!(world.snapshot(), before);
    }

    #[test]
    fn skipped_sell_leg_keeps_its_nfts() {
        let world = World::new();
        let (a, _) = stocked_pool(&world, PoolVariant::EnumerableNative, 30, 25, 0);
        let (b, _) = stocked_pool(&world, PoolVariant::EnumerableNative, 30, 15, 0);
        let ids = world.mint_nfts(&world.caller, 2);

        let output = world
            .router()
            .robust_swap_nfts_for_currency(
                &[sell(&a, vec![ids[0]], 20), sell(&b, vec![ids[1]], 20)],
                Rail::Native,
                &world.caller,
                DEADLINE,
            )
            .unwrap();
        assert_eq!(output, 25);
        assert_eq!(world.owner_of(&ids[0]), Some(a.key));
        assert_eq!(world.owner_of(&ids[1]), Some(world.caller));
        assert_eq!(b.calls(), vec!["quote_sell"]);
    }

    #[test]
    fn combined_buy_then_sell_settles_both_sides() {
        let world = World::new();
        let (a, _) = stocked_pool(&world, PoolVariant::EnumerableNative, 10, 9, 3);
        let (b, _) = stocked_pool(&world, PoolVariant::MissingEnumerableNative, 40, 35, 0);
        let held = world.mint_nfts(&world.caller, 1);
        world.fund_native(&world.caller, 100);

        let settlement = world
            .router()
            .robust_swap_for_nfts_and_nfts_for_currency(
                &[buy(&a, 2, 25)],
                &[sell(&b, held.clone(), 30)],
                Rail::Native,
                50,
                &recipients(&world),
                DEADLINE,
            )
            .unwrap();
        assert_eq!(settlement, RobustSettlement { remaining: 30, output: 35 });
        assert_eq!(world.lamports(&world.caller), 100 - 20 + 35);
        assert_eq!(world.owner_of(&held[0]), Some(b.key));
        assert_eq!(world.nfts_of(&world.caller).len(), 2);
    }

    #[test]
    fn combined_call_needs_at_least_one_leg() {
        let world = World::new();
        assert_router_error(
            world.router().robust_swap_for_nfts_and_nfts_for_currency(
                &[],
                &[],
                Rail::Token,
                0,
                &recipients(&world),
                DEADLINE,
            ),
            RouterError::EmptyBatch,
        );
    }

    #[test]
    fn forged_pull_claim_and_short_budget_abort_token_buys() {
        let world = World::new();
        let (a, _) = stocked_pool(&world, PoolVariant::EnumerableToken, 10, 9, 3);
        let (b, _) = stocked_pool(&world, PoolVariant::MissingEnumerableToken, 10, 9, 3);
        b.claim.set(Some(PoolAttestation {
            pool: Pubkey::new_unique(),
            variant: PoolVariant::EnumerableToken,
        }));
        world.fund_token(&world.caller, 100);
        let before = world.snapshot();
        let router = world.router();

        // a fills first, then b's pull is rejected and a's fill unwinds with it
        assert_router_error(
            world.atomically(|| {
                router.robust_swap_for_nfts(
                    &[buy(&a, 1, 50), buy(&b, 1, 50)],
                    Rail::Token,
                    100,
                    &recipients(&world),
                    DEADLINE,
                )
            }),
            RouterError::UnauthorizedPullPayment,
        );
        assert_eq!(world.snapshot(), before);

        assert_router_error(
            world.atomically(|| {
                router.robust_swap_for_nfts(
                    &[buy(&a, 3, 100)],
                    Rail::Token,
                    25,
                    &recipients(&world),
                    DEADLINE,
                )
            }),
            RouterError::InsufficientCallerFunds,
        );
        assert_eq!(world.snapshot(), before);
    }

    #[test]
    fn token_sell_skips_leg_under_its_floor() {
        let world = World::new();
        let (a, _) = stocked_pool(&world, PoolVariant::EnumerableToken, 30, 25, 0);
        let (b, _) = stocked_pool(&world, PoolVariant::MissingEnumerableToken, 30, 15, 0);
        let ids = world.mint_nfts(&world.caller, 2);

        let output = world
            .router()
            .robust_swap_nfts_for_currency(
                &[sell(&a, vec![ids[0]], 20), sell(&b, vec![ids[1]], 20)],
                Rail::Token,
                &world.caller,
                DEADLINE,
            )
            .unwrap();
        assert_eq!(output, 25);
        assert_eq!(world.tokens(&world.caller), 25);
        assert_eq!(world.owner_of(&ids[0]), Some(a.key));
        assert_eq!(world.owner_of(&ids[1]), Some(world.caller));
        assert_eq!(b.calls(), vec!["quote_sell"]);
    }

    #[test]
    fn combined_token_call_pulls_only_what_the_buys_cost() {
        let world = World::new();
        let (a, _) = stocked_pool(&world, PoolVariant::EnumerableToken, 10, 9, 3);
        let (b, _) = stocked_pool(&world, PoolVariant::MissingEnumerableToken, 40, 35, 0);
        let held = world.mint_nfts(&world.caller, 1);
        world.fund_token(&world.caller, 100);

        let settlement = world
            .router()
            .robust_swap_for_nfts_and_nfts_for_currency(
                &[buy(&a, 2, 25)],
                &[sell(&b, held.clone(), 30)],
                Rail::Token,
                50,
                &recipients(&world),
                DEADLINE,
            )
            .unwrap();
        assert_eq!(settlement, RobustSettlement { remaining: 30, output: 35 });
        assert_eq!(world.tokens(&world.caller), 100 - 20 + 35);
        assert_eq!(world.tokens(&a.key), 10_000 + 20);
        assert_eq!(world.owner_of(&held[0]), Some(b.key));
        assert_eq!(world.nfts_of(&world.caller).len(), 2);
    }
}
