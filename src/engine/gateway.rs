use anchor_lang::prelude::*;

use super::types::{Custody, PoolAttestation, PoolRegistry, PullPayment};
use crate::errors::RouterError;
use crate::state::Rail;

/// Lets attested token pools collect from a caller who approved the router once.
///
/// Every token-rail payment goes through `pull_payment`, and funds only ever move
/// to `claim.pool`, so a claim naming someone else's pool cannot redirect them.
/// The delegate signature itself never leaves the router. Inside a router swap
/// the claim is built from the verified leg pool; the standalone instruction
/// binds it to the signing pool.
pub struct PullPaymentGateway<'a> {
    registry: &'a dyn PoolRegistry,
    custody: &'a dyn Custody,
}

impl<'a> PullPaymentGateway<'a> {
    pub fn new(registry: &'a dyn PoolRegistry, custody: &'a dyn Custody) -> Self {
        Self { registry, custody }
    }
}

impl PullPayment for PullPaymentGateway<'_> {
    fn authorize(&self, claim: &PoolAttestation) -> Result<()> {
        if claim.variant.rail() != Rail::Token {
            msg!("[PULL] rejected pool={} variant={:?}", claim.pool, claim.variant);
            return err!(RouterError::UnauthorizedPullPayment);
        }
        if !self.registry.is_pool(&claim.pool, claim.variant)? {
            msg!("[PULL] rejected pool={} not attested", claim.pool);
            return err!(RouterError::UnauthorizedPullPayment);
        }
        Ok(())
    }

    fn pull_payment(
        &self,
        claim: &PoolAttestation,
        mint: &Pubkey,
        source: &Pubkey,
        amount: u64,
    ) -> Result<()> {
        self.authorize(claim)?;
        self.custody.transfer_token(mint, source, &claim.pool, amount)?;
        msg!(
            "[PULL] pool={} source={} mint={} amount={}",
            claim.pool,
            source,
            mint,
            amount
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testkit::*;
    use crate::errors::assert_router_error;
    use crate::state::PoolVariant;

    #[test]
    fn attested_token_pool_collects() {
        let world = World::new();
        let pool = MockPool::new(&world, PoolVariant::EnumerableToken, 10, 9);
        world.register(&pool);
        world.fund_token(&world.caller, 500);
        let router = world.router();

        router
            .gateway()
            .pull_payment(&pool.attestation(), &world.mint, &world.caller, 120)
            .unwrap();
        assert_eq!(world.tokens(&world.caller), 380);
        assert_eq!(world.tokens(&pool.key), 120);
    }

    #[test]
    fn rejects_unattested_and_native_claims() {
        let world = World::new();
        let stranger = MockPool::new(&world, PoolVariant::EnumerableToken, 10, 9);
        let native = MockPool::new(&world, PoolVariant::EnumerableNative, 10, 9);
        world.register(&native);
        world.fund_token(&world.caller, 500);
        let before = world.snapshot();
        let router = world.router();
        let gateway = router.gateway();

        // well-formed token/source/amount, but nobody attested this pool
        assert_router_error(
            gateway.pull_payment(&stranger.attestation(), &world.mint, &world.caller, 10),
            RouterError::UnauthorizedPullPayment,
        );
        // attested, but as a native pool
        assert_router_error(
            gateway.pull_payment(&native.attestation(), &world.mint, &world.caller, 10),
            RouterError::UnauthorizedPullPayment,
        );
        // genuine native pool claiming a token variant it was never registered as
        let forged = PoolAttestation {
            pool: native.key,
            variant: PoolVariant::EnumerableToken,
        };
        assert_router_error(
            gateway.pull_payment(&forged, &world.mint, &world.caller, 10),
            RouterError::UnauthorizedPullPayment,
        );
        assert_eq!(world.snapshot(), before);
    }

    #[test]
    fn attestation_is_not_cached() {
        let world = World::new();
        let pool = MockPool::new(&world, PoolVariant::MissingEnumerableToken, 10, 9);
        world.register(&pool);
        world.fund_token(&world.caller, 50);
        let router = world.router();

        assert!(router.gateway().authorize(&pool.attestation()).is_ok());
        world.deregister(&pool.key);
        assert_router_error(
            router.gateway().authorize(&pool.attestation()),
            RouterError::UnauthorizedPullPayment,
        );
    }
}
