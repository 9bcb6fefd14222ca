use anchor_lang::prelude::*;

use super::gateway::PullPaymentGateway;
use super::types::*;
use crate::errors::RouterError;
use crate::state::Rail;

/// Orchestrates one router call: guards, per-leg pool calls and settlement.
///
/// Built fresh per instruction. It holds no balances of its own; everything it
/// touches goes through the injected registry and custody.
pub struct SwapRouter<'a> {
    registry: &'a dyn PoolRegistry,
    pub(crate) custody: &'a dyn Custody,
    gateway: PullPaymentGateway<'a>,
    pub(crate) caller: Pubkey,
    now: i64,
}

impl<'a> SwapRouter<'a> {
    pub fn new(
        registry: &'a dyn PoolRegistry,
        custody: &'a dyn Custody,
        caller: Pubkey,
        now: i64,
    ) -> Self {
        Self {
            registry,
            custody,
            gateway: PullPaymentGateway::new(registry, custody),
            caller,
            now,
        }
    }

    pub fn gateway(&self) -> &PullPaymentGateway<'a> {
        &self.gateway
    }

    /// Checked before anything moves.
    pub fn check_deadline(&self, deadline: i64) -> Result<()> {
        if self.now > deadline {
            msg!("[DEADLINE] now={} deadline={}", self.now, deadline);
            return err!(RouterError::DeadlineExpired);
        }
        Ok(())
    }

    /// Rail check from the variant tag, then a fresh registry lookup. Never cached:
    /// a pool can re-enter or change registry state between legs.
    pub fn verify_pool(&self, pool: &dyn PoolCollaborator, rail: Rail) -> Result<PoolHandle> {
        let handle = PoolHandle {
            key: pool.key(),
            variant: pool.variant()?,
        };
        if handle.rail() != rail {
            msg!(
                "[VERIFY] pool={} variant={:?} expected rail={:?}",
                handle.key,
                handle.variant,
                rail
            );
            return err!(RouterError::WrongSettlementRail);
        }
        if !self.registry.is_pool(&handle.key, handle.variant)? {
            msg!("[VERIFY] pool={} not attested as {:?}", handle.key, handle.variant);
            return err!(RouterError::UnverifiedPool);
        }
        Ok(handle)
    }

    pub(crate) fn payment(&self, rail: Rail) -> Result<Payment<'_>> {
        Ok(match rail {
            Rail::Native => Payment::Attached {
                escrow: self.custody.escrow()?,
            },
            Rail::Token => Payment::Pull {
                gateway: &self.gateway,
                source: self.caller,
            },
        })
    }

    /// Moves the caller's attached native value into escrow for the native rail.
    pub(crate) fn attach(&self, rail: Rail, input_amount: u64) -> Result<()> {
        if rail == Rail::Native && input_amount > 0 {
            self.custody.deposit_native(&self.caller, input_amount)?;
        }
        Ok(())
    }

    /// Returns whatever is left in escrow. Token budgets never left the caller.
    pub(crate) fn refund(&self, rail: Rail, to: &Pubkey, remaining: u64) -> Result<()> {
        if rail == Rail::Native && remaining > 0 {
            self.custody.release_native(to, remaining)?;
        }
        Ok(())
    }
}
