use anchor_lang::prelude::*;

use super::accounts::*;
use crate::errors::RouterError;
use crate::state::LegAccountMapping;

pub struct AccountResolver<'info> {
    remaining_accounts: &'info [AccountInfo<'info>],
}

impl<'info> AccountResolver<'info> {
    pub fn new(remaining_accounts: &'info [AccountInfo<'info>]) -> Self {
        Self { remaining_accounts }
    }

    /// One mapping per leg, in leg order.
    pub fn validate_mappings(&self, mappings: &[LegAccountMapping], leg_count: usize) -> Result<()> {
        if mappings.len() != leg_count {
            msg!(
                "Account mapping mismatch: {} mappings for {} legs",
                mappings.len(),
                leg_count
            );
            return err!(RouterError::InvalidAccountCount);
        }
        mappings
            .iter()
            .try_for_each(|mapping| self.validate_account_mapping(mapping))
    }

    pub fn validate_account_mapping(&self, mapping: &LegAccountMapping) -> Result<()> {
        let start_idx = mapping.start_index as usize;
        let required_count = mapping.account_count as usize;

        if required_count < LEG_FIXED_ACCOUNT_COUNT {
            msg!(
                "Account count too small: expected at least {}, got {}",
                LEG_FIXED_ACCOUNT_COUNT,
                required_count
            );
            return err!(RouterError::InvalidAccountCount);
        }
        if start_idx + required_count > self.remaining_accounts.len() {
            msg!(
                "Account validation failed: need {} accounts starting at {}, but only have {} total",
                required_count,
                start_idx,
                self.remaining_accounts.len()
            );
            return err!(RouterError::InsufficientAccounts);
        }
        Ok(())
    }

    /// Slices one leg's block and checks it really is `expected_pool` run by `pool_program`.
    pub fn resolve_leg(
        &self,
        mapping: &LegAccountMapping,
        expected_pool: &Pubkey,
    ) -> Result<LegAccounts<'info>> {
        self.validate_account_mapping(mapping)?;
        let start_idx = mapping.start_index as usize;
        let end_idx = start_idx + mapping.account_count as usize;
        let block = &self.remaining_accounts[start_idx..end_idx];

        let accounts = LegAccounts {
            pool_program: &block[0],
            pool_state: &block[1],
            registry_record: &block[2],
            extras: &block[LEG_FIXED_ACCOUNT_COUNT..],
        };

        require!(accounts.pool_program.executable, RouterError::InvalidAccount);
        require!(
            accounts.pool_state.owner == accounts.pool_program.key,
            RouterError::InvalidAccount
        );
        if accounts.pool_state.key != expected_pool {
            msg!(
                "Pool mismatch: leg names {}, accounts give {}",
                expected_pool,
                accounts.pool_state.key
            );
            return err!(RouterError::PoolKeyMismatch);
        }
        Ok(accounts)
    }
}
