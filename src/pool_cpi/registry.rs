use anchor_lang::prelude::*;

use crate::account_derivation::{layout, pool_record_address};
use crate::engine::PoolRegistry;
use crate::errors::RouterError;
use crate::state::PoolVariant;

/// 注册表程序为每个池子写的记录
/// layout: discriminator(8) + pool(32) + variant(1)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolRecord {
    pub pool: Pubkey,
    pub variant: PoolVariant,
}

impl PoolRecord {
    pub fn decode(data: &[u8]) -> Result<Self> {
        require!(data.len() >= layout::POOL_RECORD_LEN, RouterError::InvalidAccount);
        require!(
            &data[..8] == layout::POOL_RECORD_DISCRIMINATOR,
            RouterError::InvalidAccount
        );
        let pool = Pubkey::try_from(&data[8..40]).map_err(|_| error!(RouterError::InvalidAccount))?;
        let variant =
            PoolVariant::try_from(data[40]).map_err(|_| error!(RouterError::UnknownPoolVariant))?;
        Ok(Self { pool, variant })
    }
}

/// Registry view over the record accounts passed into this instruction.
///
/// A pool counts as attested only if its record sits at the expected PDA, is
/// owned by the configured registry program and names the same pool and variant.
pub struct AccountRegistry<'info> {
    program_id: Pubkey,
    records: Vec<AccountInfo<'info>>,
}

impl<'info> AccountRegistry<'info> {
    pub fn new(program_id: Pubkey, records: &[AccountInfo<'info>]) -> Self {
        Self {
            program_id,
            records: records.to_vec(),
        }
    }
}

impl PoolRegistry for AccountRegistry<'_> {
    fn is_pool(&self, pool: &Pubkey, variant: PoolVariant) -> Result<bool> {
        let address = pool_record_address(pool, &self.program_id);
        let Some(record) = self.records.iter().find(|ai| ai.key == &address) else {
            msg!("[REGISTRY] no record {} for pool {}", address, pool);
            return Ok(false);
        };
        if record.owner != &self.program_id {
            msg!("[REGISTRY] record {} owned by {}", address, record.owner);
            return Ok(false);
        }
        let data = record.try_borrow_data()?;
        match PoolRecord::decode(&data) {
            Ok(decoded) => Ok(decoded.pool == *pool && decoded.variant == variant),
            Err(_) => Ok(false),
        }
    }
}
