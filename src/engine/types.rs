use anchor_lang::prelude::*;

use crate::errors::RouterError;
use crate::state::{ItemSelection, PoolVariant, Rail};

/// A pool whose variant and registry attestation were checked for this leg.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolHandle {
    pub key: Pubkey,
    pub variant: PoolVariant,
}

impl PoolHandle {
    pub fn rail(&self) -> Rail {
        self.variant.rail()
    }
}

/// Identity a pool presents to the pull-payment gateway, re-validated on every call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolAttestation {
    pub pool: Pubkey,
    pub variant: PoolVariant,
}

/// Live quote from a pool. A non-zero status means the pool cannot fill the size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Quote {
    pub status: u8,
    pub amount: u64,
}

impl Quote {
    pub const OK: u8 = 0;

    pub fn available(amount: u64) -> Self {
        Self { status: Self::OK, amount }
    }

    pub fn unavailable(status: u8) -> Self {
        Self { status, amount: 0 }
    }

    pub fn amount(&self) -> Option<u64> {
        (self.status == Self::OK).then_some(self.amount)
    }

    pub fn require_amount(&self) -> Result<u64> {
        self.amount().ok_or_else(|| error!(RouterError::QuoteUnavailable))
    }
}

/// How a pool gets paid during a buy.
pub enum Payment<'g> {
    /// Funds sit in the router escrow; the pool may take up to the swap's `max_input`.
    Attached { escrow: Pubkey },
    /// The pool is paid from `source` by `PullPayment::pull_payment`, which only
    /// ever credits the claiming pool.
    Pull {
        gateway: &'g dyn PullPayment,
        source: Pubkey,
    },
}

pub struct Recipients {
    /// Receives refunds, sale proceeds and profit.
    pub currency: Pubkey,
    pub nfts: Pubkey,
}

/// Source of truth for "is this a genuine pool of this variant".
pub trait PoolRegistry {
    fn is_pool(&self, pool: &Pubkey, variant: PoolVariant) -> Result<bool>;
}

/// External pool. Every method is a call across a trust boundary.
pub trait PoolCollaborator {
    fn key(&self) -> Pubkey;

    fn variant(&self) -> Result<PoolVariant>;

    fn quote_buy(&self, num_items: u64) -> Result<Quote>;

    fn quote_sell(&self, num_items: u64) -> Result<Quote>;

    /// Delivers the items to `nft_recipient` and returns the amount actually charged.
    fn swap_buy(
        &self,
        items: &ItemSelection,
        max_input: u64,
        nft_recipient: &Pubkey,
        payment: Payment<'_>,
    ) -> Result<u64>;

    /// Latches swap mode for the next `expected_items` incoming NFTs.
    fn begin_sell(&self, expected_items: u64) -> Result<()>;

    /// Pays for the NFTs received since `begin_sell` and returns the amount paid.
    fn complete_sell(&self, min_output: u64, recipient: &Pubkey) -> Result<u64>;
}

/// Asset movements the router performs itself.
pub trait Custody {
    /// Transient holding account for native value attached to a call.
    fn escrow(&self) -> Result<Pubkey>;

    fn deposit_native(&self, from: &Pubkey, amount: u64) -> Result<()>;

    fn release_native(&self, to: &Pubkey, amount: u64) -> Result<()>;

    fn transfer_nft(&self, id: &Pubkey, from: &Pubkey, to: &Pubkey) -> Result<()>;

    fn transfer_token(&self, mint: &Pubkey, from: &Pubkey, to: &Pubkey, amount: u64)
        -> Result<()>;

    /// `owner`'s balance in the rail's currency: lamports, or the settlement token.
    fn balance(&self, rail: Rail, owner: &Pubkey) -> Result<u64>;
}

pub trait PullPayment {
    fn authorize(&self, claim: &PoolAttestation) -> Result<()>;

    fn pull_payment(
        &self,
        claim: &PoolAttestation,
        mint: &Pubkey,
        source: &Pubkey,
        amount: u64,
    ) -> Result<()>;
}

pub struct BuyLeg<'p> {
    pub pool: &'p dyn PoolCollaborator,
    pub items: ItemSelection,
}

pub struct SellLeg<'p> {
    pub pool: &'p dyn PoolCollaborator,
    pub ids: Vec<Pubkey>,
}

pub struct RobustBuy<'p> {
    pub leg: BuyLeg<'p>,
    pub max_cost: u64,
}

pub struct RobustSell<'p> {
    pub leg: SellLeg<'p>,
    pub min_output: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::assert_router_error;

    #[test]
    fn quote_status_gates_amount() {
        assert_eq!(Quote::available(70).amount(), Some(70));
        assert_eq!(Quote::unavailable(2).amount(), None);
        assert_eq!(Quote::available(5).require_amount().unwrap(), 5);
        assert_router_error(
            Quote::unavailable(1).require_amount(),
            RouterError::QuoteUnavailable,
        );
    }
}
