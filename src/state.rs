use anchor_lang::prelude::*;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::collections::BTreeSet;

use crate::errors::RouterError;

/// Immutable pool variant tag, stored by the pool and attested by the registry.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, AnchorSerialize, AnchorDeserialize, IntoPrimitive,
    TryFromPrimitive,
)]
#[repr(u8)]
pub enum PoolVariant {
    EnumerableNative = 0,
    MissingEnumerableNative = 1,
    EnumerableToken = 2,
    MissingEnumerableToken = 3,
}

impl PoolVariant {
    pub fn rail(self) -> Rail {
        match self {
            PoolVariant::EnumerableNative | PoolVariant::MissingEnumerableNative => Rail::Native,
            PoolVariant::EnumerableToken | PoolVariant::MissingEnumerableToken => Rail::Token,
        }
    }
}

/// Settlement currency of a call path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, AnchorSerialize, AnchorDeserialize)]
pub enum Rail {
    Native,
    Token,
}

/// Which NFTs a buy leg asks for.
#[derive(Clone, Debug, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub enum ItemSelection {
    Any { num_items: u64 },
    Specific { ids: Vec<Pubkey> },
}

impl ItemSelection {
    pub fn count(&self) -> u64 {
        match self {
            ItemSelection::Any { num_items } => *num_items,
            ItemSelection::Specific { ids } => ids.len() as u64,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            ItemSelection::Any { num_items } => {
                require!(*num_items > 0, RouterError::InvalidItemCount);
                Ok(())
            }
            ItemSelection::Specific { ids } => validate_ids(ids),
        }
    }
}

/// Ids of one leg must be non-empty and unique; availability is the pool's call.
pub fn validate_ids(ids: &[Pubkey]) -> Result<()> {
    require!(!ids.is_empty(), RouterError::InvalidItemCount);
    let mut seen = BTreeSet::new();
    for id in ids {
        require!(seen.insert(*id), RouterError::DuplicateItemId);
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct LegAny {
    pub pool: Pubkey,
    pub num_items: u64,
}

impl LegAny {
    pub fn selection(&self) -> ItemSelection {
        ItemSelection::Any { num_items: self.num_items }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct LegSpecific {
    pub pool: Pubkey,
    pub ids: Vec<Pubkey>,
}

impl LegSpecific {
    pub fn selection(&self) -> ItemSelection {
        ItemSelection::Specific { ids: self.ids.clone() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub enum BuyLegs {
    Any(Vec<LegAny>),
    Specific(Vec<LegSpecific>),
}

impl BuyLegs {
    pub fn len(&self) -> usize {
        match self {
            BuyLegs::Any(legs) => legs.len(),
            BuyLegs::Specific(legs) => legs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// (pool, selection) per leg, in order.
    pub fn selections(&self) -> Vec<(Pubkey, ItemSelection)> {
        match self {
            BuyLegs::Any(legs) => legs.iter().map(|l| (l.pool, l.selection())).collect(),
            BuyLegs::Specific(legs) => legs.iter().map(|l| (l.pool, l.selection())).collect(),
        }
    }
}

/// Sell these NFTs, then buy those, settled through one intermediary currency.
#[derive(Clone, Debug, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct BridgeTrade {
    pub sell_legs: Vec<LegSpecific>,
    pub buy_legs: BuyLegs,
}

/// Buy at some pools, sell straight back out at others; profit is the currency delta.
#[derive(Clone, Debug, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct RoundTripTrade {
    pub buy_legs: Vec<LegSpecific>,
    pub sell_legs: Vec<LegSpecific>,
}

#[derive(Clone, Debug, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct RobustBuyLeg {
    pub pool: Pubkey,
    pub items: ItemSelection,
    pub max_cost: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct RobustSellLeg {
    pub leg: LegSpecific,
    pub min_output: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct RobustTrade {
    pub buy_legs: Vec<RobustBuyLeg>,
    pub sell_legs: Vec<RobustSellLeg>,
}

/// Result of a combined robust buy + sell call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct RobustSettlement {
    pub remaining: u64,
    pub output: u64,
}

/// Where a leg's accounts live inside `remaining_accounts`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct LegAccountMapping {
    pub start_index: u8,
    pub account_count: u8,
}

/// Router configuration, written once by `initialize` and never mutated.
#[account]
pub struct RouterConfig {
    /// Program that creates and attests pools.
    pub registry: Pubkey,
    pub bump: u8,
}

impl RouterConfig {
    pub const LEN: usize = 8 + // discriminator
        32 + // registry
        1; // bump
}
