//! In-memory ledger, registry and pools for driving the router off-chain.
//!
//! `World::atomically` stands in for the runtime: a failed call restores the
//! ledger and registry exactly as they were.

use anchor_lang::prelude::*;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use super::router::SwapRouter;
use super::types::*;
use crate::state::{ItemSelection, PoolVariant, Rail};

pub const NOW: i64 = 1_700_000_000;
pub const DEADLINE: i64 = NOW + 60;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ledger {
    pub lamports: HashMap<Pubkey, u64>,
    /// (mint, owner) -> amount
    pub tokens: HashMap<(Pubkey, Pubkey), u64>,
    /// id -> owner
    pub nfts: BTreeMap<Pubkey, Pubkey>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    ledger: Ledger,
    registry: HashMap<Pubkey, PoolVariant>,
}

pub struct World {
    ledger: RefCell<Ledger>,
    registry: RefCell<HashMap<Pubkey, PoolVariant>>,
    pub caller: Pubkey,
    pub escrow: Pubkey,
    pub mint: Pubkey,
    pub now: i64,
}

fn ledger_error() -> anchor_lang::error::Error {
    ProgramError::InsufficientFunds.into()
}

fn pool_error() -> anchor_lang::error::Error {
    ProgramError::Custom(1).into()
}

impl World {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            ledger: RefCell::new(Ledger::default()),
            registry: RefCell::new(HashMap::new()),
            caller: Pubkey::new_unique(),
            escrow: Pubkey::new_unique(),
            mint: Pubkey::new_unique(),
            now: NOW,
        })
    }

    pub fn router(&self) -> SwapRouter<'_> {
        SwapRouter::new(self, self, self.caller, self.now)
    }

    pub fn register(&self, pool: &MockPool) {
        self.register_as(&pool.key, pool.variant);
    }

    pub fn register_as(&self, pool: &Pubkey, variant: PoolVariant) {
        self.registry.borrow_mut().insert(*pool, variant);
    }

    pub fn deregister(&self, pool: &Pubkey) {
        self.registry.borrow_mut().remove(pool);
    }

    pub fn fund_native(&self, who: &Pubkey, amount: u64) {
        *self.ledger.borrow_mut().lamports.entry(*who).or_default() += amount;
    }

    pub fn fund_token(&self, who: &Pubkey, amount: u64) {
        *self
            .ledger
            .borrow_mut()
            .tokens
            .entry((self.mint, *who))
            .or_default() += amount;
    }

    pub fn mint_nfts(&self, owner: &Pubkey, count: usize) -> Vec<Pubkey> {
        let mut ledger = self.ledger.borrow_mut();
        (0..count)
            .map(|_| {
                let id = Pubkey::new_unique();
                ledger.nfts.insert(id, *owner);
                id
            })
            .collect()
    }

    pub fn lamports(&self, who: &Pubkey) -> u64 {
        self.ledger.borrow().lamports.get(who).copied().unwrap_or(0)
    }

    pub fn tokens(&self, who: &Pubkey) -> u64 {
        self.ledger
            .borrow()
            .tokens
            .get(&(self.mint, *who))
            .copied()
            .unwrap_or(0)
    }

    pub fn owner_of(&self, id: &Pubkey) -> Option<Pubkey> {
        self.ledger.borrow().nfts.get(id).copied()
    }

    pub fn nfts_of(&self, owner: &Pubkey) -> Vec<Pubkey> {
        self.ledger
            .borrow()
            .nfts
            .iter()
            .filter(|(_, o)| *o == owner)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            ledger: self.ledger.borrow().clone(),
            registry: self.registry.borrow().clone(),
        }
    }

    /// Runs `f` with all-or-nothing semantics.
    pub fn atomically<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let before = self.snapshot();
        let result = f();
        if result.is_err() {
            *self.ledger.borrow_mut() = before.ledger;
            *self.registry.borrow_mut() = before.registry;
        }
        result
    }

    fn move_lamports(&self, from: &Pubkey, to: &Pubkey, amount: u64) -> Result<()> {
        let mut ledger = self.ledger.borrow_mut();
        let balance = ledger.lamports.entry(*from).or_default();
        *balance = balance.checked_sub(amount).ok_or_else(ledger_error)?;
        *ledger.lamports.entry(*to).or_default() += amount;
        Ok(())
    }

    fn move_tokens(&self, mint: &Pubkey, from: &Pubkey, to: &Pubkey, amount: u64) -> Result<()> {
        let mut ledger = self.ledger.borrow_mut();
        let balance = ledger.tokens.entry((*mint, *from)).or_default();
        *balance = balance.checked_sub(amount).ok_or_else(ledger_error)?;
        *ledger.tokens.entry((*mint, *to)).or_default() += amount;
        Ok(())
    }

    fn move_nft(&self, id: &Pubkey, from: &Pubkey, to: &Pubkey) -> Result<()> {
        let mut ledger = self.ledger.borrow_mut();
        match ledger.nfts.get_mut(id) {
            Some(owner) if owner == from => {
                *owner = *to;
                Ok(())
            }
            _ => Err(ledger_error()),
        }
    }
}

impl PoolRegistry for World {
    fn is_pool(&self, pool: &Pubkey, variant: PoolVariant) -> Result<bool> {
        Ok(self.registry.borrow().get(pool) == Some(&variant))
    }
}

impl Custody for World {
    fn escrow(&self) -> Result<Pubkey> {
        Ok(self.escrow)
    }

    fn deposit_native(&self, from: &Pubkey, amount: u64) -> Result<()> {
        self.move_lamports(from, &self.escrow, amount)
    }

    fn release_native(&self, to: &Pubkey, amount: u64) -> Result<()> {
        self.move_lamports(&self.escrow, to, amount)
    }

    fn transfer_nft(&self, id: &Pubkey, from: &Pubkey, to: &Pubkey) -> Result<()> {
        self.move_nft(id, from, to)
    }

    fn transfer_token(&self, mint: &Pubkey, from: &Pubkey, to: &Pubkey, amount: u64) -> Result<()> {
        self.move_tokens(mint, from, to, amount)
    }

    fn balance(&self, rail: Rail, owner: &Pubkey) -> Result<u64> {
        Ok(match rail {
            Rail::Native => self.lamports(owner),
            Rail::Token => self.tokens(owner),
        })
    }
}

/// Flat-priced pool: every item costs `buy_price` and fetches `sell_price`.
pub struct MockPool {
    pub key: Pubkey,
    pub variant: PoolVariant,
    world: Rc<World>,
    pub buy_price: Cell<u64>,
    pub sell_price: Cell<u64>,
    pub quotes_available: Cell<bool>,
    /// What the pool presents to the gateway instead of its own attestation.
    pub claim: Cell<Option<PoolAttestation>>,
    pub deregister_on_swap: Cell<bool>,
    /// Extra amount reported on top of what was actually charged.
    pub overreport: Cell<u64>,
    /// Amount withheld from sale proceeds while still reporting the full output.
    pub underpay: Cell<u64>,
    pub calls: RefCell<Vec<String>>,
    pending: Cell<Option<(u64, usize)>>,
}

impl MockPool {
    pub fn new(world: &Rc<World>, variant: PoolVariant, buy_price: u64, sell_price: u64) -> Self {
        Self {
            key: Pubkey::new_unique(),
            variant,
            world: Rc::clone(world),
            buy_price: Cell::new(buy_price),
            sell_price: Cell::new(sell_price),
            quotes_available: Cell::new(true),
            claim: Cell::new(None),
            deregister_on_swap: Cell::new(false),
            overreport: Cell::new(0),
            underpay: Cell::new(0),
            calls: RefCell::new(Vec::new()),
            pending: Cell::new(None),
        }
    }

    pub fn attestation(&self) -> PoolAttestation {
        PoolAttestation {
            pool: self.key,
            variant: self.variant,
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn log(&self, call: &str) {
        self.calls.borrow_mut().push(call.to_string());
    }

    fn price(&self, num_items: u64, unit: u64) -> Result<u64> {
        num_items.checked_mul(unit).ok_or_else(pool_error)
    }

    fn quote(&self, num_items: u64, unit: u64) -> Result<Quote> {
        if !self.quotes_available.get() {
            return Ok(Quote::unavailable(1));
        }
        Ok(Quote::available(self.price(num_items, unit)?))
    }
}

impl PoolCollaborator for MockPool {
    fn key(&self) -> Pubkey {
        self.key
    }

    fn variant(&self) -> Result<PoolVariant> {
        Ok(self.variant)
    }

    fn quote_buy(&self, num_items: u64) -> Result<Quote> {
        self.log("quote_buy");
        self.quote(num_items, self.buy_price.get())
    }

    fn quote_sell(&self, num_items: u64) -> Result<Quote> {
        self.log("quote_sell");
        self.quote(num_items, self.sell_price.get())
    }

    fn swap_buy(
        &self,
        items: &ItemSelection,
        max_input: u64,
        nft_recipient: &Pubkey,
        payment: Payment<'_>,
    ) -> Result<u64> {
        self.log("swap_buy");
        let cost = self.price(items.count(), self.buy_price.get())?;
        if cost > max_input {
            return Err(pool_error());
        }
        let ids: Vec<Pubkey> = match items {
            ItemSelection::Any { num_items } => self
                .world
                .nfts_of(&self.key)
                .into_iter()
                .take(*num_items as usize)
                .collect(),
            ItemSelection::Specific { ids } => ids.clone(),
        };
        if ids.len() as u64 != items.count() {
            return Err(pool_error());
        }
        match payment {
            Payment::Attached { escrow } => self.world.move_lamports(&escrow, &self.key, cost)?,
            Payment::Pull { gateway, source } => {
                let claim = self.claim.get().unwrap_or_else(|| self.attestation());
                gateway.pull_payment(&claim, &self.world.mint, &source, cost)?
            }
        }
        for id in &ids {
            self.world.move_nft(id, &self.key, nft_recipient)?;
        }
        if self.deregister_on_swap.get() {
            self.world.deregister(&self.key);
        }
        Ok(cost + self.overreport.get())
    }

    fn begin_sell(&self, expected_items: u64) -> Result<()> {
        self.log("begin_sell");
        let baseline = self.world.nfts_of(&self.key).len();
        self.pending.set(Some((expected_items, baseline)));
        Ok(())
    }

    fn complete_sell(&self, min_output: u64, recipient: &Pubkey) -> Result<u64> {
        self.log("complete_sell");
        let (expected, baseline) = self.pending.take().ok_or_else(pool_error)?;
        let received = self.world.nfts_of(&self.key).len().saturating_sub(baseline);
        if received as u64 != expected {
            return Err(pool_error());
        }
        let output = self.price(expected, self.sell_price.get())?;
        if output < min_output {
            return Err(pool_error());
        }
        let paid = output.saturating_sub(self.underpay.get());
        match self.variant.rail() {
            Rail::Native => self.world.move_lamports(&self.key, recipient, paid)?,
            Rail::Token => self
                .world
                .move_tokens(&self.world.mint, &self.key, recipient, paid)?,
        }
        Ok(output)
    }
}

/// Registered pool holding `items` NFTs and enough currency to buy some back.
pub fn stocked_pool(
    world: &Rc<World>,
    variant: PoolVariant,
    buy_price: u64,
    sell_price: u64,
    items: usize,
) -> (MockPool, Vec<Pubkey>) {
    let pool = MockPool::new(world, variant, buy_price, sell_price);
    world.register(&pool);
    let ids = world.mint_nfts(&pool.key, items);
    match variant.rail() {
        Rail::Native => world.fund_native(&pool.key, 10_000),
        Rail::Token => world.fund_token(&pool.key, 10_000),
    }
    (pool, ids)
}

pub fn recipients(world: &World) -> Recipients {
    Recipients {
        currency: world.caller,
        nfts: world.caller,
    }
}
