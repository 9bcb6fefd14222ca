use anchor_lang::prelude::*;
use anchor_lang::system_program;
use anchor_spl::token;

use super::types::PdaSigner;
use crate::account_derivation::{find_token_account, token_account_amount};
use crate::engine::Custody;
use crate::errors::RouterError;
use crate::state::Rail;

/// Asset movements on Solana: system transfers for the escrow, SPL transfers
/// for NFTs and the settlement token.
///
/// Token accounts are located in `accounts` by (mint, owner), the same way the
/// caller's ATAs are found.
pub struct CpiCustody<'info> {
    caller: AccountInfo<'info>,
    token_program: AccountInfo<'info>,
    system_program: AccountInfo<'info>,
    escrow: Option<PdaSigner<'info>>,
    delegate: Option<PdaSigner<'info>>,
    mint: Option<Pubkey>,
    accounts: Vec<AccountInfo<'info>>,
}

impl<'info> CpiCustody<'info> {
    pub fn new(
        caller: AccountInfo<'info>,
        token_program: AccountInfo<'info>,
        system_program: AccountInfo<'info>,
        accounts: &[AccountInfo<'info>],
    ) -> Self {
        Self {
            caller,
            token_program,
            system_program,
            escrow: None,
            delegate: None,
            mint: None,
            accounts: accounts.to_vec(),
        }
    }

    pub fn with_escrow(mut self, escrow: PdaSigner<'info>) -> Self {
        self.escrow = Some(escrow);
        self
    }

    /// Token rail: `delegate` is the PDA the caller approved on their `mint` account.
    pub fn with_delegate(mut self, delegate: PdaSigner<'info>, mint: Pubkey) -> Self {
        self.delegate = Some(delegate);
        self.mint = Some(mint);
        self
    }

    pub fn caller(&self) -> &AccountInfo<'info> {
        &self.caller
    }

    pub fn token_program(&self) -> &AccountInfo<'info> {
        &self.token_program
    }

    pub fn system_program(&self) -> &AccountInfo<'info> {
        &self.system_program
    }

    pub fn escrow_signer(&self) -> Result<&PdaSigner<'info>> {
        self.escrow
            .as_ref()
            .ok_or_else(|| error!(RouterError::WrongSettlementRail))
    }

    pub fn delegate_signer(&self) -> Result<&PdaSigner<'info>> {
        self.delegate
            .as_ref()
            .ok_or_else(|| error!(RouterError::WrongSettlementRail))
    }

    /// Settlement token mint; only set on the token rail.
    pub fn mint(&self) -> Result<Pubkey> {
        self.mint.ok_or_else(|| error!(RouterError::WrongSettlementRail))
    }

    /// `owner`'s account for the settlement token.
    pub fn settlement_account(&self, owner: &Pubkey) -> Result<&AccountInfo<'info>> {
        find_token_account(&self.accounts, &self.mint()?, owner)
    }

    /// Any account the router may hand to a pool, by key.
    pub fn lookup(&self, key: &Pubkey) -> Result<&AccountInfo<'info>> {
        if self.caller.key == key {
            return Ok(&self.caller);
        }
        let signers = self.escrow.iter().chain(self.delegate.iter());
        if let Some(signer) = signers.map(|s| &s.account).find(|ai| ai.key == key) {
            return Ok(signer);
        }
        match self.accounts.iter().find(|ai| ai.key == key) {
            Some(ai) => Ok(ai),
            None => {
                msg!("[CUSTODY] account {} not provided", key);
                err!(RouterError::AccountNotFound)
            }
        }
    }

    fn require_caller(&self, who: &Pubkey) -> Result<()> {
        require!(self.caller.key == who, RouterError::InvalidAccount);
        Ok(())
    }
}

impl Custody for CpiCustody<'_> {
    fn escrow(&self) -> Result<Pubkey> {
        Ok(self.escrow_signer()?.key())
    }

    fn deposit_native(&self, from: &Pubkey, amount: u64) -> Result<()> {
        self.require_caller(from)?;
        let escrow = self.escrow_signer()?;
        system_program::transfer(
            CpiContext::new(
                self.system_program.clone(),
                system_program::Transfer {
                    from: self.caller.clone(),
                    to: escrow.account.clone(),
                },
            ),
            amount,
        )?;
        msg!("[CUSTODY] deposit {} -> escrow {}", amount, escrow.key());
        Ok(())
    }

    fn release_native(&self, to: &Pubkey, amount: u64) -> Result<()> {
        let escrow = self.escrow_signer()?;
        let seeds = escrow.seeds();
        let signer_seeds = [&seeds[..]];
        system_program::transfer(
            CpiContext::new_with_signer(
                self.system_program.clone(),
                system_program::Transfer {
                    from: escrow.account.clone(),
                    to: self.lookup(to)?.clone(),
                },
                &signer_seeds,
            ),
            amount,
        )?;
        msg!("[CUSTODY] release {} -> {}", amount, to);
        Ok(())
    }

    fn transfer_nft(&self, id: &Pubkey, from: &Pubkey, to: &Pubkey) -> Result<()> {
        self.require_caller(from)?;
        let source = find_token_account(&self.accounts, id, from)?;
        let destination = find_token_account(&self.accounts, id, to)?;
        token::transfer(
            CpiContext::new(
                self.token_program.clone(),
                token::Transfer {
                    from: source.clone(),
                    to: destination.clone(),
                    authority: self.caller.clone(),
                },
            ),
            1,
        )
    }

    fn transfer_token(&self, mint: &Pubkey, from: &Pubkey, to: &Pubkey, amount: u64) -> Result<()> {
        let delegate = self.delegate_signer()?;
        let source = find_token_account(&self.accounts, mint, from)?;
        let destination = find_token_account(&self.accounts, mint, to)?;

        let seeds = delegate.seeds();
        let signer_seeds = [&seeds[..]];
        token::transfer(
            CpiContext::new_with_signer(
                self.token_program.clone(),
                token::Transfer {
                    from: source.clone(),
                    to: destination.clone(),
                    authority: delegate.account.clone(),
                },
                &signer_seeds,
            ),
            amount,
        )
    }

    fn balance(&self, rail: Rail, owner: &Pubkey) -> Result<u64> {
        match rail {
            Rail::Native => Ok(self.lookup(owner)?.lamports()),
            Rail::Token => token_account_amount(self.settlement_account(owner)?),
        }
    }
}
