use anchor_lang::prelude::*;

use crate::account_derivation::pda_seeds;
use crate::errors::RouterError;
use crate::state::RouterConfig;

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,
    #[account(
        init,
        payer = payer,
        space = RouterConfig::LEN,
        seeds = [pda_seeds::CONFIG],
        bump
    )]
    pub config: Account<'info, RouterConfig>,
    pub system_program: Program<'info, System>,
}

/// Binds the router to its pool registry. The config PDA can only be created once.
pub fn initialize(ctx: Context<Initialize>, registry: Pubkey) -> Result<()> {
    require!(registry != Pubkey::default(), RouterError::InvalidAccount);

    let config = &mut ctx.accounts.config;
    config.registry = registry;
    config.bump = ctx.bumps.config;

    msg!("[INIT] config={} registry={}", config.key(), registry);
    Ok(())
}
