use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::account_derivation::{log_account_fingerprint, pda_seeds};
use crate::account_resolver::AccountResolver;
use crate::engine::{BuyLeg, Recipients, SellLeg};
use crate::errors::RouterError;
use crate::pool_cpi::{CpiCustody, CpiPool, PdaSigner};
use crate::state::{ItemSelection, LegAccountMapping, LegSpecific, RouterConfig};

// ==============================================================================================
// 路由指令的公共账户（按结算币种分两套）
// - remaining_accounts: 每条腿一个账户块 [pool_program, pool_state, registry_record, extras...]，
//   以及所有涉及的代币账户（按 mint+owner 扫描定位）。
// - 组合交易的 leg_accounts 顺序: 先卖出腿，后买入腿。
// ==============================================================================================

#[derive(Accounts)]
pub struct NativeSwap<'info> {
    #[account(mut)]
    pub caller: Signer<'info>,
    #[account(seeds = [pda_seeds::CONFIG], bump = config.bump)]
    pub config: Account<'info, RouterConfig>,
    /// CHECK: system-owned PDA; filled from the caller and emptied before the instruction returns
    #[account(mut, seeds = [pda_seeds::ESCROW, caller.key().as_ref()], bump)]
    pub escrow: UncheckedAccount<'info>,
    /// CHECK: receives refunds, sale proceeds and profit
    #[account(mut)]
    pub currency_recipient: UncheckedAccount<'info>,
    /// CHECK: owner of the token accounts bought NFTs are delivered to
    pub nft_recipient: UncheckedAccount<'info>,
    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

impl<'info> NativeSwap<'info> {
    pub fn custody(&self, remaining: &[AccountInfo<'info>], escrow_bump: u8) -> CpiCustody<'info> {
        let caller = self.caller.key();
        let mut accounts = vec![
            self.currency_recipient.to_account_info(),
            self.nft_recipient.to_account_info(),
        ];
        accounts.extend_from_slice(remaining);

        CpiCustody::new(
            self.caller.to_account_info(),
            self.token_program.to_account_info(),
            self.system_program.to_account_info(),
            &accounts,
        )
        .with_escrow(PdaSigner::new(
            self.escrow.to_account_info(),
            &[pda_seeds::ESCROW, caller.as_ref()],
            escrow_bump,
        ))
    }

    pub fn recipients(&self) -> Recipients {
        Recipients {
            currency: self.currency_recipient.key(),
            nfts: self.nft_recipient.key(),
        }
    }
}

#[derive(Accounts)]
pub struct TokenSwap<'info> {
    #[account(mut)]
    pub caller: Signer<'info>,
    #[account(seeds = [pda_seeds::CONFIG], bump = config.bump)]
    pub config: Account<'info, RouterConfig>,
    /// CHECK: PDA the caller approved as delegate on `caller_funds`
    #[account(seeds = [pda_seeds::DELEGATE, caller.key().as_ref()], bump)]
    pub delegate: UncheckedAccount<'info>,
    pub mint: Account<'info, Mint>,
    #[account(mut, token::mint = mint, token::authority = caller)]
    pub caller_funds: Account<'info, TokenAccount>,
    /// CHECK: owner of the token account sale proceeds are paid to
    pub currency_recipient: UncheckedAccount<'info>,
    /// CHECK: owner of the token accounts bought NFTs are delivered to
    pub nft_recipient: UncheckedAccount<'info>,
    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

impl<'info> TokenSwap<'info> {
    pub fn custody(&self, remaining: &[AccountInfo<'info>], delegate_bump: u8) -> CpiCustody<'info> {
        let caller = self.caller.key();
        let mut accounts = vec![
            self.caller_funds.to_account_info(),
            self.currency_recipient.to_account_info(),
            self.nft_recipient.to_account_info(),
        ];
        accounts.extend_from_slice(remaining);

        CpiCustody::new(
            self.caller.to_account_info(),
            self.token_program.to_account_info(),
            self.system_program.to_account_info(),
            &accounts,
        )
        .with_delegate(
            PdaSigner::new(
                self.delegate.to_account_info(),
                &[pda_seeds::DELEGATE, caller.as_ref()],
                delegate_bump,
            ),
            self.mint.key(),
        )
    }

    pub fn recipients(&self) -> Recipients {
        Recipients {
            currency: self.currency_recipient.key(),
            nfts: self.nft_recipient.key(),
        }
    }
}

pub fn now() -> Result<i64> {
    Ok(Clock::get()?.unix_timestamp)
}

/// 按 leg_accounts 解析每条腿的池子账户，并包装成 CPI 池子
pub fn resolve_pools<'a, 'info>(
    remaining: &'info [AccountInfo<'info>],
    mappings: &[LegAccountMapping],
    pools: &[Pubkey],
    custody: &'a CpiCustody<'info>,
) -> Result<Vec<CpiPool<'a, 'info>>> {
    let resolver = AccountResolver::new(remaining);
    resolver.validate_mappings(mappings, pools.len())?;
    mappings
        .iter()
        .zip(pools)
        .enumerate()
        .map(|(i, (mapping, pool))| {
            let accounts = resolver.resolve_leg(mapping, pool)?;
            log_account_fingerprint(accounts.pool_state, &format!("leg{}.pool_state", i));
            log_account_fingerprint(accounts.registry_record, &format!("leg{}.registry_record", i));
            Ok(CpiPool::new(accounts, custody))
        })
        .collect()
}

/// 组合交易: 前 `sell_count` 个映射属于卖出腿
pub fn split_mappings(
    mappings: &[LegAccountMapping],
    sell_count: usize,
) -> Result<(&[LegAccountMapping], &[LegAccountMapping])> {
    require!(mappings.len() >= sell_count, RouterError::InvalidAccountCount);
    Ok(mappings.split_at(sell_count))
}

pub fn buy_legs<'p>(
    pools: &'p [CpiPool<'_, '_>],
    selections: Vec<ItemSelection>,
) -> Vec<BuyLeg<'p>> {
    pools
        .iter()
        .zip(selections)
        .map(|(pool, items)| BuyLeg { pool, items })
        .collect()
}

pub fn sell_legs<'p>(pools: &'p [CpiPool<'_, '_>], legs: &[LegSpecific]) -> Vec<SellLeg<'p>> {
    pools
        .iter()
        .zip(legs)
        .map(|(pool, leg)| SellLeg {
            pool,
            ids: leg.ids.clone(),
        })
        .collect()
}
