use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::{AccountMeta, Instruction};
use anchor_lang::solana_program::program::{get_return_data, invoke, invoke_signed, set_return_data};

use super::custody::CpiCustody;
use super::types::{PdaSigner, SwapBuyArgs};
use crate::account_derivation::instruction_discriminators::{
    BEGIN_SELL, COMPLETE_SELL, QUOTE_BUY, QUOTE_SELL, SWAP_BUY,
};
use crate::account_derivation::{layout, read_pool_variant};
use crate::account_resolver::LegAccounts;
use crate::engine::{Custody, Payment, PoolAttestation, PoolCollaborator, Quote};
use crate::errors::RouterError;
use crate::state::{ItemSelection, PoolVariant, Rail};

// 池子接口（原生 invoke）：
// - quote_buy / quote_sell(num_items)        -> return data {status u8, amount u64}
// - swap_buy(SwapBuyArgs)                     -> return data u64 (实际收费)
//     原生池: payer = escrow (签名), 池子自取不超过 max_input
//     代币池: payer = 池子自己的代币账户, max_input 已预付, 收费必须等于 max_input
// - begin_sell(expected) / complete_sell(min_output, recipient) -> return data u64
//     caller 只作为只读非签名账户传入; NFT 由路由器转给池子
// 每次调用前清空 return data，调用后校验 return data 来自池子程序本身。
// 卖出所得由路由器按收款人余额变化核对。

pub struct CpiPool<'a, 'info> {
    accounts: LegAccounts<'info>,
    custody: &'a CpiCustody<'info>,
}

impl<'a, 'info> CpiPool<'a, 'info> {
    pub fn new(accounts: LegAccounts<'info>, custody: &'a CpiCustody<'info>) -> Self {
        Self { accounts, custody }
    }

    fn program_id(&self) -> Pubkey {
        *self.accounts.pool_program.key
    }

    fn invoke_pool(
        &self,
        data: Vec<u8>,
        mut metas: Vec<AccountMeta>,
        mut infos: Vec<AccountInfo<'info>>,
        signer: Option<&PdaSigner<'info>>,
    ) -> Result<()> {
        for ai in self.accounts.extras {
            metas.push(AccountMeta {
                pubkey: *ai.key,
                is_signer: false,
                is_writable: ai.is_writable,
            });
            infos.push(ai.clone());
        }
        infos.push(self.accounts.pool_program.clone());

        let ix = Instruction {
            program_id: self.program_id(),
            accounts: metas,
            data,
        };
        set_return_data(&[]);
        match signer {
            Some(signer) => {
                let seeds = signer.seeds();
                invoke_signed(&ix, &infos, &[&seeds[..]])?;
            }
            None => invoke(&ix, &infos)?,
        }
        Ok(())
    }

    fn return_data(&self) -> Result<Vec<u8>> {
        match get_return_data() {
            Some((program_id, data)) if program_id == self.program_id() => Ok(data),
            Some((program_id, _)) => {
                msg!("[CPI] return data from {} expected {}", program_id, self.program_id());
                err!(RouterError::InvalidReturnData)
            }
            None => {
                msg!("[CPI] pool {} returned nothing", self.accounts.pool_key());
                err!(RouterError::InvalidReturnData)
            }
        }
    }

    fn quote(&self, discriminator: &[u8; 8], num_items: u64) -> Result<Quote> {
        let mut data = Vec::with_capacity(8 + 8);
        data.extend_from_slice(discriminator);
        data.extend_from_slice(&num_items.to_le_bytes());

        let metas = vec![AccountMeta::new_readonly(self.accounts.pool_key(), false)];
        let infos = vec![self.accounts.pool_state.clone()];
        self.invoke_pool(data, metas, infos, None)?;
        decode_quote(&self.return_data()?)
    }

    /// swap_buy 指令: [pool_state, payer, nft_recipient, token_program, system_program, extras...]
    fn invoke_swap_buy(
        &self,
        items: &ItemSelection,
        max_input: u64,
        nft_recipient: &Pubkey,
        payer: AccountMeta,
        payer_info: AccountInfo<'info>,
        signer: Option<&PdaSigner<'info>>,
    ) -> Result<u64> {
        let custody = self.custody;
        let mut data = Vec::with_capacity(8 + 64);
        data.extend_from_slice(SWAP_BUY);
        SwapBuyArgs {
            items: items.clone(),
            max_input,
            nft_recipient: *nft_recipient,
        }
        .serialize(&mut data)
        .map_err(|_| error!(RouterError::InvalidInstructionData))?;

        let recipient = custody.lookup(nft_recipient)?;
        let metas = vec![
            AccountMeta::new(self.key(), false),
            payer,
            AccountMeta::new_readonly(recipient.key(), false),
            AccountMeta::new_readonly(custody.token_program().key(), false),
            AccountMeta::new_readonly(custody.system_program().key(), false),
        ];
        let infos = vec![
            self.accounts.pool_state.clone(),
            payer_info,
            recipient.clone(),
            custody.token_program().clone(),
            custody.system_program().clone(),
        ];
        self.invoke_pool(data, metas, infos, signer)?;
        decode_u64(&self.return_data()?)
    }

    fn mismatch(&self, reported: u64, paid: Option<u64>) -> Result<u64> {
        msg!("[CPI] pool={} reported={} paid={:?}", self.key(), reported, paid);
        err!(RouterError::PaymentMismatch)
    }
}

impl PoolCollaborator for CpiPool<'_, '_> {
    fn key(&self) -> Pubkey {
        self.accounts.pool_key()
    }

    fn variant(&self) -> Result<PoolVariant> {
        read_pool_variant(self.accounts.pool_state)
    }

    fn quote_buy(&self, num_items: u64) -> Result<Quote> {
        self.quote(QUOTE_BUY, num_items)
    }

    fn quote_sell(&self, num_items: u64) -> Result<Quote> {
        self.quote(QUOTE_SELL, num_items)
    }

    fn swap_buy(
        &self,
        items: &ItemSelection,
        max_input: u64,
        nft_recipient: &Pubkey,
        payment: Payment<'_>,
    ) -> Result<u64> {
        let custody = self.custody;
        match payment {
            // 原生: 池子拿 escrow 签名自取, escrow 减少量必须等于上报收费
            Payment::Attached { escrow } => {
                let signer = custody.escrow_signer()?;
                require_keys_eq!(signer.key(), escrow, RouterError::InvalidAccount);

                let before = custody.balance(Rail::Native, &escrow)?;
                let charged = self.invoke_swap_buy(
                    items,
                    max_input,
                    nft_recipient,
                    payer_meta(Rail::Native, escrow),
                    signer.account.clone(),
                    Some(signer),
                )?;
                let after = custody.balance(Rail::Native, &escrow)?;
                let paid = before.checked_sub(after);
                if paid != Some(charged) {
                    return self.mismatch(charged, paid);
                }
                Ok(charged)
            }
            // 代币: 路由器经网关先把 max_input 付进池子自己的代币账户,
            // delegate 签名从不交给池子
            Payment::Pull { gateway, source } => {
                require_keys_eq!(source, custody.caller().key(), RouterError::InvalidAccount);
                let claim = PoolAttestation {
                    pool: self.key(),
                    variant: self.variant()?,
                };
                gateway.pull_payment(&claim, &custody.mint()?, &source, max_input)?;

                let vault = custody.settlement_account(&self.key())?;
                let charged = self.invoke_swap_buy(
                    items,
                    max_input,
                    nft_recipient,
                    payer_meta(Rail::Token, vault.key()),
                    vault.clone(),
                    None,
                )?;
                if charged != max_input {
                    return self.mismatch(charged, Some(max_input));
                }
                Ok(charged)
            }
        }
    }

    fn begin_sell(&self, expected_items: u64) -> Result<()> {
        let mut data = Vec::with_capacity(8 + 8);
        data.extend_from_slice(BEGIN_SELL);
        data.extend_from_slice(&expected_items.to_le_bytes());

        let caller = self.custody.caller();
        let metas = vec![
            AccountMeta::new(self.key(), false),
            seller_meta(caller.key()),
        ];
        let infos = vec![self.accounts.pool_state.clone(), caller.clone()];
        self.invoke_pool(data, metas, infos, None)
    }

    fn complete_sell(&self, min_output: u64, recipient: &Pubkey) -> Result<u64> {
        let mut data = Vec::with_capacity(8 + 8 + 32);
        data.extend_from_slice(COMPLETE_SELL);
        data.extend_from_slice(&min_output.to_le_bytes());
        data.extend_from_slice(recipient.as_ref());

        let custody = self.custody;
        let caller = custody.caller();
        // 代币池付到收款人的结算代币账户, 原生池直接付 lamports
        let recipient = match self.variant()?.rail() {
            Rail::Native => custody.lookup(recipient)?,
            Rail::Token => custody.settlement_account(recipient)?,
        };
        let metas = vec![
            AccountMeta::new(self.key(), false),
            seller_meta(caller.key()),
            AccountMeta::new(recipient.key(), false),
            AccountMeta::new_readonly(custody.token_program().key(), false),
            AccountMeta::new_readonly(custody.system_program().key(), false),
        ];
        let infos = vec![
            self.accounts.pool_state.clone(),
            caller.clone(),
            recipient.clone(),
            custody.token_program().clone(),
            custody.system_program().clone(),
        ];
        self.invoke_pool(data, metas, infos, None)?;
        decode_u64(&self.return_data()?)
    }
}

/// Only the native escrow signs for a pool; a token pool just sees its prepaid account.
fn payer_meta(rail: Rail, payer: Pubkey) -> AccountMeta {
    match rail {
        Rail::Native => AccountMeta::new(payer, true),
        Rail::Token => AccountMeta::new(payer, false),
    }
}

/// The seller is named for the pool's bookkeeping, never as a signer.
fn seller_meta(caller: Pubkey) -> AccountMeta {
    AccountMeta::new_readonly(caller, false)
}

pub fn decode_u64(data: &[u8]) -> Result<u64> {
    let bytes: [u8; 8] = data
        .try_into()
        .map_err(|_| error!(RouterError::InvalidReturnData))?;
    Ok(u64::from_le_bytes(bytes))
}

pub fn decode_quote(data: &[u8]) -> Result<Quote> {
    require!(
        data.len() == layout::QUOTE_RETURN_LEN,
        RouterError::InvalidReturnData
    );
    Ok(Quote {
        status: data[0],
        amount: decode_u64(&data[1..])?,
    })
}
