use anchor_lang::prelude::*;

use crate::state::ItemSelection;

/// A router PDA together with the seeds it signs with.
#[derive(Clone)]
pub struct PdaSigner<'info> {
    pub account: AccountInfo<'info>,
    seeds: Vec<Vec<u8>>,
}

impl<'info> PdaSigner<'info> {
    pub fn new(account: AccountInfo<'info>, seeds: &[&[u8]], bump: u8) -> Self {
        let mut seeds: Vec<Vec<u8>> = seeds.iter().map(|seed| seed.to_vec()).collect();
        seeds.push(vec![bump]);
        Self { account, seeds }
    }

    pub fn key(&self) -> Pubkey {
        *self.account.key
    }

    pub fn seeds(&self) -> Vec<&[u8]> {
        self.seeds.iter().map(Vec::as_slice).collect()
    }
}

/// `swap_buy` 指令参数 (discriminator 之后)
#[derive(AnchorSerialize, AnchorDeserialize)]
pub struct SwapBuyArgs {
    pub items: ItemSelection,
    pub max_input: u64,
    pub nft_recipient: Pubkey,
}
