use anchor_lang::prelude::*;

use crate::errors::RouterError;

/// Adds `amount` to a running total; overflow is an error, never a wrap.
pub fn credit(total: u64, amount: u64) -> Result<u64> {
    total
        .checked_add(amount)
        .ok_or_else(|| error!(RouterError::MathOverflow))
}

/// Debits `amount` from a caller budget.
pub fn debit(balance: u64, amount: u64) -> Result<u64> {
    balance
        .checked_sub(amount)
        .ok_or_else(|| error!(RouterError::InsufficientCallerFunds))
}

pub fn spent(initial: u64, remaining: u64) -> Result<u64> {
    initial
        .checked_sub(remaining)
        .ok_or_else(|| error!(RouterError::MathOverflow))
}
