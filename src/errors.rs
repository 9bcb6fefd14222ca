use anchor_lang::prelude::*;

#[error_code]
pub enum RouterError {
    #[msg("Deadline has passed")]
    DeadlineExpired,

    #[msg("Pool is not attested by the registry")]
    UnverifiedPool,

    #[msg("Pool variant does not match the settlement rail of this call")]
    WrongSettlementRail,

    #[msg("Aggregate cost or output bound exceeded")]
    AggregateSlippageExceeded,

    #[msg("Insufficient caller funds for this batch")]
    InsufficientCallerFunds,

    #[msg("Pull payment caller is not an attested token pool")]
    UnauthorizedPullPayment,

    // 批次参数校验
    #[msg("Batch has no legs")]
    EmptyBatch,

    #[msg("Invalid item count for leg")]
    InvalidItemCount,

    #[msg("Duplicate NFT id within a leg")]
    DuplicateItemId,

    #[msg("Pool quote unavailable")]
    QuoteUnavailable,

    #[msg("Pool charged more than the allowed maximum")]
    ChargeExceedsMaximum,

    #[msg("Math overflow")]
    MathOverflow,

    // 账户解析相关错误
    #[msg("Invalid account count for legs")]
    InvalidAccountCount,

    #[msg("Insufficient accounts provided")]
    InsufficientAccounts,

    #[msg("Account not found in remaining accounts")]
    AccountNotFound,

    #[msg("Invalid account")]
    InvalidAccount,

    #[msg("Leg pool does not match resolved pool account")]
    PoolKeyMismatch,

    #[msg("Unknown pool variant tag")]
    UnknownPoolVariant,

    // CPI 相关错误
    #[msg("Missing or foreign return data from pool")]
    InvalidReturnData,

    #[msg("Reported charge does not match observed balance change")]
    PaymentMismatch,

    #[msg("Invalid instruction data")]
    InvalidInstructionData,
}

/// Asserts that `result` failed with the given router error code.
#[cfg(test)]
pub(crate) fn assert_router_error<T: std::fmt::Debug>(result: Result<T>, expected: RouterError) {
    match result {
        Err(anchor_lang::error::Error::AnchorError(err)) => assert_eq!(
            err.error_code_number,
            expected as u32 + anchor_lang::error::ERROR_CODE_OFFSET,
            "expected {:?}, got {}",
            expected,
            err.error_name
        ),
        other => panic!("expected {:?}, got {:?}", expected, other),
    }
}
