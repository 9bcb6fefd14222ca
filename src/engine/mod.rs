//! Chain-agnostic orchestration: batch execution, robust batches, bridges and
//! the pull-payment gateway. On-chain adapters live in `pool_cpi`.

pub mod bridge;
pub mod buy;
pub mod gateway;
pub mod robust;
pub mod router;
pub mod sell;
pub mod types;

#[cfg(test)]
pub mod testkit;

pub use gateway::PullPaymentGateway;
pub use router::SwapRouter;
pub use types::*;
