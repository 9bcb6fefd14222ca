pub mod bridge;
pub mod buy;
pub mod context;
pub mod initialize;
pub mod pull_payment;
pub mod robust;
pub mod sell;

pub use bridge::*;
pub use buy::*;
pub use context::*;
pub use initialize::*;
pub use pull_payment::*;
pub use robust::*;
pub use sell::*;
