pub mod derivation;
pub mod types;

pub use derivation::*;
pub use types::*;
