pub mod client;
pub mod custody;
pub mod registry;
pub mod types;

pub use client::*;
pub use custody::*;
pub use registry::*;
pub use types::*;
