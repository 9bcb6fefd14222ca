pub mod accounts;
pub mod resolver;

pub use accounts::*;
pub use resolver::*;
