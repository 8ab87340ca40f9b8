// Application layer - shared access and logging around the domain ledger.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
