mod error;
mod ledger;
mod money;
mod statement;
mod transaction;

pub use error::*;
pub use ledger::*;
pub use money::*;
pub use statement::*;
pub use transaction::*;
