// Application layer: input validation, shop operations and reports.
// The CLI and the tests talk to the ledger only through `Shop`.

pub mod error;
pub mod reporting;
pub mod shop;

pub use error::*;
pub use reporting::*;
pub use shop::*;
