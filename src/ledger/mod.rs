//! Ledger collaborator.
//!
//! The gate never holds balances. On execution it instructs a `Ledger` to move
//! value and deliver the payload, and awaits the outcome.
//!
//! - `traits`: the `Ledger` abstraction and its error type
//! - `mock`: in-memory ledger for tests and local runs

pub mod mock;
pub mod traits;

pub use mock::{MockLedger, Transfer};
pub use traits::{Ledger, LedgerError, LedgerResult};
