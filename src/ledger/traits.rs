//! Trait abstraction for ledger operations.
//!
//! Enables mock implementations for unit testing and lets the hosting runtime
//! plug in whatever actually moves value.

use crate::identity::Identity;
use async_trait::async_trait;
use thiserror::Error;

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger operation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The ledger does not hold enough value to cover the transfer.
    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: u64, available: u64 },

    /// The target refused the transfer or its payload.
    #[error("Transfer rejected: {0}")]
    Rejected(String),

    /// Other error with message.
    #[error("{0}")]
    Other(String),
}

/// The external collaborator that performs value transfers.
///
/// Called exactly once per successfully-started execution. Implementations
/// may call back into the gate; by the time `transfer` runs, the proposal is
/// already marked executed.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Transfer `amount` to `target`, delivering `payload`.
    async fn transfer(&self, target: &Identity, amount: u64, payload: &[u8]) -> LedgerResult<()>;
}
