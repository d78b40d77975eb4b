//! Gate errors.
//!
//! Every rejected operation maps to exactly one variant. Apart from
//! `DispatchFailed`, a returned error means no state changed.

use super::owners::OWNER_COUNT;
use crate::identity::Identity;
use crate::ledger::LedgerError;
use thiserror::Error;

/// Result type for gate operations.
pub type GateResult<T> = Result<T, GateError>;

/// Approval gate errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    /// Threshold outside `1..=OWNER_COUNT` (construction only).
    #[error("Invalid threshold {0}: must be between 1 and {max}", max = OWNER_COUNT)]
    InvalidThreshold(u32),

    /// An owner candidate is the zero identity (construction only).
    #[error("Invalid identity: owners must not be the zero identity")]
    InvalidIdentity,

    /// An owner candidate repeats an earlier one (construction only).
    #[error("Duplicate owner: {0}")]
    DuplicateOwner(Identity),

    /// Caller is not a registered owner.
    #[error("Unauthorized: {0} is not an owner")]
    Unauthorized(Identity),

    /// No proposal at this index.
    #[error("Proposal not found: {0}")]
    ProposalNotFound(usize),

    /// Proposal already executed (or its one execution attempt was consumed).
    #[error("Proposal {0} already executed")]
    AlreadyExecuted(usize),

    /// Owner already voted on this proposal.
    #[error("Duplicate vote: {owner} already voted on proposal {index}")]
    DuplicateVote { owner: Identity, index: usize },

    /// Net tally has not reached the threshold.
    #[error("Insufficient votes on proposal {index}: tally {tally}, threshold {threshold}")]
    InsufficientVotes {
        index: usize,
        tally: i64,
        threshold: u32,
    },

    /// The ledger refused the transfer. The proposal stays executed.
    #[error("Dispatch of proposal {index} failed: {source}")]
    DispatchFailed {
        index: usize,
        #[source]
        source: LedgerError,
    },
}
