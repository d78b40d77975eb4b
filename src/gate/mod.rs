//! Threshold-approval gate.
//!
//! - `approval`: the `ApprovalGate` state machine (propose, vote, execute)
//! - `owners`: the fixed, validated owner set
//! - `proposal`: proposals and the dispatch sent to the ledger
//! - `events`: notifications and the append-only event log
//! - `shared`: lock-serialised handle for concurrent callers
//! - `error`: `GateError`

pub mod approval;
pub mod error;
pub mod events;
pub mod owners;
pub mod proposal;
pub mod shared;

pub use approval::ApprovalGate;
pub use error::{GateError, GateResult};
pub use events::{format_event_log, EventKind, EventLog, EventQuery, GateEvent};
pub use owners::{OwnerSet, OWNER_COUNT};
pub use proposal::Proposal;
pub use shared::SharedGate;

#[cfg(test)]
mod proptests;
