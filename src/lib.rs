//! Approval Gate - threshold-approved transaction execution
//!
//! A fixed committee of four owners proposes actions (a value transfer plus
//! an opaque payload), votes on each one once, and executes an action exactly
//! once after its net affirmative tally reaches the threshold.
//!
//! Key principles:
//! - Owner set and threshold fixed at construction
//! - One vote per owner per proposal, permanent
//! - Executed flag committed before the ledger is called
//! - A failed dispatch spends the proposal's only execution attempt
//!
//! The ledger that actually moves value is an external collaborator behind
//! the `ledger::Ledger` trait.

pub mod config;
pub mod gate;
pub mod identity;
pub mod ledger;
pub mod logging;
pub mod serialization;

pub use gate::{ApprovalGate, GateError, GateEvent, GateResult, SharedGate};
pub use identity::Identity;
pub use ledger::{Ledger, LedgerError};
