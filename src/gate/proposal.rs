//! Proposals and the dispatch handed to the ledger.

use super::error::{GateError, GateResult};
use crate::identity::Identity;
use crate::ledger::Ledger;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::warn;

/// One candidate action awaiting votes.
///
/// Only the gate mutates a proposal: `vote` moves the tally and records the
/// voter, `execute` sets the executed flag once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    target: Identity,
    amount: u64,
    payload: Vec<u8>,
    executed: bool,
    vote_tally: i64,
    /// Owners that have voted, in either direction. Permanent.
    voters: BTreeSet<Identity>,
}

impl Proposal {
    pub(crate) fn new(target: Identity, amount: u64, payload: Vec<u8>) -> Self {
        Self {
            target,
            amount,
            payload,
            executed: false,
            vote_tally: 0,
            voters: BTreeSet::new(),
        }
    }

    pub fn target(&self) -> &Identity {
        &self.target
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn is_executed(&self) -> bool {
        self.executed
    }

    /// Net tally: affirmative minus negative votes. Not clamped.
    pub fn vote_tally(&self) -> i64 {
        self.vote_tally
    }

    pub fn has_voted(&self, owner: &Identity) -> bool {
        self.voters.contains(owner)
    }

    /// Number of owners that have voted.
    pub fn voter_count(&self) -> usize {
        self.voters.len()
    }

    pub(crate) fn apply_vote(&mut self, affirmative: bool) {
        if affirmative {
            self.vote_tally += 1;
        } else {
            self.vote_tally -= 1;
        }
    }

    pub(crate) fn record_voter(&mut self, owner: Identity) {
        self.voters.insert(owner);
    }

    pub(crate) fn mark_executed(&mut self) {
        self.executed = true;
    }
}

/// An execution that has been committed and must now be sent to the ledger.
///
/// Only `ApprovalGate::begin_execute` creates one, after the proposal has
/// been marked executed. Not `Clone`: `send` consumes it, so one committed
/// execution reaches the ledger at most once.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Dispatch {
    index: usize,
    target: Identity,
    amount: u64,
    payload: Vec<u8>,
}

/// The ledger accepted a dispatch. Only `Dispatch::send` creates one.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Delivered {
    index: usize,
}

impl Dispatch {
    pub(crate) fn for_proposal(index: usize, proposal: &Proposal) -> Self {
        Self {
            index,
            target: proposal.target,
            amount: proposal.amount,
            payload: proposal.payload.clone(),
        }
    }

    /// Hand the transfer to the ledger and await the outcome.
    ///
    /// A ledger failure becomes `GateError::DispatchFailed`. Nothing is
    /// rolled back; the proposal's single execution attempt is spent.
    pub(crate) async fn send<L: Ledger + ?Sized>(self, ledger: &L) -> GateResult<Delivered> {
        match ledger
            .transfer(&self.target, self.amount, &self.payload)
            .await
        {
            Ok(()) => Ok(Delivered { index: self.index }),
            Err(source) => {
                warn!(
                    index = self.index,
                    target = %self.target,
                    amount = self.amount,
                    error = %source,
                    "dispatch failed; proposal stays executed"
                );
                Err(GateError::DispatchFailed {
                    index: self.index,
                    source,
                })
            }
        }
    }
}

impl Delivered {
    pub(crate) fn index(&self) -> usize {
        self.index
    }
}
