//! Thread-safe handle over one gate.
//!
//! All mutations run under a single lock, so no two operations interleave.
//! `execute` commits the executed flag under the lock, releases it, then
//! awaits the ledger. A ledger that calls back into the gate through another
//! clone of the handle finds the lock free and the proposal already executed.

use super::approval::ApprovalGate;
use super::error::GateResult;
use super::events::{EventLog, EventQuery, GateEvent};
use super::owners::OWNER_COUNT;
use super::proposal::Proposal;
use crate::identity::Identity;
use crate::ledger::Ledger;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Cloneable, `Send + Sync` handle to a gate and its ledger.
pub struct SharedGate<L: Ledger> {
    gate: Arc<Mutex<ApprovalGate>>,
    ledger: Arc<L>,
}

impl<L: Ledger> Clone for SharedGate<L> {
    fn clone(&self) -> Self {
        Self {
            gate: Arc::clone(&self.gate),
            ledger: Arc::clone(&self.ledger),
        }
    }
}

impl<L: Ledger> SharedGate<L> {
    pub fn new(gate: ApprovalGate, ledger: L) -> Self {
        Self::with_shared_ledger(gate, Arc::new(ledger))
    }

    /// Use a ledger that is already shared elsewhere.
    pub fn with_shared_ledger(gate: ApprovalGate, ledger: Arc<L>) -> Self {
        Self {
            gate: Arc::new(Mutex::new(gate)),
            ledger,
        }
    }

    /// Construct the gate and wrap it in one step.
    pub fn create(owners: [Identity; OWNER_COUNT], threshold: u32, ledger: L) -> GateResult<Self> {
        Ok(Self::new(ApprovalGate::new(owners, threshold)?, ledger))
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn propose(
        &self,
        caller: &Identity,
        target: Identity,
        amount: u64,
        payload: Vec<u8>,
    ) -> GateResult<usize> {
        self.lock().propose(caller, target, amount, payload)
    }

    pub fn vote(&self, caller: &Identity, index: usize, affirmative: bool) -> GateResult<()> {
        self.lock().vote(caller, index, affirmative)
    }

    /// Execute with the ledger call made outside the lock.
    ///
    /// As with `ApprovalGate::execute`, dropping the future after the
    /// preconditions pass spends the attempt without an `Execute` event.
    pub async fn execute(&self, caller: &Identity, index: usize) -> GateResult<()> {
        let dispatch = self.lock().begin_execute(caller, index)?;
        let delivered = dispatch.send(self.ledger.as_ref()).await?;
        self.lock().complete_execute(caller, delivered);
        Ok(())
    }

    pub fn get_votes(&self, index: usize) -> GateResult<i64> {
        self.lock().get_votes(index)
    }

    /// Copy of the proposal at `index`.
    pub fn proposal(&self, index: usize) -> GateResult<Proposal> {
        self.lock().proposal(index).cloned()
    }

    pub fn proposal_count(&self) -> usize {
        self.lock().proposal_count()
    }

    pub fn has_voted(&self, index: usize, owner: &Identity) -> GateResult<bool> {
        self.lock().has_voted(index, owner)
    }

    pub fn is_owner(&self, identity: &Identity) -> bool {
        self.lock().is_owner(identity)
    }

    pub fn threshold(&self) -> u32 {
        self.lock().threshold()
    }

    pub fn owners(&self) -> [Identity; OWNER_COUNT] {
        *self.lock().owners()
    }

    /// Snapshot of the event log.
    pub fn events(&self) -> EventLog {
        self.lock().events().clone()
    }

    pub fn query_events(&self, query: &EventQuery) -> Vec<GateEvent> {
        self.lock().events().query(query)
    }

    /// Run a read-only closure against the gate under the lock.
    pub fn inspect<R>(&self, f: impl FnOnce(&ApprovalGate) -> R) -> R {
        f(&self.lock())
    }

    // Gate methods never panic between mutations, so a poisoned lock still
    // guards consistent state.
    fn lock(&self) -> MutexGuard<'_, ApprovalGate> {
        self.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
