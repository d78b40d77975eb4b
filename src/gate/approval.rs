//! The approval gate state machine.
//!
//! A fixed committee of owners proposes actions, votes on them once each, and
//! executes an action once its net tally reaches the threshold.
//!
//! ## Execution ordering
//!
//! `execute` commits `executed = true` before the ledger is called. Anything
//! the ledger does in response (including calling back into the gate) sees
//! the proposal as executed. A ledger failure is reported as
//! `DispatchFailed` and the flag is not reset, so the proposal can never be
//! executed again.

use super::error::{GateError, GateResult};
use super::events::{EventLog, GateEvent};
use super::owners::{OwnerSet, OWNER_COUNT};
use super::proposal::{Delivered, Dispatch, Proposal};
use crate::identity::Identity;
use crate::ledger::Ledger;
use tracing::{debug, info};

/// Threshold-approval transaction gate.
#[derive(Debug, Clone)]
pub struct ApprovalGate {
    owners: OwnerSet,
    threshold: u32,
    proposals: Vec<Proposal>,
    events: EventLog,
}

impl ApprovalGate {
    /// Register the owner set and threshold.
    ///
    /// Checks, first failure wins:
    /// 1. threshold in `1..=OWNER_COUNT`, else `InvalidThreshold`
    /// 2. no zero identity, else `InvalidIdentity`
    /// 3. no repeated identity, else `DuplicateOwner`
    pub fn new(owners: [Identity; OWNER_COUNT], threshold: u32) -> GateResult<Self> {
        if threshold == 0 || threshold as usize > OWNER_COUNT {
            return Err(GateError::InvalidThreshold(threshold));
        }

        let owners = OwnerSet::new(owners)?;

        info!(
            threshold,
            owners = ?owners.iter().map(Identity::short).collect::<Vec<_>>(),
            "approval gate created"
        );

        Ok(Self {
            owners,
            threshold,
            proposals: Vec::new(),
            events: EventLog::new(),
        })
    }

    /// Submit a new proposal. Returns its index.
    ///
    /// Target, amount and payload are taken as given; a zero target or zero
    /// amount is legal.
    pub fn propose(
        &mut self,
        caller: &Identity,
        target: Identity,
        amount: u64,
        payload: Vec<u8>,
    ) -> GateResult<usize> {
        self.require_owner(caller)?;

        let index = self.proposals.len();
        self.proposals.push(Proposal::new(target, amount, payload.clone()));

        self.events.record(GateEvent::SubmitTransaction {
            creator: *caller,
            index,
            target,
            amount,
            payload,
        });

        Ok(index)
    }

    /// Cast the caller's one vote on a proposal.
    ///
    /// Checks in order: owner, proposal exists, not executed, not voted yet.
    pub fn vote(&mut self, caller: &Identity, index: usize, affirmative: bool) -> GateResult<()> {
        self.require_owner(caller)?;
        let proposal = open_proposal(&mut self.proposals, index)?;

        if proposal.has_voted(caller) {
            debug!(owner = %caller, index, "rejected duplicate vote");
            return Err(GateError::DuplicateVote {
                owner: *caller,
                index,
            });
        }

        proposal.apply_vote(affirmative);
        let event = if affirmative {
            GateEvent::AffirmativeVote {
                owner: *caller,
                index,
            }
        } else {
            GateEvent::NegativeVote {
                owner: *caller,
                index,
            }
        };
        self.events.record(event);
        proposal.record_voter(*caller);

        Ok(())
    }

    /// Execute an approved proposal through the ledger.
    ///
    /// This is the only way to reach the ledger or record an `Execute` event.
    /// The attempt is spent once the preconditions pass: dropping the future
    /// before the ledger answers leaves the proposal executed with no
    /// `Execute` event and no `DispatchFailed`.
    ///
    /// The two halves are not exposed:
    ///
    /// ```compile_fail
    /// use approval_gate::{ApprovalGate, Identity};
    ///
    /// let owners = ["o1", "o2", "o3", "o4"].map(Identity::from_label);
    /// let mut gate = ApprovalGate::new(owners, 1).unwrap();
    /// gate.propose(&owners[0], owners[1], 1, vec![]).unwrap();
    /// gate.vote(&owners[0], 0, true).unwrap();
    /// let _ = gate.begin_execute(&owners[0], 0);
    /// ```
    pub async fn execute<L: Ledger + ?Sized>(
        &mut self,
        caller: &Identity,
        index: usize,
        ledger: &L,
    ) -> GateResult<()> {
        let dispatch = self.begin_execute(caller, index)?;
        let delivered = dispatch.send(ledger).await?;
        self.complete_execute(caller, delivered);
        Ok(())
    }

    /// First half of `execute`: validate and commit the executed flag.
    ///
    /// Checks in order: owner, proposal exists, not executed, tally at or
    /// above threshold. On success the proposal is already marked executed
    /// and the returned `Dispatch` must be sent to the ledger.
    pub(crate) fn begin_execute(
        &mut self,
        caller: &Identity,
        index: usize,
    ) -> GateResult<Dispatch> {
        self.require_owner(caller)?;
        let threshold = self.threshold;
        let proposal = open_proposal(&mut self.proposals, index)?;

        let tally = proposal.vote_tally();
        if tally < i64::from(threshold) {
            debug!(owner = %caller, index, tally, threshold, "rejected execute below threshold");
            return Err(GateError::InsufficientVotes {
                index,
                tally,
                threshold,
            });
        }

        proposal.mark_executed();
        info!(owner = %caller, index, tally, "proposal marked executed; dispatching");

        Ok(Dispatch::for_proposal(index, proposal))
    }

    /// Second half of `execute`: record the notification once the ledger
    /// accepted the dispatch.
    pub(crate) fn complete_execute(&mut self, caller: &Identity, delivered: Delivered) {
        self.events.record(GateEvent::Execute {
            owner: *caller,
            index: delivered.index(),
        });
    }

    /// Net tally for a proposal, regardless of execution state.
    pub fn get_votes(&self, index: usize) -> GateResult<i64> {
        self.proposal(index).map(Proposal::vote_tally)
    }

    pub fn proposal(&self, index: usize) -> GateResult<&Proposal> {
        self.proposals
            .get(index)
            .ok_or(GateError::ProposalNotFound(index))
    }

    pub fn proposal_count(&self) -> usize {
        self.proposals.len()
    }

    pub fn proposals(&self) -> &[Proposal] {
        &self.proposals
    }

    /// Whether `owner` has voted on the proposal at `index`.
    pub fn has_voted(&self, index: usize, owner: &Identity) -> GateResult<bool> {
        self.proposal(index).map(|p| p.has_voted(owner))
    }

    /// Owners in registration order.
    pub fn owners(&self) -> &[Identity; OWNER_COUNT] {
        self.owners.as_array()
    }

    pub fn is_owner(&self, identity: &Identity) -> bool {
        self.owners.contains(identity)
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    fn require_owner(&self, caller: &Identity) -> GateResult<()> {
        if self.owners.contains(caller) {
            Ok(())
        } else {
            debug!(caller = %caller, "rejected call from non-owner");
            Err(GateError::Unauthorized(*caller))
        }
    }
}

/// Existing, not-yet-executed proposal.
fn open_proposal(proposals: &mut [Proposal], index: usize) -> GateResult<&mut Proposal> {
    let proposal = proposals
        .get_mut(index)
        .ok_or(GateError::ProposalNotFound(index))?;

    if proposal.is_executed() {
        debug!(index, "rejected call on executed proposal");
        return Err(GateError::AlreadyExecuted(index));
    }

    Ok(proposal)
}
