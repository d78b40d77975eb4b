//! Ledger callbacks and concurrent callers against `SharedGate`.
//!
//! The ledger below calls straight back into the gate from inside
//! `transfer`, the way a hostile target contract would.

use approval_gate::gate::{EventKind, EventQuery, SharedGate, OWNER_COUNT};
use approval_gate::ledger::{Ledger, LedgerResult, MockLedger};
use approval_gate::{GateError, GateResult, Identity};
use async_trait::async_trait;
use std::sync::Mutex;

fn owners() -> [Identity; OWNER_COUNT] {
    ["O1", "O2", "O3", "O4"].map(Identity::from_label)
}

/// Outcomes of the calls the ledger made back into the gate.
#[derive(Debug, Default)]
struct Observed {
    executed_flag: Option<bool>,
    reentrant_execute: Option<GateResult<()>>,
    reentrant_vote: Option<GateResult<()>>,
    transfers: usize,
}

/// Ledger that re-enters the gate during every transfer.
#[derive(Default)]
struct ReentrantLedger {
    gate: Mutex<Option<SharedGate<ReentrantLedger>>>,
    observed: Mutex<Observed>,
}

impl ReentrantLedger {
    fn attach(&self, gate: SharedGate<ReentrantLedger>) {
        *self.gate.lock().unwrap() = Some(gate);
    }
}

#[async_trait]
impl Ledger for ReentrantLedger {
    async fn transfer(&self, _target: &Identity, _amount: u64, _payload: &[u8]) -> LedgerResult<()> {
        let gate = self
            .gate
            .lock()
            .unwrap()
            .clone()
            .expect("gate attached before execution");
        let [_, o2, _, o4] = owners();

        let executed = gate.proposal(0).map(|p| p.is_executed()).ok();
        let execute = gate.execute(&o2, 0).await;
        let vote = gate.vote(&o4, 0, true);

        let mut observed = self.observed.lock().unwrap();
        observed.executed_flag = executed;
        observed.reentrant_execute = Some(execute);
        observed.reentrant_vote = Some(vote);
        observed.transfers += 1;
        Ok(())
    }
}

#[tokio::test]
async fn test_reentrant_execute_is_rejected() {
    let [o1, o2, o3, _] = owners();
    let gate = SharedGate::create(owners(), 2, ReentrantLedger::default()).unwrap();
    gate.ledger().attach(gate.clone());

    let index = gate
        .propose(&o1, Identity::from_label("attacker"), 100, b"drain".to_vec())
        .unwrap();
    gate.vote(&o1, index, true).unwrap();
    gate.vote(&o3, index, true).unwrap();

    gate.execute(&o1, index).await.unwrap();

    let observed = gate.ledger().observed.lock().unwrap();
    assert_eq!(observed.transfers, 1);
    assert_eq!(observed.executed_flag, Some(true));
    assert_eq!(
        observed.reentrant_execute,
        Some(Err(GateError::AlreadyExecuted(index)))
    );
    assert_eq!(
        observed.reentrant_vote,
        Some(Err(GateError::AlreadyExecuted(index)))
    );
    drop(observed);

    // Exactly one Execute notification, from the outer call.
    let executions = gate.query_events(&EventQuery {
        kind: Some(EventKind::Execute),
        ..Default::default()
    });
    assert_eq!(executions.len(), 1);
    assert_eq!(executions[0].actor(), &o1);
    assert_eq!(gate.has_voted(index, &o2), Ok(false));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_votes_are_serialised() {
    let gate = SharedGate::create(owners(), 4, MockLedger::new()).unwrap();
    let [o1, ..] = owners();

    let proposals = 16;
    for n in 0..proposals {
        gate.propose(&o1, Identity::from_label("t"), n, vec![]).unwrap();
    }

    let mut handles = Vec::new();
    for owner in owners() {
        let gate = gate.clone();
        handles.push(tokio::spawn(async move {
            for index in 0..proposals as usize {
                // Each owner votes twice; only the first may count.
                let first = gate.vote(&owner, index, true);
                let second = gate.vote(&owner, index, true);
                assert!(first.is_ok());
                assert!(matches!(second, Err(GateError::DuplicateVote { .. })));
            }
        }));
    }
    for result in futures::future::join_all(handles).await {
        result.unwrap();
    }

    for index in 0..proposals as usize {
        assert_eq!(gate.get_votes(index), Ok(4));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_execute_dispatches_once() {
    let gate = SharedGate::create(owners(), 2, MockLedger::new()).unwrap();
    let [o1, o2, ..] = owners();
    let index = gate
        .propose(&o1, Identity::from_label("t"), 10, vec![])
        .unwrap();
    gate.vote(&o1, index, true).unwrap();
    gate.vote(&o2, index, true).unwrap();

    let attempts = owners().map(|owner| {
        let gate = gate.clone();
        tokio::spawn(async move { gate.execute(&owner, index).await })
    });

    let mut succeeded = 0;
    for result in futures::future::join_all(attempts).await {
        match result.unwrap() {
            Ok(()) => succeeded += 1,
            Err(err) => assert_eq!(err, GateError::AlreadyExecuted(index)),
        }
    }

    assert_eq!(succeeded, 1);
    assert_eq!(gate.ledger().attempts(), 1);
    assert_eq!(gate.ledger().transfers().len(), 1);
}
