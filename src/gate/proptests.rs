//! Property-based tests for the gate state machine
//!
//! Tests for:
//! - Tally: net of accepted votes, one vote per owner
//! - Execution: allowed exactly when tally reaches threshold, at most once
//! - Rejections: leave state untouched

use super::{ApprovalGate, EventKind, GateError, OWNER_COUNT};
use crate::identity::Identity;
use crate::ledger::MockLedger;
use proptest::prelude::*;
use std::collections::HashSet;

fn owners() -> [Identity; OWNER_COUNT] {
    ["p1", "p2", "p3", "p4"].map(Identity::from_label)
}

/// (owner slot, proposal index, affirmative)
fn vote_strategy(proposals: usize) -> impl Strategy<Value = Vec<(usize, usize, bool)>> {
    prop::collection::vec((0..OWNER_COUNT, 0..proposals, any::<bool>()), 0..40)
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

proptest! {
    /// Property: tally equals accepted affirmative minus accepted negative votes
    #[test]
    fn tally_is_net_of_first_votes(votes in vote_strategy(3)) {
        let owners = owners();
        let mut gate = ApprovalGate::new(owners, 2).unwrap();
        for _ in 0..3 {
            gate.propose(&owners[0], Identity::from_label("t"), 1, vec![]).unwrap();
        }

        let mut seen = HashSet::new();
        let mut expected = [0i64; 3];

        for (slot, index, affirmative) in votes {
            let result = gate.vote(&owners[slot], index, affirmative);
            if seen.insert((slot, index)) {
                prop_assert!(result.is_ok());
                expected[index] += if affirmative { 1 } else { -1 };
            } else {
                prop_assert_eq!(
                    result,
                    Err(GateError::DuplicateVote { owner: owners[slot], index })
                );
            }
        }

        for (index, tally) in expected.iter().enumerate() {
            prop_assert_eq!(gate.get_votes(index), Ok(*tally));
        }
    }

    /// Property: execution succeeds iff tally >= threshold, and only once
    #[test]
    fn execute_respects_threshold(
        threshold in 1u32..=4,
        directions in prop::collection::vec(any::<bool>(), 0..=OWNER_COUNT),
    ) {
        let owners = owners();
        let mut gate = ApprovalGate::new(owners, threshold).unwrap();
        let ledger = MockLedger::new();
        let index = gate.propose(&owners[0], Identity::from_label("t"), 7, vec![1]).unwrap();

        for (owner, affirmative) in owners.iter().zip(&directions) {
            gate.vote(owner, index, *affirmative).unwrap();
        }
        let tally = gate.get_votes(index).unwrap();

        let first = block_on(gate.execute(&owners[1], index, &ledger));
        if tally >= i64::from(threshold) {
            prop_assert!(first.is_ok());
            prop_assert_eq!(ledger.transfers().len(), 1);
            let second = block_on(gate.execute(&owners[2], index, &ledger));
            prop_assert_eq!(second, Err(GateError::AlreadyExecuted(index)));
        } else {
            prop_assert_eq!(
                first,
                Err(GateError::InsufficientVotes { index, tally, threshold })
            );
            prop_assert!(!gate.proposal(index).unwrap().is_executed());
        }

        prop_assert!(ledger.attempts() <= 1);
        let executions = gate
            .events()
            .entries()
            .iter()
            .filter(|e| e.kind() == EventKind::Execute)
            .count();
        prop_assert_eq!(executions, ledger.transfers().len());
    }

    /// Property: calls from non-owners never change state
    #[test]
    fn outsiders_change_nothing(
        label in "[a-z]{1,12}",
        index in 0usize..3,
        affirmative in any::<bool>(),
    ) {
        let owners = owners();
        let outsider = Identity::from_label(&format!("outsider-{}", label));
        prop_assume!(!owners.contains(&outsider));

        let mut gate = ApprovalGate::new(owners, 1).unwrap();
        gate.propose(&owners[0], Identity::from_label("t"), 1, vec![]).unwrap();
        let events_before = gate.events().len();

        prop_assert_eq!(
            gate.propose(&outsider, outsider, 1, vec![]),
            Err(GateError::Unauthorized(outsider))
        );
        prop_assert_eq!(
            gate.vote(&outsider, index, affirmative),
            Err(GateError::Unauthorized(outsider))
        );
        prop_assert_eq!(
            gate.begin_execute(&outsider, index),
            Err(GateError::Unauthorized(outsider))
        );

        prop_assert_eq!(gate.proposal_count(), 1);
        prop_assert_eq!(gate.get_votes(0), Ok(0));
        prop_assert_eq!(gate.events().len(), events_before);
    }
}
