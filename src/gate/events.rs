//! Gate notifications and the append-only event log.
//!
//! Every successful state transition records exactly one event:
//! - `propose` → `SubmitTransaction`
//! - `vote` → `AffirmativeVote` or `NegativeVote`
//! - `execute` → `Execute` (only when the ledger accepted the dispatch)
//!
//! The log is never truncated or reordered. Queries return copies.

use crate::identity::Identity;
use crate::serialization::{from_cbor, to_cbor, SerializationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// A notification emitted for external observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateEvent {
    SubmitTransaction {
        creator: Identity,
        index: usize,
        target: Identity,
        amount: u64,
        payload: Vec<u8>,
    },
    AffirmativeVote {
        owner: Identity,
        index: usize,
    },
    NegativeVote {
        owner: Identity,
        index: usize,
    },
    Execute {
        owner: Identity,
        index: usize,
    },
}

/// Event discriminant, for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    SubmitTransaction,
    AffirmativeVote,
    NegativeVote,
    Execute,
}

impl GateEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::SubmitTransaction { .. } => EventKind::SubmitTransaction,
            Self::AffirmativeVote { .. } => EventKind::AffirmativeVote,
            Self::NegativeVote { .. } => EventKind::NegativeVote,
            Self::Execute { .. } => EventKind::Execute,
        }
    }

    /// The owner who caused the event.
    pub fn actor(&self) -> &Identity {
        match self {
            Self::SubmitTransaction { creator, .. } => creator,
            Self::AffirmativeVote { owner, .. }
            | Self::NegativeVote { owner, .. }
            | Self::Execute { owner, .. } => owner,
        }
    }

    /// Proposal index the event refers to.
    pub fn index(&self) -> usize {
        match self {
            Self::SubmitTransaction { index, .. }
            | Self::AffirmativeVote { index, .. }
            | Self::NegativeVote { index, .. }
            | Self::Execute { index, .. } => *index,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SubmitTransaction => "Submit Transaction",
            Self::AffirmativeVote => "Affirmative Vote",
            Self::NegativeVote => "Negative Vote",
            Self::Execute => "Execute",
        };
        f.write_str(name)
    }
}

/// Ordered, append-only record of gate notifications.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    entries: Vec<GateEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event.
    pub(crate) fn record(&mut self, event: GateEvent) {
        info!(
            kind = %event.kind(),
            actor = %event.actor(),
            index = event.index(),
            "gate event"
        );
        self.entries.push(event);
    }

    /// All events, oldest first.
    pub fn entries(&self) -> &[GateEvent] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&GateEvent> {
        self.entries.last()
    }

    /// Filter events. Results are most recent first.
    pub fn query(&self, query: &EventQuery) -> Vec<GateEvent> {
        let matching = self.entries.iter().rev().filter(|event| {
            if let Some(kind) = query.kind {
                if event.kind() != kind {
                    return false;
                }
            }

            if let Some(ref actor) = query.actor {
                if event.actor() != actor {
                    return false;
                }
            }

            if let Some(index) = query.index {
                if event.index() != index {
                    return false;
                }
            }

            true
        });

        match query.limit {
            Some(limit) => matching.take(limit).cloned().collect(),
            None => matching.cloned().collect(),
        }
    }

    /// Encode the whole log as CBOR for an external observer.
    pub fn export_cbor(&self) -> Result<Vec<u8>, SerializationError> {
        to_cbor(self)
    }

    /// Decode a log produced by `export_cbor`.
    pub fn import_cbor(bytes: &[u8]) -> Result<Self, SerializationError> {
        from_cbor(bytes)
    }
}

/// Query options for the event log.
#[derive(Debug, Clone)]
pub struct EventQuery {
    /// Filter by event kind.
    pub kind: Option<EventKind>,
    /// Filter by acting owner.
    pub actor: Option<Identity>,
    /// Filter by proposal index.
    pub index: Option<usize>,
    /// Limit number of results (most recent first).
    pub limit: Option<usize>,
}

impl Default for EventQuery {
    fn default() -> Self {
        Self {
            kind: None,
            actor: None,
            index: None,
            limit: Some(50),
        }
    }
}

/// Render events for an operator-facing audit view.
pub fn format_event_log(events: &[GateEvent]) -> String {
    if events.is_empty() {
        return "No gate events found.".to_string();
    }

    let mut output = String::from("Approval Gate Events\n\n");

    for event in events {
        output.push_str(&format!(
            "- #{} {} by {}...",
            event.index(),
            event.kind(),
            event.actor().short()
        ));
        if let GateEvent::SubmitTransaction {
            target,
            amount,
            payload,
            ..
        } = event
        {
            output.push_str(&format!(
                "\n  target {} amount {} payload {} bytes",
                target,
                amount,
                payload.len()
            ));
        }
        output.push('\n');
    }

    output.trim_end().to_string()
}
