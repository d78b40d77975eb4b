//! Mock ledger for testing.
//!
//! Records every transfer it is asked to perform. Can be given a finite
//! balance or told to reject everything, so tests can drive dispatch failures.

use super::traits::*;
use crate::identity::Identity;
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A transfer the mock ledger accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub target: Identity,
    pub amount: u64,
    pub payload: Vec<u8>,
}

/// Mock ledger client for testing.
#[derive(Clone, Default)]
pub struct MockLedger {
    state: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    transfers: Vec<Transfer>,
    /// `None` means unlimited funds.
    balance: Option<u64>,
    reject_reason: Option<String>,
    attempts: usize,
}

impl MockLedger {
    /// Create a ledger with unlimited funds that accepts every transfer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger holding a finite balance.
    pub fn with_balance(balance: u64) -> Self {
        let ledger = Self::new();
        ledger.lock().balance = Some(balance);
        ledger
    }

    /// Make every subsequent transfer fail with `LedgerError::Rejected`.
    pub fn reject_all(&self, reason: impl Into<String>) {
        self.lock().reject_reason = Some(reason.into());
    }

    /// Accept transfers again after `reject_all`.
    pub fn accept_all(&self) {
        self.lock().reject_reason = None;
    }

    /// Transfers that succeeded, in order.
    pub fn transfers(&self) -> Vec<Transfer> {
        self.lock().transfers.clone()
    }

    /// Number of times `transfer` was called, successful or not.
    pub fn attempts(&self) -> usize {
        self.lock().attempts
    }

    /// Remaining balance (`None` when unlimited).
    pub fn balance(&self) -> Option<u64> {
        self.lock().balance
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Ledger for MockLedger {
    async fn transfer(&self, target: &Identity, amount: u64, payload: &[u8]) -> LedgerResult<()> {
        let mut state = self.lock();
        state.attempts += 1;

        if let Some(reason) = &state.reject_reason {
            return Err(LedgerError::Rejected(reason.clone()));
        }

        if let Some(available) = state.balance {
            if amount > available {
                return Err(LedgerError::InsufficientFunds {
                    requested: amount,
                    available,
                });
            }
            state.balance = Some(available - amount);
        }

        state.transfers.push(Transfer {
            target: *target,
            amount,
            payload: payload.to_vec(),
        });
        Ok(())
    }
}
