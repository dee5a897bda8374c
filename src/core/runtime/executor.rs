// Copyright (c) 2026 Amunchain
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Serialized execution of ledger calls for concurrent hosts.
//!
//! One `RwLock` guards the whole ledger. A mutating call holds the write lock across
//! prepare, store commit and apply, so no reader ever sees a half-applied call and
//! the journal sequence always matches the in-memory log. Queries share the read lock,
//! including store reads (state root, proofs) made through [`LedgerExecutor::read_store`].

use crate::core::ledger::{Call, LedgerError, Receipt, TokenLedger};
use crate::core::state::ledger_store::{LedgerStore, StoreError};
use crate::core::types::{Address, Amount};
use crate::monitoring::metrics::{Metrics, Outcome};
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tracing::{debug, error, warn};

/// Execution error.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The call violates a ledger rule.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    /// Persisting the delta failed; nothing was applied.
    #[error("store: {0}")]
    Store(#[from] StoreError),
    /// A writer panicked while holding the lock.
    #[error("ledger lock poisoned")]
    Poisoned,
}

/// Shared, serialized access to one token ledger.
pub struct LedgerExecutor {
    ledger: RwLock<TokenLedger>,
    store: Option<LedgerStore>,
    metrics: Option<Arc<Metrics>>,
}

impl LedgerExecutor {
    /// In-memory executor.
    pub fn new(ledger: TokenLedger) -> Self {
        Self {
            ledger: RwLock::new(ledger),
            store: None,
            metrics: None,
        }
    }

    /// Executor that commits every delta to `store` before applying it.
    ///
    /// `ledger` must be the ledger `store` currently holds.
    pub fn with_store(ledger: TokenLedger, store: LedgerStore) -> Self {
        Self {
            ledger: RwLock::new(ledger),
            store: Some(store),
            metrics: None,
        }
    }

    /// Attach metrics.
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        if let Ok(l) = self.ledger.get_mut() {
            metrics.set_supply(l.total_supply());
        }
        self.metrics = Some(metrics);
        self
    }

    /// Attached store, if any.
    pub fn store(&self) -> Option<&LedgerStore> {
        self.store.as_ref()
    }

    fn observe(&self, op: &str, outcome: Outcome) {
        if let Some(m) = &self.metrics {
            m.observe_call(op, outcome);
        }
    }

    /// Validate, persist and apply one call on behalf of `caller`.
    ///
    /// On any error the ledger, the store and the event log are unchanged.
    pub fn submit(&self, caller: Address, call: &Call) -> Result<Receipt, ExecError> {
        let op = call.kind();
        let mut ledger = self.ledger.write().map_err(|_| {
            self.observe(op, Outcome::Failed);
            ExecError::Poisoned
        })?;

        let delta = match ledger.prepare(caller, call) {
            Ok(d) => d,
            Err(e) => {
                warn!(op, %caller, error = %e, "call rejected");
                self.observe(op, Outcome::Rejected);
                return Err(e.into());
            }
        };

        if let Some(store) = &self.store {
            let seq = ledger.events().next_seq();
            if let Err(e) = store.commit_delta(&delta, seq) {
                error!(op, %caller, seq, error = %e, "store commit failed");
                if let Some(m) = &self.metrics {
                    m.store_failures_total.inc();
                }
                self.observe(op, Outcome::Failed);
                return Err(e.into());
            }
        }

        let receipt = ledger.apply(delta);
        let supply = ledger.total_supply();
        drop(ledger);

        if let Some(m) = &self.metrics {
            m.observe_call(op, Outcome::Ok);
            m.events_total.inc();
            m.set_supply(supply);
        }
        debug!(op, %caller, seq = receipt.seq, "call applied");
        Ok(receipt)
    }

    /// Run `f` against a consistent view of the ledger.
    pub fn read<R>(&self, f: impl FnOnce(&TokenLedger) -> R) -> Result<R, ExecError> {
        let ledger = self.ledger.read().map_err(|_| ExecError::Poisoned)?;
        Ok(f(&ledger))
    }

    /// Run `f` against the ledger and its store while holding the read lock, so
    /// no commit can land mid-read. `None` for an in-memory executor.
    pub fn read_store<R>(
        &self,
        f: impl FnOnce(&TokenLedger, &LedgerStore) -> R,
    ) -> Result<Option<R>, ExecError> {
        let Some(store) = &self.store else {
            return Ok(None);
        };
        let ledger = self.ledger.read().map_err(|_| ExecError::Poisoned)?;
        Ok(Some(f(&ledger, store)))
    }

    /// Clone of the current ledger.
    pub fn snapshot(&self) -> Result<TokenLedger, ExecError> {
        self.read(TokenLedger::clone)
    }

    /// Total supply.
    pub fn total_supply(&self) -> Result<Amount, ExecError> {
        self.read(|l| l.total_supply())
    }

    /// Balance of `account`.
    pub fn balance_of(&self, account: &Address) -> Result<Amount, ExecError> {
        self.read(|l| l.balance_of(account))
    }

    /// Allowance of `spender` over `owner`.
    pub fn allowance(&self, owner: &Address, spender: &Address) -> Result<Amount, ExecError> {
        self.read(|l| l.allowance(owner, spender))
    }

    /// Up to `limit` receipts from sequence `since`.
    pub fn events_since(&self, since: u64, limit: usize) -> Result<Vec<Receipt>, ExecError> {
        self.read(|l| l.events().since(since, limit))
    }
}
