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

//! Ledger notifications and the append-only event log.

use crate::core::types::{serde_amount, Address, Amount};
use serde::{Deserialize, Serialize};

/// Notification emitted by a successful mutating call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEvent {
    /// Balance movement. `from` is [`Address::ZERO`] for mints, `to` is zero for burns.
    Transfer {
        /// Debited account (or zero).
        from: Address,
        /// Credited account (or zero).
        to: Address,
        /// Moved amount.
        #[serde(with = "serde_amount")]
        amount: Amount,
    },
    /// Allowance set by `owner` for `spender`.
    Approval {
        /// Account whose funds may be spent.
        owner: Address,
        /// Account allowed to spend.
        spender: Address,
        /// New allowance (overwrites the previous one).
        #[serde(with = "serde_amount")]
        amount: Amount,
    },
}

/// Event with its position in the log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Zero-based sequence number in the event log.
    pub seq: u64,
    /// The emitted event.
    pub event: LedgerEvent,
}

/// Append-only event log. Sequence numbers are dense and start at `base`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventLog {
    base: u64,
    entries: Vec<LedgerEvent>,
}

impl EventLog {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a log whose first retained entry has sequence `base`.
    pub fn from_parts(base: u64, entries: Vec<LedgerEvent>) -> Self {
        Self { base, entries }
    }

    /// Sequence number the next event will receive.
    pub fn next_seq(&self) -> u64 {
        self.base + self.entries.len() as u64
    }

    /// Number of retained events.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing was ever emitted (or retained).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn append(&mut self, event: LedgerEvent) -> Receipt {
        let seq = self.next_seq();
        self.entries.push(event.clone());
        Receipt { seq, event }
    }

    /// All retained events in emission order.
    pub fn as_slice(&self) -> &[LedgerEvent] {
        &self.entries
    }

    /// Up to `limit` receipts starting at sequence `since`.
    pub fn since(&self, since: u64, limit: usize) -> Vec<Receipt> {
        let start = since.saturating_sub(self.base);
        let start = usize::try_from(start).unwrap_or(usize::MAX);
        self.entries
            .iter()
            .enumerate()
            .skip(start)
            .take(limit)
            .map(|(i, e)| Receipt {
                seq: self.base + i as u64,
                event: e.clone(),
            })
            .collect()
    }
}
