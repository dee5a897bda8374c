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

//! Mutating calls and the state deltas they resolve to.

use crate::core::ledger::event::LedgerEvent;
use crate::core::types::{serde_amount, Address, Amount};
use serde::{Deserialize, Serialize};

/// A mutating ledger call. The caller identity travels separately.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Call {
    /// Move `amount` from the caller to `to`.
    Transfer {
        /// Recipient.
        to: Address,
        /// Amount.
        #[serde(with = "serde_amount")]
        amount: Amount,
    },
    /// Set the caller's allowance for `spender`.
    Approve {
        /// Spender.
        spender: Address,
        /// New allowance.
        #[serde(with = "serde_amount")]
        amount: Amount,
    },
    /// Spend `from`'s funds under the caller's allowance.
    TransferFrom {
        /// Owner of the funds.
        from: Address,
        /// Recipient.
        to: Address,
        /// Amount.
        #[serde(with = "serde_amount")]
        amount: Amount,
    },
    /// Owner-only supply increase, credited to `to` or the caller.
    Mint {
        /// Amount.
        #[serde(with = "serde_amount")]
        amount: Amount,
        /// Recipient; defaults to the caller.
        #[serde(default)]
        to: Option<Address>,
    },
    /// Destroy `amount` of the caller's balance.
    Burn {
        /// Amount.
        #[serde(with = "serde_amount")]
        amount: Amount,
    },
}

impl Call {
    /// Short operation name used in logs and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Call::Transfer { .. } => "transfer",
            Call::Approve { .. } => "approve",
            Call::TransferFrom { .. } => "transfer_from",
            Call::Mint { .. } => "mint",
            Call::Burn { .. } => "burn",
        }
    }
}

/// One resulting value of a state entry. Values are absolute, not deltas,
/// so replaying a write is idempotent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Write {
    /// New balance of an account.
    Balance {
        /// Account.
        account: Address,
        /// Balance after the call.
        value: Amount,
    },
    /// New allowance of an (owner, spender) pair.
    Allowance {
        /// Owner.
        owner: Address,
        /// Spender.
        spender: Address,
        /// Allowance after the call.
        value: Amount,
    },
    /// New total supply.
    TotalSupply(Amount),
}

/// Validated outcome of a call: every write it causes plus the event it emits.
///
/// Produced by [`TokenLedger::prepare`](crate::core::ledger::token::TokenLedger::prepare)
/// without touching state; applying it cannot fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateDelta {
    /// Writes in application order. Each entry is written at most once.
    pub writes: Vec<Write>,
    /// Event emitted on apply.
    pub event: LedgerEvent,
}
