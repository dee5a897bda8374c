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
#![deny(missing_docs)]

//! Token ledger persistence on top of [`PersistentState`].
//!
//! ## Key layout (state tree)
//! ```text
//! meta                         -> canonical(TokenMetadata)
//! supply                       -> u128 big-endian (16 bytes)
//! bal/<address:20>             -> u128 big-endian
//! alw/<owner:20><spender:20>   -> u128 big-endian
//! ```
//! The journal tree maps `u64` big-endian sequence numbers to `canonical(LedgerEvent)`.
//!
//! Amount values are fixed-width so the state root does not depend on the encoder.

use crate::core::ledger::{EventLog, LedgerEvent, StateDelta, TokenLedger, TokenMetadata, Write};
use crate::core::state::merkle::{Hash32, MerkleProof};
use crate::core::state::persistent_state::{KvOp, PersistentState, StateError};
use crate::core::types::{
    decode_canonical_limited, encode_canonical, Address, Amount, CodecError, ADDRESS_LEN,
};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

const META_KEY: &[u8] = b"meta";
const SUPPLY_KEY: &[u8] = b"supply";
const BALANCE_PREFIX: &[u8] = b"bal/";
const ALLOWANCE_PREFIX: &[u8] = b"alw/";

const MAX_META_BYTES: usize = 4 * 1024;
const MAX_EVENT_BYTES: usize = 256;

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying database failure.
    #[error("state: {0}")]
    State(#[from] StateError),
    /// Value could not be encoded or decoded.
    #[error("codec: {0}")]
    Codec(#[from] CodecError),
    /// Stored data violates the ledger's invariants or layout.
    #[error("corrupt store: {0}")]
    Corrupt(&'static str),
    /// Genesis attempted on a non-empty store.
    #[error("store already initialized")]
    AlreadyInitialized,
}

/// State-tree key of an account balance.
pub fn balance_key(account: &Address) -> Vec<u8> {
    let mut k = Vec::with_capacity(BALANCE_PREFIX.len() + ADDRESS_LEN);
    k.extend_from_slice(BALANCE_PREFIX);
    k.extend_from_slice(account.as_bytes());
    k
}

/// State-tree key of an allowance.
pub fn allowance_key(owner: &Address, spender: &Address) -> Vec<u8> {
    let mut k = Vec::with_capacity(ALLOWANCE_PREFIX.len() + 2 * ADDRESS_LEN);
    k.extend_from_slice(ALLOWANCE_PREFIX);
    k.extend_from_slice(owner.as_bytes());
    k.extend_from_slice(spender.as_bytes());
    k
}

/// Fixed-width value encoding of an amount.
pub fn encode_amount(v: Amount) -> Vec<u8> {
    v.to_be_bytes().to_vec()
}

fn decode_amount(bytes: &[u8]) -> Result<Amount, StoreError> {
    let arr: [u8; 16] = bytes
        .try_into()
        .map_err(|_| StoreError::Corrupt("amount width"))?;
    Ok(Amount::from_be_bytes(arr))
}

fn write_op(w: &Write) -> KvOp {
    match w {
        Write::Balance { account, value } => KvOp::Put {
            key: balance_key(account),
            value: encode_amount(*value),
        },
        Write::Allowance {
            owner,
            spender,
            value,
        } => KvOp::Put {
            key: allowance_key(owner, spender),
            value: encode_amount(*value),
        },
        Write::TotalSupply(v) => KvOp::Put {
            key: SUPPLY_KEY.to_vec(),
            value: encode_amount(*v),
        },
    }
}

/// Balance of one account together with its inclusion proof.
#[derive(Clone, Debug)]
pub struct BalanceProof {
    /// Account.
    pub account: Address,
    /// Stored balance.
    pub balance: Amount,
    /// State root at proof time.
    pub root: Hash32,
    /// Merkle path.
    pub proof: MerkleProof,
}

impl BalanceProof {
    /// Check the proof commits to exactly this account and balance under `root`.
    pub fn verify(&self) -> bool {
        self.proof.verifies(
            self.root,
            &balance_key(&self.account),
            &encode_amount(self.balance),
        )
    }
}

/// Durable home of one token ledger.
#[derive(Clone)]
pub struct LedgerStore {
    state: PersistentState,
}

impl LedgerStore {
    /// Open (or create) the store in `dir`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        Ok(Self {
            state: PersistentState::open(dir)?,
        })
    }

    /// Underlying key-value state.
    pub fn state(&self) -> &PersistentState {
        &self.state
    }

    /// True when no ledger has been written yet.
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Write a freshly created ledger in full. Fails on a non-empty store.
    pub fn write_genesis(&self, ledger: &TokenLedger) -> Result<(), StoreError> {
        if !self.is_empty() {
            return Err(StoreError::AlreadyInitialized);
        }
        let mut ops = vec![
            KvOp::Put {
                key: META_KEY.to_vec(),
                value: encode_canonical(ledger.metadata())?,
            },
            KvOp::Put {
                key: SUPPLY_KEY.to_vec(),
                value: encode_amount(ledger.total_supply()),
            },
        ];
        for (account, value) in ledger.balances() {
            ops.push(KvOp::Put {
                key: balance_key(account),
                value: encode_amount(*value),
            });
        }
        for ((owner, spender), value) in ledger.allowances() {
            ops.push(KvOp::Put {
                key: allowance_key(owner, spender),
                value: encode_amount(*value),
            });
        }
        let journal = ledger
            .events()
            .since(0, usize::MAX)
            .into_iter()
            .map(|r| Ok((r.seq, encode_canonical(&r.event)?)))
            .collect::<Result<Vec<_>, CodecError>>()?;

        self.state.commit_atomic(&ops, &journal)?;
        self.state.flush()?;
        info!(
            symbol = %ledger.symbol(),
            owner = %ledger.owner(),
            supply = %ledger.total_supply(),
            "ledger genesis written"
        );
        Ok(())
    }

    /// Persist a prepared delta whose event will receive sequence `seq`.
    pub fn commit_delta(&self, delta: &StateDelta, seq: u64) -> Result<(), StoreError> {
        let ops: Vec<KvOp> = delta.writes.iter().map(write_op).collect();
        let journal = vec![(seq, encode_canonical(&delta.event)?)];
        self.state.commit_atomic(&ops, &journal)?;
        debug!(seq, writes = ops.len(), "delta committed");
        Ok(())
    }

    /// Rebuild the ledger, or `None` for an empty store.
    ///
    /// Rejects stores whose balances do not sum to the recorded supply.
    pub fn load(&self) -> Result<Option<TokenLedger>, StoreError> {
        let Some(meta_bytes) = self.state.get(META_KEY)? else {
            if self.is_empty() {
                return Ok(None);
            }
            return Err(StoreError::Corrupt("missing metadata"));
        };
        let meta: TokenMetadata = decode_canonical_limited(&meta_bytes, MAX_META_BYTES)?;

        let supply = match self.state.get(SUPPLY_KEY)? {
            Some(b) => decode_amount(&b)?,
            None => return Err(StoreError::Corrupt("missing supply")),
        };

        let mut balances = BTreeMap::new();
        for (k, v) in self.state.scan_prefix(BALANCE_PREFIX)? {
            let account = Address::from_slice(&k[BALANCE_PREFIX.len()..])
                .map_err(|_| StoreError::Corrupt("balance key"))?;
            balances.insert(account, decode_amount(&v)?);
        }

        let mut allowances = BTreeMap::new();
        for (k, v) in self.state.scan_prefix(ALLOWANCE_PREFIX)? {
            let body = &k[ALLOWANCE_PREFIX.len()..];
            if body.len() != 2 * ADDRESS_LEN {
                return Err(StoreError::Corrupt("allowance key"));
            }
            let owner = Address::from_slice(&body[..ADDRESS_LEN])
                .map_err(|_| StoreError::Corrupt("allowance key"))?;
            let spender = Address::from_slice(&body[ADDRESS_LEN..])
                .map_err(|_| StoreError::Corrupt("allowance key"))?;
            allowances.insert((owner, spender), decode_amount(&v)?);
        }

        let journal = self.state.journal()?;
        let base = journal.first().map(|(seq, _)| *seq).unwrap_or(0);
        let mut events = Vec::with_capacity(journal.len());
        for (i, (seq, bytes)) in journal.iter().enumerate() {
            if *seq != base + i as u64 {
                return Err(StoreError::Corrupt("journal gap"));
            }
            let ev: LedgerEvent = decode_canonical_limited(bytes, MAX_EVENT_BYTES)?;
            events.push(ev);
        }

        let ledger = TokenLedger::from_parts(
            meta,
            supply,
            balances,
            allowances,
            EventLog::from_parts(base, events),
        );
        if !ledger.is_conserved() {
            return Err(StoreError::Corrupt("balances do not sum to total supply"));
        }
        info!(
            symbol = %ledger.symbol(),
            supply = %ledger.total_supply(),
            events = ledger.events().next_seq(),
            "ledger loaded"
        );
        Ok(Some(ledger))
    }

    /// Current state root.
    pub fn state_root(&self) -> Result<Hash32, StoreError> {
        Ok(self.state.state_root()?)
    }

    /// Stored balance of `account` with an inclusion proof, if the account was ever credited.
    pub fn prove_balance(&self, account: &Address) -> Result<Option<BalanceProof>, StoreError> {
        let Some(kp) = self.state.prove_key(&balance_key(account))? else {
            return Ok(None);
        };
        Ok(Some(BalanceProof {
            account: *account,
            balance: decode_amount(&kp.value)?,
            root: kp.root,
            proof: kp.proof,
        }))
    }
}
