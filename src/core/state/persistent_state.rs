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

//! Persistent key-value state using sled, with deterministic Merkle roots and inclusion proofs.
//!
//! Two trees live in one database: the default tree holds state entries and is the
//! only input to the state root; the `journal` tree holds the event log keyed by
//! big-endian sequence number. Both are written in a single transaction.

use crate::core::state::merkle::{Hash32, MerkleProof, MerkleTree};
use sled::transaction::{ConflictableTransactionError, TransactionError};
use sled::Transactional;
use std::path::Path;
use thiserror::Error;

const JOURNAL_TREE: &str = "journal";

/// State errors.
#[derive(Debug, Error)]
pub enum StateError {
    /// Opening the database or a tree failed.
    #[error("db open: {0}")]
    DbOpen(sled::Error),
    /// Read, write or transaction failure.
    #[error("db io: {0}")]
    DbIo(#[from] sled::Error),
    /// Journal key is not an 8-byte sequence number.
    #[error("bad journal key")]
    BadJournalKey,
    /// A journal append targeted a sequence number that is already recorded.
    #[error("journal seq {0} already recorded")]
    JournalSeqTaken(u64),
}

/// State write. Ledger entries are overwritten, never removed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KvOp {
    /// Put key/value.
    Put {
        /// Entry key.
        key: Vec<u8>,
        /// New value.
        value: Vec<u8>,
    },
}

/// Inclusion proof for one stored entry.
#[derive(Clone, Debug)]
pub struct KeyProof {
    /// Entry key.
    pub key: Vec<u8>,
    /// Entry value.
    pub value: Vec<u8>,
    /// State root the proof was built against.
    pub root: Hash32,
    /// Merkle path.
    pub proof: MerkleProof,
}

/// Persistent state wrapper.
#[derive(Clone)]
pub struct PersistentState {
    db: sled::Db,
    journal: sled::Tree,
}

impl PersistentState {
    /// Open sled DB at path (directory).
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StateError> {
        let db = sled::open(path).map_err(StateError::DbOpen)?;
        let journal = db.open_tree(JOURNAL_TREE).map_err(StateError::DbOpen)?;
        Ok(Self { db, journal })
    }

    /// Get value.
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        let v = self.db.get(key)?;
        Ok(v.map(|iv| iv.to_vec()))
    }

    /// All state entries whose key starts with `prefix`, in key order.
    pub fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StateError> {
        let mut out = Vec::new();
        for item in self.db.scan_prefix(prefix) {
            let (k, v) = item?;
            out.push((k.to_vec(), v.to_vec()));
        }
        Ok(out)
    }

    /// All journal entries in sequence order.
    pub fn journal(&self) -> Result<Vec<(u64, Vec<u8>)>, StateError> {
        let mut out = Vec::new();
        for item in self.journal.iter() {
            let (k, v) = item?;
            let seq: [u8; 8] = k.as_ref().try_into().map_err(|_| StateError::BadJournalKey)?;
            out.push((u64::from_be_bytes(seq), v.to_vec()));
        }
        Ok(out)
    }

    /// True if nothing has ever been committed.
    pub fn is_empty(&self) -> bool {
        self.db.is_empty() && self.journal.is_empty()
    }

    /// Atomic commit of state ops plus journal appends.
    ///
    /// Journal entries are append-only: a sequence number already present aborts the
    /// whole commit with [`StateError::JournalSeqTaken`].
    pub fn commit_atomic(
        &self,
        ops: &[KvOp],
        journal: &[(u64, Vec<u8>)],
    ) -> Result<(), StateError> {
        let res: Result<(), TransactionError<StateError>> =
            (&*self.db, &self.journal).transaction(|(state, log)| {
                for (seq, bytes) in journal {
                    let key = seq.to_be_bytes();
                    if log.get(&key[..])?.is_some() {
                        return Err(ConflictableTransactionError::Abort(
                            StateError::JournalSeqTaken(*seq),
                        ));
                    }
                    log.insert(&key[..], bytes.as_slice())?;
                }
                for KvOp::Put { key, value } in ops {
                    state.insert(key.as_slice(), value.as_slice())?;
                }
                Ok::<(), ConflictableTransactionError<StateError>>(())
            });

        match res {
            Ok(()) => Ok(()),
            Err(TransactionError::Abort(e)) => Err(e),
            Err(TransactionError::Storage(e)) => Err(StateError::DbIo(e)),
        }
    }

    /// Flush dirty pages to disk.
    pub fn flush(&self) -> Result<(), StateError> {
        self.db.flush()?;
        Ok(())
    }

    fn sorted_pairs(&self) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StateError> {
        // sled iterates in key order already.
        let mut pairs: Vec<(Vec<u8>, Vec<u8>)> = Vec::new();
        for item in self.db.iter() {
            let (k, v) = item?;
            pairs.push((k.to_vec(), v.to_vec()));
        }
        Ok(pairs)
    }

    /// Deterministic Merkle root over all state entries (journal excluded).
    pub fn state_root(&self) -> Result<Hash32, StateError> {
        Ok(MerkleTree::from_sorted(&self.sorted_pairs()?).root())
    }

    /// Produce an inclusion proof for a key, if it exists.
    pub fn prove_key(&self, key: &[u8]) -> Result<Option<KeyProof>, StateError> {
        let pairs = self.sorted_pairs()?;
        let Ok(i) = pairs.binary_search_by(|p| p.0.as_slice().cmp(key)) else {
            return Ok(None);
        };
        let tree = MerkleTree::from_sorted(&pairs);
        Ok(tree.proof(i).map(|proof| KeyProof {
            key: pairs[i].0.clone(),
            value: pairs[i].1.clone(),
            root: tree.root(),
            proof,
        }))
    }
}

impl KeyProof {
    /// Check the proof commits to this key and value under `root`.
    pub fn verify(&self) -> bool {
        self.proof.verifies(self.root, &self.key, &self.value)
    }
}
