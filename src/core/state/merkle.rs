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

//! Binary Merkle tree committing to the ledger's key-sorted state entries.
//!
//! leaf = H( "Amun-Token-Leaf-v1" || H(key) || H(value) )
//! node = H( "Amun-Token-Node-v1" || left || right )
//!
//! A level with an odd count carries its last hash up by pairing it with itself.
//! The empty tree has the all-zero root.

use ring::digest;

/// SHA-256 digest.
pub type Hash32 = [u8; 32];

const LEAF_DOMAIN: &[u8] = b"Amun-Token-Leaf-v1";
const NODE_DOMAIN: &[u8] = b"Amun-Token-Node-v1";

/// Position of a sibling relative to the running hash.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// Sibling hashes first.
    Left,
    /// Sibling hashes second.
    Right,
}

/// One hop of an inclusion path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProofItem {
    /// Sibling position.
    pub side: Side,
    /// Sibling hash.
    pub sibling: Hash32,
}

/// Inclusion proof for one entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerkleProof {
    /// Hash of the proven entry.
    pub leaf: Hash32,
    /// Hops from the leaf up to the root.
    pub path: Vec<ProofItem>,
}

impl MerkleProof {
    /// Root this proof folds up to.
    pub fn root(&self) -> Hash32 {
        self.path.iter().fold(self.leaf, |acc, hop| match hop.side {
            Side::Left => hash_node(&hop.sibling, &acc),
            Side::Right => hash_node(&acc, &hop.sibling),
        })
    }

    /// True when the proof commits to exactly `(key, value)` under `root`.
    pub fn verifies(&self, root: Hash32, key: &[u8], value: &[u8]) -> bool {
        self.leaf == hash_leaf(key, value) && self.root() == root
    }
}

fn sha256(parts: &[&[u8]]) -> Hash32 {
    let mut ctx = digest::Context::new(&digest::SHA256);
    for p in parts {
        ctx.update(p);
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(ctx.finish().as_ref());
    out
}

/// Leaf hash of one (key, value) entry.
pub fn hash_leaf(key: &[u8], value: &[u8]) -> Hash32 {
    sha256(&[LEAF_DOMAIN, &sha256(&[key]), &sha256(&[value])])
}

fn hash_node(left: &Hash32, right: &Hash32) -> Hash32 {
    sha256(&[NODE_DOMAIN, left, right])
}

/// Every level of the tree, leaves first. Built once, then queried for the root
/// and any number of proofs.
#[derive(Clone, Debug)]
pub struct MerkleTree {
    levels: Vec<Vec<Hash32>>,
}

impl MerkleTree {
    /// Build over entries already sorted by key.
    pub fn from_sorted(entries: &[(Vec<u8>, Vec<u8>)]) -> Self {
        let leaves: Vec<Hash32> = entries.iter().map(|(k, v)| hash_leaf(k, v)).collect();
        let mut levels = vec![leaves];
        loop {
            let top = &levels[levels.len() - 1];
            if top.len() <= 1 {
                break;
            }
            let parent: Vec<Hash32> = top
                .chunks(2)
                .map(|pair| hash_node(&pair[0], pair.get(1).unwrap_or(&pair[0])))
                .collect();
            levels.push(parent);
        }
        Self { levels }
    }

    /// Number of leaves.
    pub fn len(&self) -> usize {
        self.levels[0].len()
    }

    /// True for a tree without entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Root hash.
    pub fn root(&self) -> Hash32 {
        self.levels
            .last()
            .and_then(|top| top.first())
            .copied()
            .unwrap_or([0u8; 32])
    }

    /// Proof for the leaf at `index`, or `None` when out of range.
    pub fn proof(&self, index: usize) -> Option<MerkleProof> {
        let leaf = *self.levels[0].get(index)?;
        let mut idx = index;
        let mut path = Vec::with_capacity(self.levels.len().saturating_sub(1));
        for level in &self.levels[..self.levels.len() - 1] {
            let (side, sib) = if idx % 2 == 1 {
                (Side::Left, idx - 1)
            } else {
                (Side::Right, idx + 1)
            };
            path.push(ProofItem {
                side,
                sibling: level.get(sib).copied().unwrap_or(level[idx]),
            });
            idx /= 2;
        }
        Some(MerkleProof { leaf, path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(n: u8) -> Vec<(Vec<u8>, Vec<u8>)> {
        (0..n).map(|i| (vec![i], vec![i, i])).collect()
    }

    #[test]
    fn single_leaf_is_its_own_root() {
        let t = MerkleTree::from_sorted(&entries(1));
        let p = t.proof(0).unwrap();
        assert!(p.path.is_empty());
        assert_eq!(t.root(), hash_leaf(&[0], &[0, 0]));
    }

    #[test]
    fn odd_leaf_pairs_with_itself() {
        let t = MerkleTree::from_sorted(&entries(3));
        let p = t.proof(2).unwrap();
        assert_eq!(p.path[0].sibling, p.leaf);
        assert!(p.verifies(t.root(), &[2], &[2, 2]));
        assert!(t.proof(3).is_none());
    }
}
