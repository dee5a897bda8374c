// Copyright (c) 2026 Amunchain
// Licensed under the Apache License, Version 2.0

#![forbid(unsafe_code)]

use proptest::prelude::*;

use amun_token::core::state::merkle::MerkleTree;

fn sorted_pairs(raw: Vec<(u64, [u8; 16])>) -> Vec<(Vec<u8>, Vec<u8>)> {
    let mut raw = raw;
    raw.sort_by(|a, b| a.0.cmp(&b.0));
    raw.dedup_by(|a, b| a.0 == b.0);
    raw.iter()
        .map(|(k, v)| (k.to_be_bytes().to_vec(), v.to_vec()))
        .collect()
}

proptest! {
    #[test]
    fn merkle_proof_verifies_at_every_index(
        raw in proptest::collection::vec((any::<u64>(), any::<[u8; 16]>()), 1..48),
        pick in any::<prop::sample::Index>(),
    ) {
        let pairs = sorted_pairs(raw);
        let tree = MerkleTree::from_sorted(&pairs);
        let root = tree.root();
        let idx = pick.index(pairs.len());

        let proof = tree.proof(idx).expect("proof exists for in-range index");
        prop_assert_eq!(proof.root(), root);
        prop_assert!(proof.verifies(root, &pairs[idx].0, &pairs[idx].1));
        // rebuilding from the same entries is deterministic
        prop_assert_eq!(MerkleTree::from_sorted(&pairs).root(), root);
    }

    #[test]
    fn merkle_proof_rejects_tampered_value(
        raw in proptest::collection::vec((any::<u64>(), any::<[u8; 16]>()), 1..32),
        pick in any::<prop::sample::Index>(),
    ) {
        let pairs = sorted_pairs(raw);
        let tree = MerkleTree::from_sorted(&pairs);
        let idx = pick.index(pairs.len());
        let proof = tree.proof(idx).unwrap();

        let mut forged = pairs[idx].1.clone();
        forged[15] ^= 1;
        prop_assert!(!proof.verifies(tree.root(), &pairs[idx].0, &forged));
    }
}

#[test]
fn empty_set_has_zero_root_and_no_proof() {
    let tree = MerkleTree::from_sorted(&[]);
    assert!(tree.is_empty());
    assert_eq!(tree.root(), [0u8; 32]);
    assert!(tree.proof(0).is_none());
}
