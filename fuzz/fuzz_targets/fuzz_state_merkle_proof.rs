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

#![no_main]
#![forbid(unsafe_code)]

use amun_token::core::state::merkle::MerkleTree;
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Clone, Debug, Arbitrary)]
struct Input {
    pairs: Vec<(Vec<u8>, Vec<u8>)>,
    index: u16,
    flip: u8,
}

fuzz_target!(|inp: Input| {
    let mut pairs = inp.pairs;
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    pairs.dedup_by(|a, b| a.0 == b.0);

    let tree = MerkleTree::from_sorted(&pairs);
    if tree.is_empty() {
        return;
    }
    let root = tree.root();
    let idx = (inp.index as usize) % pairs.len();
    let p = tree.proof(idx).expect("in-range proof");
    let (k, v) = &pairs[idx];
    assert!(p.verifies(root, k, v));

    let mut forged = v.clone();
    forged.push(inp.flip);
    assert!(!p.verifies(root, k, &forged));
});
