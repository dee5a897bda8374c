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

mod common;

use amun_token::core::runtime::executor::LedgerExecutor;
use amun_token::core::state::ledger_store::LedgerStore;
use common::{arb_calls, deploy};
use proptest::prelude::*;

fn node(dir: &std::path::Path) -> LedgerExecutor {
    let store = LedgerStore::open(dir).unwrap();
    let ledger = deploy();
    store.write_genesis(&ledger).unwrap();
    LedgerExecutor::with_store(ledger, store)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_state_root_deterministic(calls in arb_calls(24)) {
        let dir1 = tempfile::tempdir().unwrap();
        let dir2 = tempfile::tempdir().unwrap();
        let n1 = node(dir1.path());
        let n2 = node(dir2.path());

        for (caller, call) in &calls {
            let r1 = n1.submit(*caller, call).map_err(|e| e.to_string());
            let r2 = n2.submit(*caller, call).map_err(|e| e.to_string());
            prop_assert_eq!(r1, r2);
        }

        let s1 = n1.store().unwrap();
        let s2 = n2.store().unwrap();
        prop_assert_eq!(s1.state_root().unwrap(), s2.state_root().unwrap());

        // the stored image rebuilds exactly the in-memory ledger
        let reloaded = s1.load().unwrap().unwrap();
        prop_assert_eq!(reloaded, n1.snapshot().unwrap());
    }
}
