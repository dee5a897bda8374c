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

use amun_token::core::ledger::{Call, TokenLedger, TokenMetadata};
use amun_token::core::types::{Address, Amount};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Clone, Debug, Arbitrary)]
struct Op {
    caller: u8,
    kind: u8,
    a: u8,
    b: u8,
    amount: u64,
    huge: bool,
}

fn account(i: u8) -> Address {
    // multiples of 5 map to the zero address
    if i % 5 == 0 {
        return Address::ZERO;
    }
    let mut b = [0u8; 20];
    b[19] = i % 5;
    Address::from_bytes(b)
}

fn call(op: &Op) -> Call {
    let amount: Amount = if op.huge { Amount::MAX } else { Amount::from(op.amount) };
    match op.kind % 5 {
        0 => Call::Transfer { to: account(op.a), amount },
        1 => Call::Approve { spender: account(op.a), amount },
        2 => Call::TransferFrom { from: account(op.a), to: account(op.b), amount },
        3 => Call::Mint { amount, to: Some(account(op.a)) },
        _ => Call::Burn { amount },
    }
}

fuzz_target!(|ops: Vec<Op>| {
    let meta = TokenMetadata {
        name: "Fuzz".into(),
        symbol: "FZ".into(),
        decimals: 18,
        owner: account(1),
    };
    let Ok(mut ledger) = TokenLedger::new(meta, 1_000_000) else {
        return;
    };

    for op in ops.iter().take(256) {
        let before = ledger.clone();
        match ledger.execute(account(op.caller), &call(op)) {
            Ok(r) => assert_eq!(r.seq + 1, ledger.events().next_seq()),
            Err(_) => assert_eq!(ledger, before),
        }
        assert!(ledger.is_conserved());
    }
});
