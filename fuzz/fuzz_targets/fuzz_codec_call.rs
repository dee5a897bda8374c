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

use amun_token::core::ledger::{Call, LedgerEvent};
use amun_token::core::types::{decode_canonical_limited, encode_canonical};
use libfuzzer_sys::fuzz_target;

const MAX: usize = 512;

fuzz_target!(|data: &[u8]| {
    if let Ok(call) = decode_canonical_limited::<Call>(data, MAX) {
        let bytes = encode_canonical(&call).expect("re-encode");
        let again: Call = decode_canonical_limited(&bytes, MAX).expect("re-decode");
        assert_eq!(call, again);
    }
    let _ = decode_canonical_limited::<LedgerEvent>(data, MAX);
});
