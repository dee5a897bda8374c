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

/// Node configuration (TOML).
pub mod config;
/// Token ledger state machine.
pub mod ledger;
/// Serialized execution against a shared ledger.
pub mod runtime;
/// Persistent state, Merkle roots, and the ledger store.
pub mod state;
/// Deterministic core types and canonical encoding.
pub mod types;
