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

//! Amunchain fungible token ledger.
//!
//! This repository provides:
//! - A deterministic token ledger (transfer, approve, transfer_from, mint, burn)
//!   with supply conservation and checked arithmetic
//! - An append-only, sequence-numbered event log (`Transfer` / `Approval`)
//! - A serializing executor that persists each state delta atomically to sled
//! - Deterministic Merkle state roots and balance inclusion proofs
//! - An HTTP surface with Prometheus metrics and structured logging

/// HTTP surface over the executor.
pub mod api;
/// Core protocol primitives (types, ledger, runtime, state).
pub mod core;
/// Observability (metrics).
pub mod monitoring;
