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

//! Prometheus metrics for the token node.

use crate::core::types::Amount;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use thiserror::Error;

/// Metrics errors.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus")]
    Prom,
}

/// Call outcome label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Applied.
    Ok,
    /// Rejected by the ledger.
    Rejected,
    /// Failed in the store or lock.
    Failed,
}

impl Outcome {
    fn as_str(self) -> &'static str {
        match self {
            Outcome::Ok => "ok",
            Outcome::Rejected => "rejected",
            Outcome::Failed => "failed",
        }
    }
}

/// Metrics container.
#[derive(Clone)]
pub struct Metrics {
    /// Registry.
    pub registry: Registry,

    /// Mutating calls by operation and outcome.
    pub calls_total: IntCounterVec,
    /// Events appended to the log.
    pub events_total: IntCounter,
    /// Current total supply (saturates at i64::MAX).
    pub total_supply: IntGauge,
    /// Store commit failures.
    pub store_failures_total: IntCounter,
}

impl Metrics {
    /// Create and register metrics.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let calls_total = IntCounterVec::new(
            Opts::new("amun_token_calls_total", "Mutating ledger calls"),
            &["op", "outcome"],
        )
        .map_err(|_| MetricsError::Prom)?;
        let events_total = IntCounter::new("amun_token_events_total", "Ledger events emitted")
            .map_err(|_| MetricsError::Prom)?;
        let total_supply = IntGauge::new("amun_token_total_supply", "Current total supply")
            .map_err(|_| MetricsError::Prom)?;
        let store_failures_total =
            IntCounter::new("amun_token_store_failures_total", "Store commit failures")
                .map_err(|_| MetricsError::Prom)?;

        registry
            .register(Box::new(calls_total.clone()))
            .map_err(|_| MetricsError::Prom)?;
        registry
            .register(Box::new(events_total.clone()))
            .map_err(|_| MetricsError::Prom)?;
        registry
            .register(Box::new(total_supply.clone()))
            .map_err(|_| MetricsError::Prom)?;
        registry
            .register(Box::new(store_failures_total.clone()))
            .map_err(|_| MetricsError::Prom)?;

        Ok(Self {
            registry,
            calls_total,
            events_total,
            total_supply,
            store_failures_total,
        })
    }

    /// Count one call.
    pub fn observe_call(&self, op: &str, outcome: Outcome) {
        self.calls_total
            .with_label_values(&[op, outcome.as_str()])
            .inc();
    }

    /// Publish the current supply.
    pub fn set_supply(&self, supply: Amount) {
        self.total_supply
            .set(i64::try_from(supply).unwrap_or(i64::MAX));
    }

    /// Render the registry in the Prometheus text format.
    pub fn render(&self) -> Result<String, MetricsError> {
        let mut buf = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buf)
            .map_err(|_| MetricsError::Prom)?;
        String::from_utf8(buf).map_err(|_| MetricsError::Prom)
    }
}
