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

//! HTTP surface over a [`LedgerExecutor`].
//!
//! `POST /v1/calls` takes the caller identity from the request body and trusts it.
//! Deploy behind a gateway that authenticates the caller and rewrites that field.

use crate::core::ledger::{Call, LedgerError, Receipt};
use crate::core::runtime::executor::{ExecError, LedgerExecutor};
use crate::core::state::merkle::Side;
use crate::core::types::{serde_amount, Address, Amount};
use crate::monitoring::metrics::Metrics;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

const MAX_EVENTS_PER_PAGE: usize = 1_000;

/// Shared handler state.
#[derive(Clone)]
pub struct ApiState {
    /// Ledger executor.
    pub executor: Arc<LedgerExecutor>,
    /// Metrics registry rendered at `/metrics`.
    pub metrics: Arc<Metrics>,
}

/// Build the router.
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics))
        .route("/v1/token", get(token_info))
        .route("/v1/balances/:address", get(balance))
        .route("/v1/balances/:address/proof", get(balance_proof))
        .route("/v1/allowances/:owner/:spender", get(allowance))
        .route("/v1/events", get(events))
        .route("/v1/state_root", get(state_root))
        .route("/v1/calls", post(submit_call))
        .with_state(state)
}

/// Error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Stable error kind.
    pub kind: &'static str,
    /// Human-readable message including the error's parameters.
    pub message: String,
}

/// Handler error.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed request input.
    BadRequest(String),
    /// Resource not available on this node.
    NotFound(&'static str),
    /// Executor failure.
    Exec(ExecError),
    /// A blocking task died before answering.
    Internal(String),
}

impl From<ExecError> for ApiError {
    fn from(e: ExecError) -> Self {
        ApiError::Exec(e)
    }
}

fn ledger_error_kind(e: &LedgerError) -> &'static str {
    match e {
        LedgerError::InsufficientBalance { .. } => "insufficient_balance",
        LedgerError::InsufficientAllowance { .. } => "insufficient_allowance",
        LedgerError::NotAuthorized => "not_authorized",
        LedgerError::InvalidSender(_) => "invalid_sender",
        LedgerError::InvalidReceiver(_) => "invalid_receiver",
        LedgerError::InvalidApprover(_) => "invalid_approver",
        LedgerError::InvalidSpender(_) => "invalid_spender",
        LedgerError::Overflow => "overflow",
    }
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Exec(ExecError::Ledger(e)) => match e {
                LedgerError::InsufficientBalance { .. }
                | LedgerError::InsufficientAllowance { .. }
                | LedgerError::Overflow => StatusCode::UNPROCESSABLE_ENTITY,
                LedgerError::NotAuthorized => StatusCode::FORBIDDEN,
                LedgerError::InvalidSender(_)
                | LedgerError::InvalidReceiver(_)
                | LedgerError::InvalidApprover(_)
                | LedgerError::InvalidSpender(_) => StatusCode::BAD_REQUEST,
            },
            ApiError::Exec(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable kind string.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::NotFound(_) => "not_found",
            ApiError::Exec(ExecError::Ledger(e)) => ledger_error_kind(e),
            ApiError::Exec(ExecError::Store(_)) => "store",
            ApiError::Exec(ExecError::Poisoned) | ApiError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::BadRequest(m) => m.clone(),
            ApiError::NotFound(m) => (*m).to_string(),
            ApiError::Exec(e) => e.to_string(),
            ApiError::Internal(m) => m.clone(),
        };
        if status.is_server_error() {
            error!(kind = self.kind(), %message, "request failed");
        }
        (
            status,
            Json(ErrorBody {
                kind: self.kind(),
                message,
            }),
        )
            .into_response()
    }
}

/// Run sled I/O and write-lock waits off the async workers.
async fn blocking<R, F>(f: F) -> Result<R, ApiError>
where
    R: Send + 'static,
    F: FnOnce() -> Result<R, ApiError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(format!("blocking task: {e}")))?
}

fn parse_address(s: &str) -> Result<Address, ApiError> {
    s.parse()
        .map_err(|e| ApiError::BadRequest(format!("address {s:?}: {e}")))
}

/// `/healthz` body.
#[derive(Debug, Serialize)]
pub struct Health {
    /// Always "ok".
    pub status: &'static str,
    /// Crate version.
    pub version: &'static str,
    /// Git commit the binary was built from.
    pub git_sha: &'static str,
}

/// Liveness plus build info.
pub async fn healthz() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        git_sha: option_env!("VERGEN_GIT_SHA").unwrap_or("unknown"),
    })
}

/// Prometheus text exposition.
pub async fn metrics(State(st): State<ApiState>) -> Response {
    match st.metrics.render() {
        Ok(body) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

/// Token metadata and supply.
#[derive(Debug, Serialize)]
pub struct TokenInfo {
    /// Name.
    pub name: String,
    /// Symbol.
    pub symbol: String,
    /// Decimals.
    pub decimals: u8,
    /// Owner.
    pub owner: Address,
    /// Total supply.
    #[serde(with = "serde_amount")]
    pub total_supply: Amount,
}

/// `GET /v1/token`.
pub async fn token_info(State(st): State<ApiState>) -> Result<Json<TokenInfo>, ApiError> {
    let info = st.executor.read(|l| TokenInfo {
        name: l.name().to_string(),
        symbol: l.symbol().to_string(),
        decimals: l.decimals(),
        owner: l.owner(),
        total_supply: l.total_supply(),
    })?;
    Ok(Json(info))
}

/// Balance view.
#[derive(Debug, Serialize)]
pub struct BalanceView {
    /// Account.
    pub account: Address,
    /// Balance.
    #[serde(with = "serde_amount")]
    pub balance: Amount,
}

/// `GET /v1/balances/:address`.
pub async fn balance(
    State(st): State<ApiState>,
    Path(address): Path<String>,
) -> Result<Json<BalanceView>, ApiError> {
    let account = parse_address(&address)?;
    let balance = st.executor.balance_of(&account)?;
    Ok(Json(BalanceView { account, balance }))
}

/// One hop of a Merkle path.
#[derive(Debug, Serialize)]
pub struct ProofStep {
    /// "left" or "right".
    pub side: &'static str,
    /// Sibling hash, hex.
    pub sibling: String,
}

/// Balance inclusion proof.
#[derive(Debug, Serialize)]
pub struct BalanceProofView {
    /// Account.
    pub account: Address,
    /// Stored balance.
    #[serde(with = "serde_amount")]
    pub balance: Amount,
    /// State root, hex.
    pub root: String,
    /// Leaf hash, hex.
    pub leaf: String,
    /// Path from leaf to root.
    pub path: Vec<ProofStep>,
    /// Result of verifying the proof locally.
    pub verified: bool,
}

/// `GET /v1/balances/:address/proof`. Requires a store.
pub async fn balance_proof(
    State(st): State<ApiState>,
    Path(address): Path<String>,
) -> Result<Json<BalanceProofView>, ApiError> {
    let account = parse_address(&address)?;
    let executor = st.executor.clone();
    let bp = blocking(move || {
        executor
            .read_store(|_, store| store.prove_balance(&account))?
            .ok_or(ApiError::NotFound("node runs without a store"))?
            .map_err(|e| ApiError::Exec(e.into()))
    })
    .await?
    .ok_or(ApiError::NotFound("account has no stored balance"))?;
    let verified = bp.verify();
    Ok(Json(BalanceProofView {
        account: bp.account,
        balance: bp.balance,
        root: hex::encode(bp.root),
        leaf: hex::encode(bp.proof.leaf),
        path: bp
            .proof
            .path
            .iter()
            .map(|p| ProofStep {
                side: match p.side {
                    Side::Left => "left",
                    Side::Right => "right",
                },
                sibling: hex::encode(p.sibling),
            })
            .collect(),
        verified,
    }))
}

/// Allowance view.
#[derive(Debug, Serialize)]
pub struct AllowanceView {
    /// Owner.
    pub owner: Address,
    /// Spender.
    pub spender: Address,
    /// Allowance.
    #[serde(with = "serde_amount")]
    pub allowance: Amount,
}

/// `GET /v1/allowances/:owner/:spender`.
pub async fn allowance(
    State(st): State<ApiState>,
    Path((owner, spender)): Path<(String, String)>,
) -> Result<Json<AllowanceView>, ApiError> {
    let owner = parse_address(&owner)?;
    let spender = parse_address(&spender)?;
    let allowance = st.executor.allowance(&owner, &spender)?;
    Ok(Json(AllowanceView {
        owner,
        spender,
        allowance,
    }))
}

/// `GET /v1/events` query.
#[derive(Debug, Default, Deserialize)]
pub struct EventsQuery {
    /// First sequence number (default 0).
    pub since: Option<u64>,
    /// Page size (default and cap 1000).
    pub limit: Option<usize>,
}

/// `GET /v1/events`.
pub async fn events(
    State(st): State<ApiState>,
    Query(q): Query<EventsQuery>,
) -> Result<Json<Vec<Receipt>>, ApiError> {
    let limit = q
        .limit
        .unwrap_or(MAX_EVENTS_PER_PAGE)
        .min(MAX_EVENTS_PER_PAGE);
    let page = st.executor.events_since(q.since.unwrap_or(0), limit)?;
    Ok(Json(page))
}

/// State root view.
#[derive(Debug, Serialize)]
pub struct StateRootView {
    /// Merkle root over the stored state, hex.
    pub root: String,
}

/// `GET /v1/state_root`. Requires a store.
pub async fn state_root(State(st): State<ApiState>) -> Result<Json<StateRootView>, ApiError> {
    let executor = st.executor.clone();
    let root = blocking(move || {
        executor
            .read_store(|_, store| store.state_root())?
            .ok_or(ApiError::NotFound("node runs without a store"))?
            .map_err(|e| ApiError::Exec(e.into()))
    })
    .await?;
    Ok(Json(StateRootView {
        root: hex::encode(root),
    }))
}

/// `POST /v1/calls` body.
#[derive(Debug, Deserialize)]
pub struct CallRequest {
    /// Trusted caller identity.
    pub caller: Address,
    /// The call.
    pub call: Call,
}

/// `POST /v1/calls`.
pub async fn submit_call(
    State(st): State<ApiState>,
    Json(req): Json<CallRequest>,
) -> Result<Json<Receipt>, ApiError> {
    let executor = st.executor.clone();
    let receipt = blocking(move || Ok(executor.submit(req.caller, &req.call)?)).await?;
    Ok(Json(receipt))
}
