#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Amunchain token node entrypoint (systemd-friendly).
//! Opens (or creates) the ledger store and serves the HTTP API until SIGINT/SIGTERM.

use std::path::PathBuf;
use std::sync::Arc;

use amun_token::api::http::{router, ApiState};
use amun_token::core::config::{ConfigSource, NodeConfig};
use amun_token::core::ledger::{TokenLedger, TokenMetadata};
use amun_token::core::runtime::executor::LedgerExecutor;
use amun_token::core::state::ledger_store::LedgerStore;
use amun_token::monitoring::metrics::Metrics;
use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);
    let _ = if env("AMUN_LOG_FORMAT", "compact") == "json" {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
}

/// Config file if present, otherwise defaults; env overrides apply either way.
fn load_config() -> Result<(NodeConfig, ConfigSource)> {
    let path = PathBuf::from(env("AMUN_TOKEN_CONFIG", "./amun-token.toml"));
    let (mut cfg, source) = NodeConfig::load_or_default(&path)
        .with_context(|| format!("loading {}", path.display()))?;
    if source == ConfigSource::Defaults {
        warn!(path = %path.display(), "config file not found; using defaults");
    }
    if let Ok(dir) = std::env::var("AMUN_DATA_DIR") {
        cfg.node.data_dir = dir;
    }
    if let Ok(addr) = std::env::var("AMUN_HTTP_ADDR") {
        cfg.http.listen_addr = addr;
    }
    Ok((cfg, source))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                warn!(?e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown requested");
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let (cfg, source) = load_config()?;
    info!(
        node = %cfg.node.name,
        data_dir = %cfg.node.data_dir,
        version = env!("CARGO_PKG_VERSION"),
        git_sha = option_env!("VERGEN_GIT_SHA").unwrap_or("unknown"),
        "amun-token node starting"
    );

    let store = LedgerStore::open(&cfg.node.data_dir)
        .with_context(|| format!("opening store at {}", cfg.node.data_dir))?;
    let ledger = match store.load()? {
        Some(ledger) => {
            if cfg.token_mismatch(source, ledger.metadata()) {
                warn!(
                    stored_symbol = %ledger.symbol(),
                    stored_owner = %ledger.owner(),
                    "stored token differs from [token] config; using stored ledger"
                );
            }
            ledger
        }
        None => {
            cfg.validate().context("genesis config")?;
            let ledger = TokenLedger::new(
                TokenMetadata {
                    name: cfg.token.name.clone(),
                    symbol: cfg.token.symbol.clone(),
                    decimals: cfg.token.decimals,
                    owner: cfg.token.owner,
                },
                cfg.token.initial_supply,
            )
            .context("genesis ledger")?;
            store.write_genesis(&ledger)?;
            ledger
        }
    };
    info!(
        symbol = %ledger.symbol(),
        owner = %ledger.owner(),
        supply = %ledger.total_supply(),
        "ledger ready"
    );

    let metrics = Arc::new(Metrics::new().context("metrics init")?);
    let executor = Arc::new(
        LedgerExecutor::with_store(ledger, store.clone()).with_metrics(metrics.clone()),
    );

    let app = router(ApiState { executor, metrics });
    let listener = tokio::net::TcpListener::bind(&cfg.http.listen_addr)
        .await
        .with_context(|| format!("binding {}", cfg.http.listen_addr))?;
    info!(addr = %cfg.http.listen_addr, "http listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server")?;

    store.state().flush().context("final flush")?;
    info!("amun-token node stopped");
    Ok(())
}
