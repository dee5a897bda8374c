#![forbid(unsafe_code)]

/// axum routes and handlers.
pub mod http;
