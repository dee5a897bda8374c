#![forbid(unsafe_code)]

/// Lock-serialized ledger executor with optional persistence.
pub mod executor;
