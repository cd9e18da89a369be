//! Error handling for finreport
//!
//! Defines the boundary error types and establishes a unified Result type
//! using anyhow for context chaining and error propagation. The transformation
//! core never produces these: bad numbers, missing fields and empty inputs are
//! recovered locally.

use thiserror::Error;

/// Errors raised at the loading and data-source boundary
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("unsupported file type: {0}. Supported formats: .json, .xlsx, .xls")]
    UnsupportedFile(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("warehouse error: {0}")]
    Warehouse(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for report operations
pub type Result<T> = anyhow::Result<T>;
