use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown billing code `{0}`")]
    UnknownCode(String),
    #[error("state `{0}` is not available")]
    UnknownState(String),
    #[error("invalid rate `{0}`: expected a positive dollar amount")]
    InvalidRate(String),
    #[error("an email address is required to run another comparison (pass --email)")]
    EmailRequired,
}

pub type Result<T> = std::result::Result<T, BenchError>;
