// Error taxonomy for the analyzer client. Every variant is fatal for a CLI
// run; the binary turns them into exit code 1.

use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Wrong number of positional arguments or an unknown flag.
    #[error("{0}")]
    Arguments(#[from] clap::Error),

    /// The input path is missing or is not a regular file.
    #[error("image file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("request to analyzer failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("analyzer returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The service answered 2xx but reported that the analysis itself failed.
    #[error("analysis failed: {0}")]
    Upstream(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;
