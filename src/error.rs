//! Error types for SplitTUI

use thiserror::Error;

#[derive(Error, Debug)]
pub(crate) enum Error {
    /// Transport failure or a non-2xx response. `status` is `None` when the
    /// request never produced a response.
    #[error("{}", network_message(.status, .message))]
    Network { status: Option<u16>, message: String },

    #[error("No changes to submit")]
    EmptyBatch,

    #[error("No user identity stored. Log in with :login <userid>")]
    MissingIdentity,

    #[error("Invalid page size: {0}")]
    InvalidPageSize(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Network {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        }
    }
}

fn network_message(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("Request failed ({code}): {message}"),
        None => format!("Request failed: {message}"),
    }
}

pub(crate) type Result<T> = std::result::Result<T, Error>;
