use std::error::Error as _;

use statusprobe_types::ConfigError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors preventing the verifier from starting at all.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Cannot build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Reason a single check failed. Never escapes the check that produced it.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Expected status code {expected}, got {actual}")]
    UnexpectedStatus { expected: u16, actual: u16 },
    #[error("Response body does not match expected schema: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Expected {field} to be {expected:?}, got {actual:?}")]
    Mismatch {
        field: String,
        expected: String,
        actual: String,
    },
    #[error("Field {0} is empty")]
    EmptyField(&'static str),
    #[error("Response does not contain {0} header")]
    MissingHeader(String),
    #[error("Could not find status check with id {id} in response")]
    NotListed { id: String },
}

impl From<reqwest::Error> for CheckError {
    fn from(e: reqwest::Error) -> Self {
        let mut msg = if e.is_timeout() {
            format!("timed out: {e}")
        } else {
            e.to_string()
        };
        let mut source = e.source();
        while let Some(cause) = source {
            msg.push_str(": ");
            msg.push_str(&cause.to_string());
            source = cause.source();
        }
        CheckError::Transport(msg)
    }
}

pub(crate) fn expect_eq(field: &str, expected: &str, actual: &str) -> Result<(), CheckError> {
    if expected == actual {
        Ok(())
    } else {
        Err(CheckError::Mismatch {
            field: field.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        })
    }
}

pub(crate) fn expect_non_empty(field: &'static str, value: &str) -> Result<(), CheckError> {
    if value.trim().is_empty() {
        Err(CheckError::EmptyField(field))
    } else {
        Ok(())
    }
}
