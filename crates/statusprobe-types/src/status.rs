use garde::Validate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_GREETING: &str = "Hello World";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Greeting {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateStatusCheck {
    #[garde(length(min = 1, max = 255))]
    pub client_name: String,
}

/// Status check record as stored and returned by the backend.
///
/// `timestamp` is kept as the raw string, backends differ in whether they
/// emit an offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCheck {
    pub id: String,
    pub client_name: String,
    pub timestamp: String,
}
