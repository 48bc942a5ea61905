use std::{fmt, str::FromStr};

use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Shared secret the backend is deployed with.
///
/// The verifier only needs to know it is present, the value never leaves
/// the process and is redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl FromStr for Secret {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        Ok(Secret(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Validate, Serialize, Deserialize)]
#[garde(transparent)]
pub struct ClientName(#[garde(length(min = 1, max = 255))] String);

impl FromStr for ClientName {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = ClientName(s.to_string());
        name.validate()?;
        Ok(name)
    }
}

impl AsRef<str> for ClientName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
