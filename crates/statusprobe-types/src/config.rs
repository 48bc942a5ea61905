use std::time::Duration;

pub use clap::Parser;
use url::Url;

use crate::{
    error::{ConfigError, Result},
    general::{ClientName, Secret},
    status::DEFAULT_GREETING,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, clap::Parser)]
#[command(
    name = "statusprobe",
    version,
    about = "Verifies the status check REST contract of a running backend",
    long_about = "Runs a fixed sequence of black-box HTTP checks (greeting root, status check create/list, CORS preflight, persistence round-trip) against a backend and prints a pass/fail summary."
)]
pub struct VerifierConfig {
    #[arg(
        long,
        env = "REACT_APP_BACKEND_URL",
        help = "Base URL of the backend, API endpoints are resolved relative to it"
    )]
    pub base_url: Url,

    #[arg(
        long,
        env = "JWT_SECRET",
        hide_env_values = true,
        help = "Secret the backend is deployed with, must be present and non-empty"
    )]
    pub secret: Secret,

    #[arg(
        long,
        env = "STATUSPROBE_API_PREFIX",
        default_value = "api",
        help = "Path prefix of the API below base URL, empty for none"
    )]
    pub api_prefix: String,

    #[arg(
        long,
        env = "STATUSPROBE_TIMEOUT",
        default_value = "10s",
        help = "Timeout for each request in human friendly format (e.g. 10s, 500ms, 1m)",
        value_parser = humantime::parse_duration
    )]
    pub timeout: Duration,

    #[arg(
        long,
        env = "STATUSPROBE_CLIENT_NAME",
        default_value = "test_client",
        help = "Client name used when creating a status check"
    )]
    pub client_name: ClientName,

    #[arg(
        long,
        env = "STATUSPROBE_GREETING",
        default_value = DEFAULT_GREETING,
        help = "Message expected from the root endpoint"
    )]
    pub greeting: String,

    #[arg(
        long,
        env = "STATUSPROBE_ORIGIN",
        default_value = "http://example.com",
        help = "Origin sent with CORS preflight requests"
    )]
    pub origin: String,

    #[arg(
        long,
        env = "STATUSPROBE_EXPECTED_ALLOW_ORIGIN",
        help = "If set, Access-Control-Allow-Origin must have exactly this value (e.g. *)"
    )]
    pub expected_allow_origin: Option<String>,

    #[arg(
        long,
        env = "STATUSPROBE_FORMAT",
        value_enum,
        default_value_t = OutputFormat::Text,
        help = "Report format"
    )]
    pub format: OutputFormat,

    #[arg(
        long,
        env = "STATUSPROBE_STRICT",
        help = "Exit with non-zero status when any check fails"
    )]
    pub strict: bool,
}

impl VerifierConfig {
    /// URL of the API root, always ending with `/` so endpoints can be joined to it.
    pub fn api_url(&self) -> Result<Url> {
        let scheme = self.base_url.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(ConfigError::UnsupportedScheme(scheme.to_string()));
        }
        if self.base_url.cannot_be_a_base() {
            return Err(ConfigError::CannotBeBase(self.base_url.to_string()));
        }

        let mut base = self.base_url.clone();
        base.set_query(None);
        base.set_fragment(None);
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let prefix = self.api_prefix.trim_matches('/');
        if prefix.is_empty() {
            Ok(base)
        } else {
            Ok(base.join(&format!("{prefix}/"))?)
        }
    }
}
