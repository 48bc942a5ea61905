pub type Result<T, E = ConfigError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Secret must not be empty")]
    EmptySecret,
    #[error("Invalid client name: {0}")]
    InvalidClientName(#[from] garde::Report),
    #[error("Unsupported URL scheme {0:?}, expected http or https")]
    UnsupportedScheme(String),
    #[error("URL {0} cannot be used as a base URL")]
    CannotBeBase(String),
    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
