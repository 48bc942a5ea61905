pub mod config;
pub mod error;
pub mod general;
pub mod status;

pub use error::ConfigError;
