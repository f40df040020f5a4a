//! Error types for the console binary.

use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use console_core::ConsoleError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error(transparent)]
    Console(#[from] ConsoleError),
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Missing environment variable {0}")]
    MissingEnv(&'static str),
}
