//! Tracing subscriber setup.

use crate::config::LogConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },
    #[error("Failed to init subscriber: {0}")]
    Init(String),
}

/// Install the global subscriber.
///
/// `RUST_LOG` overrides the configured filter when set. Fails when a global
/// subscriber is already installed.
pub fn init_tracing(config: &LogConfig) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => build_filter(&config.filter)?,
    };

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = if config.json {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };
    result.map_err(|e| TelemetryError::Init(e.to_string()))?;

    tracing::info!(filter = %config.filter, json = config.json, "Telemetry initialized");
    Ok(())
}

fn build_filter(directive: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(directive).map_err(|e| TelemetryError::InvalidFilter {
        filter: directive.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_filter_directive() {
        assert!(build_filter("console_client=debug,info").is_ok());
    }

    #[test]
    fn test_invalid_filter_directive() {
        let err = build_filter("console_client=loud").unwrap_err();
        assert!(matches!(err, TelemetryError::InvalidFilter { .. }));
    }
}
