//! Configuration loading for the admin console.
//!
//! All fields are required unless explicitly marked optional. No defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the config file when `--config` is absent.
pub const CONFIG_ENV: &str = "ADMIN_CONSOLE_CONFIG";

/// Environment variable holding the login password for `auth.email`.
pub const PASSWORD_ENV: &str = "ADMIN_CONSOLE_PASSWORD";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsoleConfig {
    pub api_base_url: String,
    pub request_timeout_ms: u64,
    pub auth: AuthConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Pre-issued bearer token.
    pub token: Option<String>,
    /// Operator email used to log in when no token is configured.
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `"console_client=debug,info"`.
    pub filter: String,
    pub json: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration file path (use --config or {CONFIG_ENV})")]
    MissingConfigPath,
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl ConsoleConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path_from_args().or_else(config_path_from_env);
        let path = path.ok_or(ConfigError::MissingConfigPath)?;
        let config = Self::from_path(&path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: ConsoleConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.api_base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "api_base_url",
                reason: "must not be empty".to_string(),
            });
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "api_base_url",
                reason: "must start with http:// or https://".to_string(),
            });
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_ms",
                reason: "must be > 0".to_string(),
            });
        }
        let has_token = self
            .auth
            .token
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty());
        let has_email = self
            .auth
            .email
            .as_deref()
            .is_some_and(|e| !e.trim().is_empty());
        if !has_token && !has_email {
            return Err(ConfigError::InvalidValue {
                field: "auth",
                reason: "token or email must be provided".to_string(),
            });
        }
        if self.log.filter.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "log.filter",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var(CONFIG_ENV).ok().map(PathBuf::from)
}

fn config_path_from_args() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
api_base_url = "http://localhost:8000"
request_timeout_ms = 5000

[auth]
token = "secret-token"

[log]
filter = "console_client=debug,info"
json = false
"#;

    #[test]
    fn test_parses_and_validates_sample() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let config = ConsoleConfig::from_path(file.path()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.request_timeout_ms, 5000);
        assert_eq!(config.auth.token.as_deref(), Some("secret-token"));
        assert_eq!(config.auth.email, None);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let text = format!("{SAMPLE}\nunexpected = true\n");
        let result = toml::from_str::<ConsoleConfig>(&text);
        assert!(result.is_err());
    }

    #[test]
    fn test_requires_token_or_email() {
        let mut config: ConsoleConfig = toml::from_str(SAMPLE).unwrap();
        config.auth.token = Some("   ".to_string());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "auth", .. })
        ));
        config.auth.email = Some("admin@example.com".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let mut config: ConsoleConfig = toml::from_str(SAMPLE).unwrap();
        config.api_base_url = "ftp://example.com".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "api_base_url",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let mut config: ConsoleConfig = toml::from_str(SAMPLE).unwrap();
        config.request_timeout_ms = 0;
        assert!(config.validate().is_err());
    }
}
