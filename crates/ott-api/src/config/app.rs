//! Application configuration for the OTT API server.

use serde::Deserialize;
use std::fmt;

/// Secret used when `OTT_JWT_SECRET` is not set outside production.
pub const DEVELOPMENT_JWT_SECRET: &str = "ott-development-secret-change-me";

/// Deployment environment the server runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Production => "production",
        };
        f.write_str(name)
    }
}

/// Application configuration loaded from environment variables.
///
/// Environment variables are prefixed with `OTT_`:
/// - `OTT_HOST`: Server bind address (default: "0.0.0.0")
/// - `OTT_PORT`: Server port (default: 5000)
/// - `OTT_ENVIRONMENT`: `development`, `test` or `production` (default: development)
/// - `OTT_JWT_SECRET`: HMAC secret used to sign and verify bearer tokens
/// - `OTT_JWT_EXPIRES_IN`: Token lifetime in seconds (default: 7 days)
/// - `OTT_SERVER_NAME`: Server name for identification
/// - `OTT_RUN_MIGRATIONS`: Apply embedded migrations at startup (default: true)
#[derive(Clone, Deserialize)]
pub struct AppConfig {
    /// Server bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Deployment environment
    #[serde(default)]
    pub environment: Environment,

    /// Token signing secret
    #[serde(default)]
    pub jwt_secret: Option<String>,

    /// Token lifetime in seconds
    #[serde(default = "default_jwt_expires_in")]
    pub jwt_expires_in: u64,

    /// Server name for identification
    #[serde(default = "default_server_name")]
    pub server_name: String,

    /// Apply embedded migrations at startup
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_jwt_expires_in() -> u64 {
    7 * 24 * 60 * 60
}

fn default_server_name() -> String {
    "ott-api".to_string()
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables are prefixed with `OTT_`.
    pub fn from_env() -> Result<Self, envy::Error> {
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from `OTT_`-prefixed key/value pairs.
    ///
    /// A malformed value is an error; there is no partial fallback.
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed("OTT_").from_iter(vars)
    }

    /// Get the server bind address as a string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Resolve the token signing secret.
    ///
    /// Production refuses to start without an explicit secret; other
    /// environments fall back to [`DEVELOPMENT_JWT_SECRET`].
    pub fn jwt_secret(&self) -> Result<&str, String> {
        match self.jwt_secret.as_deref() {
            Some(secret) if !secret.is_empty() => Ok(secret),
            _ if self.environment.is_production() => {
                Err("OTT_JWT_SECRET must be set in production".to_string())
            }
            _ => {
                tracing::warn!("OTT_JWT_SECRET not set, using development secret");
                Ok(DEVELOPMENT_JWT_SECRET)
            }
        }
    }

    /// Whether error responses may carry debug details.
    pub fn expose_error_details(&self) -> bool {
        !self.environment.is_production()
    }
}

// Keeps the secret out of logs.
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("environment", &self.environment)
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("jwt_expires_in", &self.jwt_expires_in)
            .field("server_name", &self.server_name)
            .field("run_migrations", &self.run_migrations)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: Environment::default(),
            jwt_secret: None,
            jwt_expires_in: default_jwt_expires_in(),
            server_name: default_server_name(),
            run_migrations: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.jwt_expires_in, 604_800);
    }

    #[test]
    fn test_bind_address() {
        let config = AppConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:5000");
    }

    #[test]
    fn test_jwt_secret_required_in_production() {
        let config = AppConfig {
            environment: Environment::Production,
            ..AppConfig::default()
        };
        assert!(config.jwt_secret().is_err());
        assert!(!config.expose_error_details());
    }

    #[test]
    fn test_jwt_secret_falls_back_in_development() {
        let config = AppConfig::default();
        assert_eq!(config.jwt_secret().unwrap(), DEVELOPMENT_JWT_SECRET);

        let config = AppConfig {
            jwt_secret: Some("s3cret".to_string()),
            ..AppConfig::default()
        };
        assert_eq!(config.jwt_secret().unwrap(), "s3cret");
    }

    #[test]
    fn test_environment_deserialization() {
        let env: Environment = serde_json::from_str("\"production\"").unwrap();
        assert_eq!(env, Environment::Production);
        assert_eq!(env.to_string(), "production");
    }

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_vars() {
        let config = AppConfig::from_vars(vars(&[
            ("OTT_ENVIRONMENT", "production"),
            ("OTT_JWT_SECRET", "prod-secret"),
            ("OTT_PORT", "8080"),
            ("UNRELATED", "ignored"),
        ]))
        .unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.port, 8080);
        assert_eq!(config.jwt_secret().unwrap(), "prod-secret");
    }

    #[test]
    fn test_malformed_value_is_an_error() {
        let result = AppConfig::from_vars(vars(&[
            ("OTT_ENVIRONMENT", "production"),
            ("OTT_JWT_EXPIRES_IN", "7d"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = AppConfig {
            jwt_secret: Some("top-secret".to_string()),
            ..AppConfig::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("top-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
