//! Application configuration loaded from environment variables.
//!
//! Fail-fast loading with validation: required variables must be present
//! and valid or the application exits with a clear error message.

use std::env;
use thiserror::Error;

/// Default MFA_ENCRYPTION_KEY: 64 hex '2' characters. Development only.
pub const INSECURE_MFA_KEY: &str =
    "2222222222222222222222222222222222222222222222222222222222222222";

/// Application environment mode.
///
/// In `Development`, insecure default keys are allowed with WARN-level
/// logging. In `Production`, they cause the application to refuse startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Production,
}

impl AppEnvironment {
    /// Parse from the `APP_ENV` environment variable value.
    /// Defaults to `Development` if unset or unrecognized.
    pub fn from_env_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "development" | "dev" => Self::Development,
            other => {
                tracing::warn!(
                    value = other,
                    "Unrecognized APP_ENV value, defaulting to Development"
                );
                Self::Development
            }
        }
    }

    #[must_use]
    pub fn is_production(&self) -> bool {
        *self == Self::Production
    }
}

impl std::fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Configuration errors that can occur during environment loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("Failed to parse value: {0}")]
    ParseError(#[from] std::num::ParseIntError),
}

/// Application configuration.
#[derive(Clone)]
pub struct Config {
    /// Application environment (development or production).
    pub app_env: AppEnvironment,

    /// PostgreSQL connection string.
    pub database_url: String,

    /// RS256 private key (PEM) for signing access and partial tokens.
    pub jwt_private_key: String,

    /// RS256 public key (PEM) for validating tokens.
    pub jwt_public_key: String,

    /// Token issuer claim.
    pub jwt_issuer: String,

    /// MFA TOTP secret encryption key (32 bytes, hex-decoded).
    pub mfa_encryption_key: [u8; 32],

    /// Issuer name shown in authenticator apps.
    pub mfa_issuer: String,

    /// Log filter directive.
    pub rust_log: String,

    /// Allowed CORS origins. `["*"]` means any origin.
    pub cors_origins: Vec<String>,

    /// Bind address.
    pub host: String,

    /// Listen port.
    pub port: u16,

    /// Whether to run pending migrations at startup.
    pub run_migrations: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("app_env", &self.app_env)
            .field("database_url", &"[redacted]")
            .field("jwt_issuer", &self.jwt_issuer)
            .field("mfa_issuer", &self.mfa_issuer)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("cors_origins", &self.cors_origins)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Required Variables
    ///
    /// - `DATABASE_URL` - PostgreSQL connection string
    /// - `JWT_PRIVATE_KEY` - RS256 private key (PEM format)
    /// - `JWT_PUBLIC_KEY` - RS256 public key (PEM format)
    ///
    /// # Optional Variables
    ///
    /// - `APP_ENV` - "development" or "production" (default: development)
    /// - `RUST_LOG` - Log filter (default: "info")
    /// - `CORS_ORIGINS` - Comma-separated allowed origins (default: "*")
    /// - `HOST` - Bind address (default: "0.0.0.0")
    /// - `PORT` - Listen port (default: 8080)
    /// - `MFA_ENCRYPTION_KEY` - hex-encoded 32 bytes
    /// - `MFA_ISSUER` - authenticator app issuer label (default: "riskgate")
    /// - `RUN_MIGRATIONS` - apply migrations at startup (default: true)
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (development only)
        let _ = dotenvy::dotenv();

        let app_env = AppEnvironment::from_env_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingVar("DATABASE_URL".to_string()))?;

        let jwt_private_key = env::var("JWT_PRIVATE_KEY")
            .map_err(|_| ConfigError::MissingVar("JWT_PRIVATE_KEY".to_string()))?;

        let jwt_public_key = env::var("JWT_PUBLIC_KEY")
            .map_err(|_| ConfigError::MissingVar("JWT_PUBLIC_KEY".to_string()))?;

        if !jwt_private_key.contains("-----BEGIN") {
            return Err(ConfigError::InvalidValue {
                var: "JWT_PRIVATE_KEY".to_string(),
                message: "Must be PEM format (should contain -----BEGIN)".to_string(),
            });
        }

        if !jwt_public_key.contains("-----BEGIN") {
            return Err(ConfigError::InvalidValue {
                var: "JWT_PUBLIC_KEY".to_string(),
                message: "Must be PEM format (should contain -----BEGIN)".to_string(),
            });
        }

        let jwt_issuer = env::var("JWT_ISSUER").unwrap_or_else(|_| "riskgate".to_string());

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|s| s.split(',').map(|o| o.trim().to_string()).collect())
            .unwrap_or_else(|_| vec!["*".to_string()]);

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()?;

        if port == 0 {
            return Err(ConfigError::InvalidValue {
                var: "PORT".to_string(),
                message: "Port must be between 1 and 65535".to_string(),
            });
        }

        let mfa_key_hex =
            env::var("MFA_ENCRYPTION_KEY").unwrap_or_else(|_| INSECURE_MFA_KEY.to_string());
        let mfa_encryption_key = parse_hex_encryption_key("MFA_ENCRYPTION_KEY", &mfa_key_hex)?;

        if mfa_key_hex == INSECURE_MFA_KEY {
            if app_env.is_production() {
                return Err(ConfigError::InvalidValue {
                    var: "MFA_ENCRYPTION_KEY".to_string(),
                    message: "Insecure default key is not allowed in production".to_string(),
                });
            }
            tracing::warn!(
                target: "security",
                "MFA_ENCRYPTION_KEY uses the insecure development default"
            );
        }

        let mfa_issuer = env::var("MFA_ISSUER").unwrap_or_else(|_| "riskgate".to_string());

        let run_migrations = env::var("RUN_MIGRATIONS")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);

        Ok(Self {
            app_env,
            database_url,
            jwt_private_key,
            jwt_public_key,
            jwt_issuer,
            mfa_encryption_key,
            mfa_issuer,
            rust_log,
            cors_origins,
            host,
            port,
            run_migrations,
        })
    }

    /// Bind address string for the TCP listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parse a hex-encoded 32-byte encryption key.
fn parse_hex_encryption_key(var_name: &str, hex_str: &str) -> Result<[u8; 32], ConfigError> {
    let bytes = hex::decode(hex_str).map_err(|e| ConfigError::InvalidValue {
        var: var_name.to_string(),
        message: format!("Must be hex-encoded: {e}"),
    })?;

    bytes
        .try_into()
        .map_err(|_| ConfigError::InvalidValue {
            var: var_name.to_string(),
            message: "Must decode to exactly 32 bytes".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_environment_parsing() {
        assert_eq!(
            AppEnvironment::from_env_str("production"),
            AppEnvironment::Production
        );
        assert_eq!(
            AppEnvironment::from_env_str("PROD"),
            AppEnvironment::Production
        );
        assert_eq!(
            AppEnvironment::from_env_str("dev"),
            AppEnvironment::Development
        );
        assert_eq!(
            AppEnvironment::from_env_str("staging"),
            AppEnvironment::Development
        );
    }

    #[test]
    fn test_parse_hex_key_valid() {
        let key = parse_hex_encryption_key("TEST_KEY", INSECURE_MFA_KEY).unwrap();
        assert_eq!(key, [0x22u8; 32]);
    }

    #[test]
    fn test_parse_hex_key_wrong_length() {
        let result = parse_hex_encryption_key("TEST_KEY", "deadbeef");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_parse_hex_key_not_hex() {
        let result = parse_hex_encryption_key("TEST_KEY", "zz");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }
}
