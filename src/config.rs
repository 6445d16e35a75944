//! Credential Service Configuration
//!
//! All configuration values are loaded from environment variables.
//! No hardcoded secrets or sensitive data.

use crate::error::AuthError;
use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

/// Longest accepted access token lifetime (one year)
pub const MAX_ACCESS_TOKEN_EXPIRATION: i64 = 365 * 24 * 60 * 60;

/// Token and hashing configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT secret key for signing tokens (from JWT_SECRET env var)
    pub jwt_secret: String,

    /// JWT access token expiration in seconds (from JWT_ACCESS_EXPIRATION env var)
    pub access_token_expiration: i64,

    /// Argon2 memory cost in KiB (from ARGON2_MEMORY_COST env var)
    pub argon2_memory_cost: u32,

    /// Argon2 time cost (iterations) (from ARGON2_TIME_COST env var)
    pub argon2_time_cost: u32,

    /// Argon2 parallelism (from ARGON2_PARALLELISM env var)
    pub argon2_parallelism: u32,
}

impl AuthConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AuthError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_vars<F>(var: F) -> Result<Self, AuthError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = var("JWT_SECRET").ok_or_else(|| {
            AuthError::Config("JWT_SECRET environment variable must be set".to_string())
        })?;

        Ok(Self {
            jwt_secret,
            access_token_expiration: parse_or(&var, "JWT_ACCESS_EXPIRATION", 900), // 15 minutes
            argon2_memory_cost: parse_or(&var, "ARGON2_MEMORY_COST", 65536), // 64 MiB
            argon2_time_cost: parse_or(&var, "ARGON2_TIME_COST", 3),
            argon2_parallelism: parse_or(&var, "ARGON2_PARALLELISM", 4),
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.jwt_secret.len() < 32 {
            return Err(AuthError::Config(
                "JWT_SECRET must be at least 32 characters".to_string(),
            ));
        }

        if self.access_token_expiration <= 0 {
            return Err(AuthError::Config(
                "JWT_ACCESS_EXPIRATION must be positive".to_string(),
            ));
        }

        if self.access_token_expiration > MAX_ACCESS_TOKEN_EXPIRATION {
            return Err(AuthError::Config(format!(
                "JWT_ACCESS_EXPIRATION must not exceed {MAX_ACCESS_TOKEN_EXPIRATION} seconds"
            )));
        }

        argon2::Params::new(
            self.argon2_memory_cost,
            self.argon2_time_cost,
            self.argon2_parallelism,
            None,
        )
        .map_err(|e| AuthError::Config(format!("invalid Argon2 parameters: {e}")))?;

        Ok(())
    }
}

/// Listener and database settings for the binary
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// PostgreSQL connection string (from DATABASE_URL env var)
    pub database_url: String,

    /// Connection pool size (from DATABASE_MAX_CONNECTIONS env var)
    pub max_connections: u32,

    /// Bind address (from HOST env var)
    pub host: IpAddr,

    /// Bind port (from PORT env var)
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, AuthError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F>(var: F) -> Result<Self, AuthError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = var("DATABASE_URL").ok_or_else(|| {
            AuthError::Config("DATABASE_URL environment variable must be set".to_string())
        })?;

        Ok(Self {
            database_url,
            max_connections: parse_or(&var, "DATABASE_MAX_CONNECTIONS", 5),
            host: parse_or(&var, "HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            port: parse_or(&var, "PORT", 3333),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<F, T>(var: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match var(key) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Ignoring unparseable setting, using default");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "a".repeat(32),
            access_token_expiration: 900,
            argon2_memory_cost: 65536,
            argon2_time_cost: 3,
            argon2_parallelism: 4,
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_config_validation_short_secret() {
        let config = AuthConfig {
            jwt_secret: "short".to_string(),
            ..config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_non_positive_expiration() {
        let config = AuthConfig {
            access_token_expiration: 0,
            ..config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_oversized_expiration() {
        let oversized = AuthConfig {
            access_token_expiration: i64::MAX,
            ..config()
        };
        assert!(matches!(oversized.validate(), Err(AuthError::Config(_))));

        let config = AuthConfig {
            access_token_expiration: MAX_ACCESS_TOKEN_EXPIRATION,
            ..config()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_argon2_params() {
        let config = AuthConfig {
            argon2_parallelism: 0,
            ..config()
        };
        assert!(matches!(config.validate(), Err(AuthError::Config(_))));
    }

    #[test]
    fn test_from_vars_defaults() {
        let config = AuthConfig::from_vars(lookup(&[("JWT_SECRET", "s3cret")])).unwrap();
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.access_token_expiration, 900);
        assert_eq!(config.argon2_memory_cost, 65536);
        assert_eq!(config.argon2_time_cost, 3);
        assert_eq!(config.argon2_parallelism, 4);
    }

    #[test]
    fn test_from_vars_requires_secret() {
        let err = AuthConfig::from_vars(lookup(&[])).unwrap_err();
        assert!(matches!(err, AuthError::Config(_)));
    }

    #[test]
    fn test_from_vars_falls_back_on_garbage() {
        let config = AuthConfig::from_vars(lookup(&[
            ("JWT_SECRET", "s3cret"),
            ("JWT_ACCESS_EXPIRATION", "fifteen minutes"),
            ("ARGON2_TIME_COST", "1"),
        ]))
        .unwrap();
        assert_eq!(config.access_token_expiration, 900);
        assert_eq!(config.argon2_time_cost, 1);
    }

    #[test]
    fn test_server_config() {
        let server = ServerConfig::from_vars(lookup(&[
            ("DATABASE_URL", "postgres://localhost/rustpress"),
            ("PORT", "8080"),
        ]))
        .unwrap();
        assert_eq!(server.max_connections, 5);
        assert_eq!(server.socket_addr().to_string(), "0.0.0.0:8080");

        assert!(ServerConfig::from_vars(lookup(&[])).is_err());
    }
}
