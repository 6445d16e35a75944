//! RustPress Credential Service
//!
//! Minimal authentication backend for RustPress providing:
//! - User sign-up and sign-in
//! - Argon2id password hashing
//! - Short-lived JWT access tokens
//! - Bearer-token lookup of the current user
//!
//! # Configuration
//!
//! All configuration is loaded from environment variables:
//! - `JWT_SECRET` - Secret key for signing JWTs (required, min 32 chars)
//! - `JWT_ACCESS_EXPIRATION` - Access token expiration in seconds (default: 900)
//! - `ARGON2_MEMORY_COST` / `ARGON2_TIME_COST` / `ARGON2_PARALLELISM` - hashing cost
//! - `DATABASE_URL` - PostgreSQL connection string (required by the binary)
//! - `HOST` / `PORT` - listener address (default: 0.0.0.0:3333)
//!
//! # Usage
//!
//! ```rust,ignore
//! use rustpress_credentials::{create_routes, run_migrations, AuthConfig, AuthService};
//!
//! let config = AuthConfig::from_env()?;
//! config.validate()?;
//! run_migrations(&db_pool).await?;
//!
//! let auth = Arc::new(AuthService::from_config(db_pool, &config)?);
//! let app = create_routes(auth);
//! ```

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod service;
pub mod store;
pub mod token;

// Re-export commonly used types
pub use config::{AuthConfig, ServerConfig};
pub use error::AuthError;
pub use extractors::AuthUser;
pub use handlers::{create_routes, AuthState};
pub use models::*;
pub use password::{Argon2Hasher, CredentialHasher};
pub use service::AuthService;
pub use store::{MemoryUserStore, PgUserStore, StoreError, UserStore};
pub use token::{JwtIssuer, TokenIssuer};

use sqlx::PgPool;

/// Create the `users` table if it does not exist yet
pub async fn run_migrations(db: &PgPool) -> Result<(), AuthError> {
    tracing::info!("Running credential database migrations");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            email VARCHAR(255) NOT NULL UNIQUE,
            password_hash VARCHAR(255) NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(db)
    .await?;

    tracing::info!("Credential migrations completed successfully");
    Ok(())
}
