//! Credential Service
//!
//! Sign-up and sign-in orchestration: uniqueness, hashing, comparison,
//! token issuance, and mapping of storage errors to domain errors.

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::models::*;
use crate::password::{Argon2Hasher, CredentialHasher};
use crate::store::{PgUserStore, UserStore};
use crate::token::{JwtIssuer, TokenIssuer};

use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::OnceCell;
use uuid::Uuid;

// Verified against when the email is unknown, so both failure paths pay for
// one Argon2 verification.
const DUMMY_PASSWORD: &str = "rustpress-credentials-dummy-password";

/// Credential service
pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: Arc<dyn TokenIssuer>,
    dummy_hash: OnceCell<String>,
}

impl AuthService {
    /// Create a service from explicit ports
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            dummy_hash: OnceCell::new(),
        }
    }

    /// Create the production service: Postgres, Argon2id, HS256
    pub fn from_config(db: PgPool, config: &AuthConfig) -> Result<Self, AuthError> {
        Ok(Self::new(
            Arc::new(PgUserStore::new(db)),
            Arc::new(Argon2Hasher::new(config)?),
            Arc::new(JwtIssuer::new(config)?),
        ))
    }

    /// Get reference to the token issuer
    pub fn tokens(&self) -> &dyn TokenIssuer {
        self.tokens.as_ref()
    }

    // ============================================
    // Sign-up / Sign-in
    // ============================================

    /// Register a new user and return an access token
    pub async fn signup(&self, req: AuthRequest) -> Result<TokenResponse, AuthError> {
        let AuthRequest { email, password } = req;

        let password_hash = self.hash_password(password).await?;

        let user = self
            .users
            .create(&email, &password_hash)
            .await
            .map_err(AuthError::from)
            .inspect_err(|err| {
                if *err == AuthError::CredentialsTaken {
                    tracing::info!("Sign-up rejected, email already registered");
                }
            })?;

        tracing::info!(user_id = %user.id, "User registered");

        self.sign_token(&user)
    }

    /// Authenticate a user and return an access token
    pub async fn signin(&self, req: AuthRequest) -> Result<TokenResponse, AuthError> {
        let AuthRequest { email, password } = req;

        let user = match self.users.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                let dummy = self.dummy_hash().await?;
                self.verify_password(password, dummy).await?;
                tracing::warn!("Sign-in failed");
                return Err(AuthError::CredentialsIncorrect);
            }
        };

        if !self
            .verify_password(password, user.password_hash.clone())
            .await?
        {
            tracing::warn!("Sign-in failed");
            return Err(AuthError::CredentialsIncorrect);
        }

        tracing::info!(user_id = %user.id, "User signed in");

        self.sign_token(&user)
    }

    /// Load the user a verified token refers to
    pub async fn current_user(&self, user_id: Uuid) -> Result<UserResponse, AuthError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        Ok(UserResponse::from(user))
    }

    // ============================================
    // Helpers
    // ============================================

    fn sign_token(&self, user: &User) -> Result<TokenResponse, AuthError> {
        let access_token = self.tokens.issue(user.id, &user.email)?;
        Ok(TokenResponse { access_token })
    }

    async fn dummy_hash(&self) -> Result<String, AuthError> {
        let hash = self
            .dummy_hash
            .get_or_try_init(|| self.hash_password(DUMMY_PASSWORD.to_string()))
            .await?;
        Ok(hash.clone())
    }

    // Argon2 is memory-hard; keep it off the async workers.
    async fn hash_password(&self, password: String) -> Result<String, AuthError> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| {
                tracing::error!("Password hashing task failed: {:?}", e);
                AuthError::Internal
            })?
    }

    async fn verify_password(&self, password: String, hash: String) -> Result<bool, AuthError> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| {
                tracing::error!("Password verification task failed: {:?}", e);
                AuthError::Internal
            })?
    }
}
