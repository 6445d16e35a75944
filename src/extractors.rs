//! Authentication Extractors
//!
//! Axum extractor resolving the bearer token into the caller's identity.

use crate::error::AuthError;
use crate::handlers::AuthState;
use crate::models::AccessTokenClaims;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use uuid::Uuid;

/// Authenticated user information extracted from JWT claims
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

impl AuthUser {
    /// Create user from JWT claims
    pub fn from_claims(claims: &AccessTokenClaims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email.clone(),
        }
    }
}

#[async_trait]
impl FromRequestParts<AuthState> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AuthState,
    ) -> Result<Self, Self::Rejection> {
        // Claims already validated by `require_auth`
        if let Some(claims) = parts.extensions.get::<AccessTokenClaims>() {
            return Ok(AuthUser::from_claims(claims));
        }

        let token = bearer_token(&parts.headers)?;
        let claims = state.tokens().verify(token)?;

        Ok(AuthUser::from_claims(&claims))
    }
}

/// Pull the token out of `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::Unauthorized)?;

    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(AuthError::Unauthorized)?;

    if token.is_empty() {
        return Err(AuthError::Unauthorized);
    }

    Ok(token)
}
