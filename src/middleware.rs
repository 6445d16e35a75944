//! Authentication Middleware
//!
//! JWT validation for protected routes.

use crate::error::AuthError;
use crate::extractors::bearer_token;
use crate::handlers::AuthState;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

/// Require authenticated user
///
/// Validates the JWT token from the Authorization header and stores
/// the claims in request extensions for use by extractors.
pub async fn require_auth(
    State(auth): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let claims = auth.tokens().verify(bearer_token(req.headers())?)?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
