//! Credential HTTP Handlers
//!
//! REST API endpoints for sign-up, sign-in and the current user.

use crate::error::AuthError;
use crate::extractors::AuthUser;
use crate::middleware;
use crate::models::*;
use crate::service::AuthService;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    middleware as axum_middleware,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use validator::Validate;

/// Shared credential service state
pub type AuthState = Arc<AuthService>;

// ============================================
// Route Builder
// ============================================

/// Create credential routes
pub fn create_routes(auth_service: AuthState) -> Router {
    // Public routes (no authentication required)
    let public = Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/signin", post(signin));

    // Protected routes (require a bearer token)
    let protected = Router::new()
        .route("/users/me", get(get_current_user))
        .route_layer(axum_middleware::from_fn_with_state(
            auth_service.clone(),
            middleware::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(auth_service)
}

// ============================================
// Sign-up / Sign-in
// ============================================

/// POST /auth/signup
///
/// Register a new user account and return an access token
pub async fn signup(
    State(auth): State<AuthState>,
    payload: Result<Json<AuthRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TokenResponse>), AuthError> {
    let Json(req) = payload?;
    req.validate()
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    let response = auth.signup(req).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /auth/signin
///
/// Authenticate user and return an access token
pub async fn signin(
    State(auth): State<AuthState>,
    payload: Result<Json<AuthRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, AuthError> {
    let Json(req) = payload?;
    req.validate()
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    let response = auth.signin(req).await?;

    Ok(Json(response))
}

// ============================================
// User Profile
// ============================================

/// GET /users/me
pub async fn get_current_user(
    State(auth): State<AuthState>,
    user: AuthUser,
) -> Result<Json<UserResponse>, AuthError> {
    Ok(Json(auth.current_user(user.id).await?))
}
