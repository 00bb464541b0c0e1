//! Authentication API router configuration.
//!
//! Configures routes for the authentication endpoints:
//! - POST /auth/signup
//! - POST /auth/login
//! - POST /auth/mfa/verify
//! - POST /auth/refresh
//! - POST /auth/logout
//! - GET /auth/session

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Extension, Router,
};

use riskgate_db::DbPool;

use crate::handlers::{
    login_handler, logout_handler, mfa_verify_handler, refresh_handler, session_handler,
    signup_handler,
};
use crate::middleware::{jwt_auth_middleware, partial_token_middleware, JwtPublicKey};
use crate::services::{AuthService, MfaService, SessionEvents, TokenService};

/// Shared state for authentication routes.
#[derive(Clone)]
pub struct AuthState {
    /// Database connection pool.
    pub pool: DbPool,
    /// Authentication service.
    pub auth_service: Arc<AuthService>,
    /// Token service for JWT and refresh token management.
    pub token_service: Arc<TokenService>,
    /// MFA service for TOTP authentication.
    pub mfa_service: Arc<MfaService>,
    /// Session lifecycle event publisher.
    pub session_events: SessionEvents,
    /// PEM-encoded public key for JWT validation.
    pub jwt_public_key: String,
}

/// Build the authentication router, nested under `/auth` by the app.
pub fn auth_router(state: AuthState) -> Router {
    let public_key = JwtPublicKey(state.jwt_public_key.clone());

    // MFA verification accepts only partial tokens.
    let mfa_routes = Router::new()
        .route("/mfa/verify", post(mfa_verify_handler))
        .layer(middleware::from_fn(partial_token_middleware))
        .layer(Extension(public_key.clone()));

    // Session introspection requires a full access token.
    let session_routes = Router::new()
        .route("/session", get(session_handler))
        .layer(middleware::from_fn(jwt_auth_middleware))
        .layer(Extension(public_key));

    let public_routes = Router::new()
        .route("/signup", post(signup_handler))
        .route("/login", post(login_handler))
        .route("/refresh", post(refresh_handler))
        .route("/logout", post(logout_handler));

    Router::new()
        .merge(public_routes)
        .merge(mfa_routes)
        .merge(session_routes)
        .with_state(state)
}
