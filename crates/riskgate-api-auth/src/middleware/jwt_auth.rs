//! JWT authentication middleware.
//!
//! Extracts and validates JWT tokens from the Authorization header, then
//! inserts `JwtClaims` and `UserId` into request extensions.
//!
//! Two variants exist: [`jwt_auth_middleware`] accepts only full access
//! tokens and rejects partial (MFA-pending) tokens, while
//! [`partial_token_middleware`] accepts only partial tokens and guards the
//! MFA verification endpoint.

use axum::{
    body::Body,
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use riskgate_auth::decode_token;
use riskgate_core::UserId;

/// PEM-encoded RSA public key for JWT validation, injected as an extension.
#[derive(Debug, Clone)]
pub struct JwtPublicKey(pub String);

fn extract_bearer_token(request: &Request<Body>) -> Result<&str, Response> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            (StatusCode::UNAUTHORIZED, "Missing Authorization header").into_response()
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        (
            StatusCode::UNAUTHORIZED,
            "Invalid Authorization header format",
        )
            .into_response()
    })?;

    // Reject empty bearer tokens before attempting JWT decode.
    if token.is_empty() {
        tracing::warn!("Rejected empty bearer token");
        return Err((StatusCode::UNAUTHORIZED, "Empty bearer token").into_response());
    }

    Ok(token)
}

fn decode_request_token(
    request: &Request<Body>,
) -> Result<riskgate_auth::JwtClaims, Response> {
    let public_key = request
        .extensions()
        .get::<JwtPublicKey>()
        .ok_or_else(|| {
            tracing::error!("JWT public key not configured");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server configuration error",
            )
                .into_response()
        })?
        .0
        .clone();

    let token = extract_bearer_token(request)?;

    decode_token(token, public_key.as_bytes()).map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        (StatusCode::UNAUTHORIZED, "Invalid or expired token").into_response()
    })
}

/// JWT authentication middleware for full access tokens.
///
/// Rejects partial tokens: a user who has passed the password step but not
/// the second factor cannot reach protected endpoints.
pub async fn jwt_auth_middleware(
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let claims = decode_request_token(&request)?;

    if claims.is_partial() {
        tracing::warn!("Rejected partial token on protected endpoint");
        return Err((StatusCode::UNAUTHORIZED, "MFA verification required").into_response());
    }

    let user_id: UserId = claims
        .user_id()
        .ok_or_else(|| (StatusCode::UNAUTHORIZED, "Invalid token subject").into_response())?;

    request.extensions_mut().insert(claims);
    request.extensions_mut().insert(user_id);

    Ok(next.run(request).await)
}

/// Middleware for the MFA verification endpoint.
///
/// Accepts only partial tokens whose purpose marks them as MFA-pending;
/// a full access token here indicates a client bug.
pub async fn partial_token_middleware(
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let claims = decode_request_token(&request)?;

    if !claims.is_partial() {
        tracing::warn!("Rejected non-partial token on MFA verification endpoint");
        return Err((StatusCode::UNAUTHORIZED, "Partial token required").into_response());
    }

    let user_id: UserId = claims
        .user_id()
        .ok_or_else(|| (StatusCode::UNAUTHORIZED, "Invalid token subject").into_response())?;

    request.extensions_mut().insert(claims);
    request.extensions_mut().insert(user_id);

    Ok(next.run(request).await)
}
