//! Session introspection handler.
//!
//! GET /auth/session - Describe the current authenticated session.

use axum::{http::StatusCode, Extension, Json};
use chrono::{DateTime, Utc};

use riskgate_auth::JwtClaims;
use riskgate_core::UserId;

use crate::error::ApiAuthError;
use crate::models::SessionResponse;

/// Return the current session derived from the access token.
///
/// Protected by `jwt_auth_middleware`; a partial token never reaches here.
#[utoipa::path(
    get,
    path = "/auth/session",
    responses(
        (status = 200, description = "Current session", body = SessionResponse),
        (status = 401, description = "Missing or invalid access token"),
    ),
    tag = "Authentication"
)]
pub async fn session_handler(
    Extension(claims): Extension<JwtClaims>,
    Extension(user_id): Extension<UserId>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiAuthError> {
    let expires_at = DateTime::<Utc>::from_timestamp(claims.exp, 0)
        .ok_or_else(|| ApiAuthError::Internal("invalid exp claim".to_string()))?;

    Ok((
        StatusCode::OK,
        Json(SessionResponse {
            user_id: *user_id.as_uuid(),
            email: claims.email.clone(),
            expires_at,
        }),
    ))
}
