//! Logout endpoint handler.
//!
//! POST /auth/logout - Revoke a refresh token's session.

use axum::{extract::State, http::StatusCode, Json};

use riskgate_core::UserId;

use crate::error::ApiAuthError;
use crate::models::LogoutRequest;
use crate::router::AuthState;
use crate::services::SessionEvent;

/// Handle logout.
///
/// Revokes the session backing the refresh token. Idempotent: an unknown or
/// already-revoked token still yields 204 so clients can always clear local
/// state.
#[utoipa::path(
    post,
    path = "/auth/logout",
    request_body = LogoutRequest,
    responses(
        (status = 204, description = "Session revoked (or was already gone)"),
    ),
    tag = "Authentication"
)]
pub async fn logout_handler(
    State(state): State<AuthState>,
    Json(request): Json<LogoutRequest>,
) -> Result<StatusCode, ApiAuthError> {
    match state
        .token_service
        .validate_refresh_token(&request.refresh_token)
        .await
    {
        Ok(session) => {
            let user_id = UserId::from_uuid(session.user_id);
            state
                .token_service
                .revoke_refresh_token(&request.refresh_token)
                .await?;

            state
                .session_events
                .publish(SessionEvent::SignedOut { user_id });

            tracing::info!(user_id = %user_id, "User signed out");
        }
        Err(ApiAuthError::InvalidToken) => {
            tracing::debug!("Logout with unknown or already-revoked token");
        }
        Err(e) => return Err(e),
    }

    Ok(StatusCode::NO_CONTENT)
}
