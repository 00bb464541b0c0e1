//! Token refresh endpoint handler.
//!
//! POST /auth/refresh - Rotate the refresh token and issue a new access token.

use axum::{extract::State, http::StatusCode, Json};

use riskgate_core::UserId;

use crate::error::ApiAuthError;
use crate::models::{RefreshRequest, TokenResponse};
use crate::router::AuthState;
use crate::services::SessionEvent;

/// Handle token refresh.
///
/// Validates the opaque refresh token against the stored session hash,
/// rotates it, and issues a fresh access token.
#[utoipa::path(
    post,
    path = "/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Tokens refreshed", body = TokenResponse),
        (status = 401, description = "Invalid, expired, or revoked refresh token"),
        (status = 403, description = "Account is inactive"),
    ),
    tag = "Authentication"
)]
pub async fn refresh_handler(
    State(state): State<AuthState>,
    Json(request): Json<RefreshRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiAuthError> {
    let session = state
        .token_service
        .validate_refresh_token(&request.refresh_token)
        .await?;
    let user_id = UserId::from_uuid(session.user_id);

    let user = state
        .auth_service
        .get_user(user_id)
        .await?
        .ok_or(ApiAuthError::InvalidToken)?;

    if !user.is_active {
        return Err(ApiAuthError::AccountInactive);
    }

    let (user_id, tokens) = state
        .token_service
        .refresh_tokens(&request.refresh_token, Some(user.email.clone()))
        .await?;

    state
        .session_events
        .publish(SessionEvent::Refreshed { user_id });

    tracing::debug!(user_id = %user_id, "Tokens refreshed");

    Ok((
        StatusCode::OK,
        Json(TokenResponse::new(
            tokens.access_token,
            tokens.refresh_token,
            tokens.expires_in,
        )),
    ))
}
