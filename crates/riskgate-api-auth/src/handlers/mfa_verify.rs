//! MFA verification handler for login flow.
//!
//! POST /auth/mfa/verify - Verify a TOTP code to complete authentication.

use axum::{extract::State, http::StatusCode, Extension, Json};
use validator::Validate;

use riskgate_auth::JwtClaims;
use riskgate_core::UserId;

use crate::error::ApiAuthError;
use crate::models::{MfaVerifyRequest, TokenResponse};
use crate::router::AuthState;
use crate::services::SessionEvent;

/// Verify a TOTP code during login to complete MFA authentication.
///
/// Requires the partial token from the login response in the Authorization
/// header; the `partial_token_middleware` enforces its purpose. On success
/// the challenge is consumed and full tokens are issued.
#[utoipa::path(
    post,
    path = "/auth/mfa/verify",
    request_body = MfaVerifyRequest,
    responses(
        (status = 200, description = "MFA verification successful, tokens issued", body = TokenResponse),
        (status = 400, description = "Challenge not found or expired"),
        (status = 401, description = "Invalid code, or invalid/expired partial token"),
        (status = 429, description = "Factor locked after repeated failures"),
    ),
    tag = "Authentication"
)]
pub async fn mfa_verify_handler(
    State(state): State<AuthState>,
    Extension(claims): Extension<JwtClaims>,
    Extension(token_user): Extension<UserId>,
    Json(request): Json<MfaVerifyRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiAuthError> {
    request
        .validate()
        .map_err(|e| ApiAuthError::Validation(e.to_string()))?;

    // Defense in depth: the middleware already checked the purpose claim.
    if !claims.is_partial() {
        return Err(ApiAuthError::PartialTokenInvalid);
    }

    let verified_user = state
        .mfa_service
        .verify_challenge(request.challenge_id, &request.code)
        .await?;

    // The challenge must belong to the partial token's subject.
    if verified_user != token_user {
        tracing::warn!(
            token_user = %token_user,
            challenge_user = %verified_user,
            "Challenge user mismatch on MFA verification"
        );
        return Err(ApiAuthError::ChallengeInvalid);
    }

    let user = state
        .auth_service
        .get_user(verified_user)
        .await?
        .ok_or(ApiAuthError::InvalidCredentials)?;

    let tokens = state
        .token_service
        .create_tokens(verified_user, Some(user.email.clone()))
        .await?;

    state
        .session_events
        .publish(SessionEvent::SignedIn {
            user_id: verified_user,
        });

    tracing::info!(user_id = %verified_user, "MFA verification successful, tokens issued");

    Ok((
        StatusCode::OK,
        Json(TokenResponse::new(
            tokens.access_token,
            tokens.refresh_token,
            tokens.expires_in,
        )),
    ))
}
