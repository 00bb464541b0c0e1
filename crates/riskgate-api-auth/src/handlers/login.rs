//! Login endpoint handler.
//!
//! POST /auth/login - Authenticate user and start the second-factor step.

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::error::ApiAuthError;
use crate::models::{
    EnrollmentPayload, LoginRequest, LoginResponse, MfaEnrollmentResponse, MfaRequiredResponse,
};
use crate::router::AuthState;
use crate::services::{FactorList, MfaLoginFlow};

/// Handle user login.
///
/// Authenticates with email and password, then checks the user's factor
/// inventory. The password step never issues full tokens:
/// - with no factor, a pending TOTP factor is created and its provisioning
///   payload (secret, otpauth URI, QR PNG) returned;
/// - with an existing factor, a challenge is issued.
///
/// Either way the client receives a short-lived partial token and completes
/// login at POST /auth/mfa/verify with the code.
///
/// A failure while listing factors fails the login. It is never treated as
/// "no factors", which would let an outage downgrade MFA accounts.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "MFA challenge issued", body = MfaRequiredResponse),
        (status = 200, description = "MFA enrollment required", body = MfaEnrollmentResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account is inactive"),
    ),
    tag = "Authentication"
)]
pub async fn login_handler(
    State(state): State<AuthState>,
    Json(request): Json<LoginRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), ApiAuthError> {
    request.validate().map_err(|e| {
        let errors: Vec<String> = e
            .field_errors()
            .values()
            .flat_map(|errors| {
                errors
                    .iter()
                    .filter_map(|e| e.message.as_ref().map(std::string::ToString::to_string))
            })
            .collect();
        ApiAuthError::Validation(errors.join(", "))
    })?;

    let user = state
        .auth_service
        .login(&request.email, &request.password)
        .await?;
    let user_id = user.user_id();

    let flow = MfaLoginFlow::new();

    let factors = match state.mfa_service.list_factors(user_id).await {
        Ok(factors) => factors,
        Err(e) => {
            let _failed = flow.factor_check_failed();
            tracing::error!(user_id = %user_id, "Factor listing failed during login: {e}");
            return Err(e);
        }
    };

    let response = match factors {
        FactorList::Empty => {
            // First login: provision a factor and confirm it with a code.
            let enrollment = state
                .mfa_service
                .start_enrollment(user_id, &user.email)
                .await?;
            let factor_id = enrollment.factor_id;

            let flow = flow
                .enrollment_started(factor_id)
                .map_err(|e| ApiAuthError::Internal(e.to_string()))?;

            let challenge = state.mfa_service.create_challenge(user_id, factor_id).await?;
            let challenge_id = challenge.challenge_id();

            let _flow = flow
                .challenge_issued(factor_id, challenge_id)
                .map_err(|e| ApiAuthError::Internal(e.to_string()))?;

            let (partial_token, expires_in) = state.token_service.create_partial_token(user_id)?;

            tracing::info!(
                user_id = %user_id,
                factor_id = %factor_id,
                "MFA enrollment started at login"
            );

            LoginResponse::EnrollmentRequired(MfaEnrollmentResponse {
                mfa_required: true,
                enrollment: EnrollmentPayload {
                    factor_id,
                    secret_base32: enrollment.secret_base32,
                    otpauth_uri: enrollment.otpauth_uri,
                    qr_code_base64: enrollment.qr_code_base64,
                },
                partial_token,
                challenge_id,
                expires_in,
            })
        }
        FactorList::Enrolled(ref ids) => {
            let factor_id = ids.first().copied().ok_or_else(|| {
                ApiAuthError::Internal("factor list empty in MFA path".to_string())
            })?;

            let challenge = state.mfa_service.create_challenge(user_id, factor_id).await?;
            let challenge_id = challenge.challenge_id();

            let _flow = flow
                .challenge_issued(factor_id, challenge_id)
                .map_err(|e| ApiAuthError::Internal(e.to_string()))?;

            let (partial_token, expires_in) = state.token_service.create_partial_token(user_id)?;

            tracing::info!(user_id = %user_id, challenge_id = %challenge_id, "MFA challenge issued");

            LoginResponse::MfaRequired(MfaRequiredResponse {
                mfa_required: true,
                partial_token,
                challenge_id,
                factor_id,
                expires_in,
            })
        }
    };

    Ok((StatusCode::OK, Json(response)))
}
