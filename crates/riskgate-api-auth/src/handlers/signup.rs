//! Signup endpoint handler.
//!
//! POST /auth/signup - Create a new user account.

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::error::ApiAuthError;
use crate::models::{SignupRequest, SignupResponse};
use crate::router::AuthState;

/// Handle user signup.
///
/// Creates an account but never signs the user in; the client must log in
/// (and pass any MFA challenge) to obtain tokens.
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = SignupResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already exists"),
    ),
    tag = "Authentication"
)]
pub async fn signup_handler(
    State(state): State<AuthState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiAuthError> {
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
        .signup(&request.email, &request.password, request.display_name)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            user_id: user.id,
            email: user.email,
        }),
    ))
}
