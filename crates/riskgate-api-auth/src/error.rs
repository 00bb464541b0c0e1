//! Error types for the authentication API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

/// Error type for the authentication API.
#[derive(Debug, thiserror::Error)]
pub enum ApiAuthError {
    /// Invalid email or password. Deliberately generic so the response
    /// cannot be used to probe which emails are registered.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Account is deactivated.
    #[error("Account is inactive")]
    AccountInactive,

    /// Email already registered.
    #[error("Email already exists")]
    EmailConflict,

    /// Validation error (invalid email, weak password, etc.).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Authentication required.
    #[error("Authentication required")]
    Unauthorized,

    /// Access or refresh token is invalid.
    #[error("Invalid token")]
    InvalidToken,

    /// Token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// Refresh token has been revoked.
    #[error("Token revoked")]
    TokenRevoked,

    /// Partial token is missing, malformed, or not an MFA-verification token.
    #[error("Invalid or expired partial token")]
    PartialTokenInvalid,

    /// TOTP code did not verify.
    #[error("Invalid verification code")]
    InvalidMfaCode,

    /// Factor is locked out after too many failed attempts.
    #[error("Too many failed attempts, try again later")]
    MfaLocked,

    /// Challenge does not exist, was already consumed, or has expired.
    #[error("Challenge not found or expired")]
    ChallengeInvalid,

    /// No verified factor exists for the user.
    #[error("MFA factor not found")]
    FactorNotFound,

    /// Could not determine the user's factor state.
    #[error("Failed to list MFA factors: {0}")]
    FactorListFailed(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Database layer error.
    #[error("Database error: {0}")]
    DatabaseInternal(#[from] riskgate_db::DbError),

    /// Internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// RFC 7807 Problem Details response format.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ProblemDetails {
    fn new(problem_type: &str, title: &str, status: StatusCode, detail: Option<String>) -> Self {
        Self {
            problem_type: format!("https://riskgate.dev/problems/{problem_type}"),
            title: title.to_string(),
            status: status.as_u16(),
            detail,
        }
    }
}

impl IntoResponse for ApiAuthError {
    fn into_response(self) -> Response {
        let (status, problem) = match &self {
            ApiAuthError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ProblemDetails::new(
                    "invalid-credentials",
                    "Unauthorized",
                    StatusCode::UNAUTHORIZED,
                    Some("Invalid email or password".to_string()),
                ),
            ),
            ApiAuthError::AccountInactive => (
                StatusCode::FORBIDDEN,
                ProblemDetails::new(
                    "account-inactive",
                    "Forbidden",
                    StatusCode::FORBIDDEN,
                    Some("Account is inactive".to_string()),
                ),
            ),
            ApiAuthError::EmailConflict => (
                StatusCode::CONFLICT,
                ProblemDetails::new(
                    "conflict",
                    "Conflict",
                    StatusCode::CONFLICT,
                    Some("Email already exists".to_string()),
                ),
            ),
            ApiAuthError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ProblemDetails::new(
                    "validation-error",
                    "Validation Error",
                    StatusCode::BAD_REQUEST,
                    Some(msg.clone()),
                ),
            ),
            ApiAuthError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                ProblemDetails::new(
                    "unauthorized",
                    "Unauthorized",
                    StatusCode::UNAUTHORIZED,
                    Some("Authentication required".to_string()),
                ),
            ),
            ApiAuthError::InvalidToken | ApiAuthError::TokenExpired | ApiAuthError::TokenRevoked => {
                (
                    StatusCode::UNAUTHORIZED,
                    ProblemDetails::new(
                        "invalid-token",
                        "Unauthorized",
                        StatusCode::UNAUTHORIZED,
                        Some(self.to_string()),
                    ),
                )
            }
            ApiAuthError::PartialTokenInvalid => (
                StatusCode::UNAUTHORIZED,
                ProblemDetails::new(
                    "partial-token-invalid",
                    "Unauthorized",
                    StatusCode::UNAUTHORIZED,
                    Some("Invalid or expired partial token".to_string()),
                ),
            ),
            ApiAuthError::InvalidMfaCode => (
                StatusCode::UNAUTHORIZED,
                ProblemDetails::new(
                    "invalid-mfa-code",
                    "Unauthorized",
                    StatusCode::UNAUTHORIZED,
                    Some("Invalid verification code".to_string()),
                ),
            ),
            ApiAuthError::MfaLocked => (
                StatusCode::TOO_MANY_REQUESTS,
                ProblemDetails::new(
                    "mfa-locked",
                    "Too Many Requests",
                    StatusCode::TOO_MANY_REQUESTS,
                    Some("Too many failed attempts, try again later".to_string()),
                ),
            ),
            ApiAuthError::ChallengeInvalid => (
                StatusCode::BAD_REQUEST,
                ProblemDetails::new(
                    "challenge-invalid",
                    "Bad Request",
                    StatusCode::BAD_REQUEST,
                    Some("Challenge not found or expired".to_string()),
                ),
            ),
            ApiAuthError::FactorNotFound => (
                StatusCode::NOT_FOUND,
                ProblemDetails::new(
                    "factor-not-found",
                    "Not Found",
                    StatusCode::NOT_FOUND,
                    Some("MFA factor not found".to_string()),
                ),
            ),
            ApiAuthError::FactorListFailed(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ProblemDetails::new(
                    "internal-error",
                    "Internal Server Error",
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Some("Failed to determine MFA state".to_string()),
                ),
            ),
            ApiAuthError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ProblemDetails::new(
                        "internal-error",
                        "Internal Server Error",
                        StatusCode::INTERNAL_SERVER_ERROR,
                        None,
                    ),
                )
            }
            ApiAuthError::DatabaseInternal(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ProblemDetails::new(
                        "internal-error",
                        "Internal Server Error",
                        StatusCode::INTERNAL_SERVER_ERROR,
                        None,
                    ),
                )
            }
            ApiAuthError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ProblemDetails::new(
                        "internal-error",
                        "Internal Server Error",
                        StatusCode::INTERNAL_SERVER_ERROR,
                        None,
                    ),
                )
            }
        };

        (status, Json(problem)).into_response()
    }
}

impl From<riskgate_auth::AuthError> for ApiAuthError {
    fn from(err: riskgate_auth::AuthError) -> Self {
        if err.is_expired() {
            ApiAuthError::TokenExpired
        } else if err.is_password_error() {
            ApiAuthError::Internal(err.to_string())
        } else {
            ApiAuthError::InvalidToken
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn test_invalid_credentials_is_401() {
        let response = ApiAuthError::InvalidCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_validation_is_400() {
        let response = ApiAuthError::Validation("bad email".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_email_conflict_is_409() {
        let response = ApiAuthError::EmailConflict.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_invalid_mfa_code_is_401() {
        let response = ApiAuthError::InvalidMfaCode.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_mfa_locked_is_429() {
        let response = ApiAuthError::MfaLocked.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_database_error_hides_detail() {
        let err = ApiAuthError::Database(sqlx::Error::RowNotFound);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
