//! Request DTOs for authentication endpoints.

use riskgate_core::ChallengeId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Signup request payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    /// User email address.
    #[validate(email(message = "Invalid email format"))]
    #[validate(length(max = 255, message = "Email must not exceed 255 characters"))]
    pub email: String,

    /// User password.
    /// Password complexity is validated separately via `validate_password_complexity`.
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    /// Optional display name for the user.
    #[validate(length(max = 255, message = "Display name must not exceed 255 characters"))]
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Login request payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// User email address.
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// User password.
    /// Length validation prevents `DoS` attacks via extremely long passwords
    /// that could consume excessive CPU during hashing.
    #[validate(length(min = 1, max = 1024, message = "Password must be 1-1024 characters"))]
    pub password: String,
}

/// MFA verification request payload.
///
/// Completes a login that returned `mfa_required`. The partial token from
/// that response goes in the Authorization header.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct MfaVerifyRequest {
    /// The challenge issued alongside the partial token.
    #[schema(value_type = String, format = "uuid")]
    pub challenge_id: ChallengeId,

    /// Six-digit TOTP code from the authenticator app.
    #[validate(length(min = 6, max = 6, message = "Code must be 6 digits"))]
    pub code: String,
}

/// Token refresh request payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RefreshRequest {
    /// Refresh token from login response.
    pub refresh_token: String,
}

/// Logout request payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LogoutRequest {
    /// Refresh token to invalidate.
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_request_valid() {
        let request = SignupRequest {
            email: "user@example.com".to_string(),
            password: "SecurePass123".to_string(),
            display_name: Some("Jordan".to_string()),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_signup_request_invalid_email() {
        let request = SignupRequest {
            email: "not-an-email".to_string(),
            password: "SecurePass123".to_string(),
            display_name: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_signup_request_short_password() {
        let request = SignupRequest {
            email: "user@example.com".to_string(),
            password: "short".to_string(),
            display_name: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_mfa_verify_request_code_length() {
        let request = MfaVerifyRequest {
            challenge_id: ChallengeId::new(),
            code: "12345".to_string(),
        };
        assert!(request.validate().is_err());

        let request = MfaVerifyRequest {
            challenge_id: ChallengeId::new(),
            code: "123456".to_string(),
        };
        assert!(request.validate().is_ok());
    }
}
