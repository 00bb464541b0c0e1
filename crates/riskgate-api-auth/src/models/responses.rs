//! Response DTOs for authentication endpoints.

use chrono::{DateTime, Utc};
use riskgate_core::{ChallengeId, FactorId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Signup response payload.
///
/// Signup never signs the user in; clients must go through login (and any
/// MFA challenge) to obtain tokens.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignupResponse {
    /// UUID of the created user.
    pub user_id: Uuid,

    /// Normalized email address.
    pub email: String,
}

/// Full token response after successful authentication.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token.
    pub access_token: String,

    /// Opaque refresh token.
    pub refresh_token: String,

    /// Token type (always "Bearer").
    pub token_type: String,

    /// Access token validity in seconds.
    pub expires_in: i64,
}

impl TokenResponse {
    /// Create a new token response.
    #[must_use]
    pub fn new(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }
}

/// Response when login succeeds but a second factor is still required.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MfaRequiredResponse {
    /// Always true; discriminates this response from `TokenResponse`.
    pub mfa_required: bool,

    /// Short-lived partial token scoped to MFA verification only.
    pub partial_token: String,

    /// The challenge to answer at POST /auth/mfa/verify.
    #[schema(value_type = String, format = "uuid")]
    pub challenge_id: ChallengeId,

    /// The factor being challenged.
    #[schema(value_type = String, format = "uuid")]
    pub factor_id: FactorId,

    /// Partial token validity in seconds.
    pub expires_in: i64,
}

/// TOTP provisioning payload shown once during enrollment.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EnrollmentPayload {
    /// The pending factor.
    #[schema(value_type = String, format = "uuid")]
    pub factor_id: FactorId,

    /// Base32-encoded TOTP secret for manual entry.
    pub secret_base32: String,

    /// otpauth:// provisioning URI.
    pub otpauth_uri: String,

    /// QR code of the provisioning URI as base64 PNG.
    pub qr_code_base64: String,
}

/// Response when login succeeds but no factor exists yet: a pending factor
/// was created and must be confirmed with its first code.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MfaEnrollmentResponse {
    /// Always true; a second factor is still outstanding.
    pub mfa_required: bool,

    /// TOTP provisioning data for the authenticator app.
    pub enrollment: EnrollmentPayload,

    /// Short-lived partial token scoped to MFA verification only.
    pub partial_token: String,

    /// The challenge to answer at POST /auth/mfa/verify.
    #[schema(value_type = String, format = "uuid")]
    pub challenge_id: ChallengeId,

    /// Partial token validity in seconds.
    pub expires_in: i64,
}

/// Login response. The password step never issues full tokens; both
/// variants require completing POST /auth/mfa/verify.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum LoginResponse {
    /// An existing factor was challenged.
    MfaRequired(MfaRequiredResponse),
    /// No factor existed; enrollment data is included.
    EnrollmentRequired(MfaEnrollmentResponse),
}

/// Current session information (GET /auth/session).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    /// The authenticated user's ID.
    pub user_id: Uuid,

    /// The authenticated user's email, if carried in the token.
    pub email: Option<String>,

    /// When the access token expires.
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_bearer_type() {
        let resp = TokenResponse::new("a".to_string(), "r".to_string(), 900);
        assert_eq!(resp.token_type, "Bearer");
        assert_eq!(resp.expires_in, 900);
    }

    #[test]
    fn test_login_response_untagged_serialization() {
        let mfa = LoginResponse::MfaRequired(MfaRequiredResponse {
            mfa_required: true,
            partial_token: "pt".to_string(),
            challenge_id: ChallengeId::new(),
            factor_id: FactorId::new(),
            expires_in: 300,
        });
        let json = serde_json::to_value(&mfa).unwrap();
        assert_eq!(json["mfa_required"], true);
        assert!(json.get("access_token").is_none());
        assert!(json.get("enrollment").is_none());

        let enrollment = LoginResponse::EnrollmentRequired(MfaEnrollmentResponse {
            mfa_required: true,
            enrollment: EnrollmentPayload {
                factor_id: FactorId::new(),
                secret_base32: "JBSWY3DP".to_string(),
                otpauth_uri: "otpauth://totp/riskgate:a@b.c?secret=JBSWY3DP".to_string(),
                qr_code_base64: "iVBOR".to_string(),
            },
            partial_token: "pt".to_string(),
            challenge_id: ChallengeId::new(),
            expires_in: 300,
        });
        let json = serde_json::to_value(&enrollment).unwrap();
        assert_eq!(json["mfa_required"], true);
        assert!(json["enrollment"].get("secret_base32").is_some());
    }

    #[test]
    fn test_login_never_carries_full_tokens() {
        // Both login variants carry only a partial token.
        let json = serde_json::to_value(LoginResponse::MfaRequired(MfaRequiredResponse {
            mfa_required: true,
            partial_token: "pt".to_string(),
            challenge_id: ChallengeId::new(),
            factor_id: FactorId::new(),
            expires_in: 300,
        }))
        .unwrap();
        assert!(json.get("refresh_token").is_none());
    }
}
