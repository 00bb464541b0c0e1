//! JWT claims structure with standard and custom claims.
//!
//! Provides the `JwtClaims` struct containing RFC 7519 standard claims and
//! the riskgate-specific `purpose` claim that distinguishes partial
//! (MFA-pending) tokens from full access tokens.

use chrono::{Duration, Utc};
use riskgate_core::UserId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Purpose claim value carried by partial tokens issued after the password
/// step but before second-factor verification.
pub const PURPOSE_MFA_VERIFICATION: &str = "mfa_verification";

/// JWT claims containing standard and custom claims.
///
/// # Standard Claims (RFC 7519)
///
/// - `sub`: Subject (the user ID)
/// - `iss`: Issuer
/// - `aud`: Audience
/// - `exp`: Expiration time (Unix timestamp)
/// - `iat`: Issued at (Unix timestamp)
/// - `jti`: JWT ID (unique identifier)
///
/// # Custom Claims
///
/// - `purpose`: set to `"mfa_verification"` on partial tokens
/// - `email`: user email, present on full tokens
///
/// # Example
///
/// ```rust
/// use riskgate_auth::JwtClaims;
///
/// let claims = JwtClaims::builder()
///     .subject("user-123")
///     .issuer("riskgate")
///     .audience(vec!["riskgate-api"])
///     .expires_in_secs(3600)
///     .build();
///
/// assert_eq!(claims.sub, "user-123");
/// assert!(!claims.is_partial());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JwtClaims {
    /// Subject - the user ID.
    pub sub: String,

    /// Issuer - who created the token.
    pub iss: String,

    /// Audience - intended recipients.
    #[serde(default)]
    pub aud: Vec<String>,

    /// Expiration time as Unix timestamp.
    pub exp: i64,

    /// Issued at as Unix timestamp.
    pub iat: i64,

    /// JWT ID - unique identifier for this token.
    pub jti: String,

    /// Token purpose (`"mfa_verification"` for partial tokens).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,

    /// User email address (included in full user tokens).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl JwtClaims {
    /// Create a new builder for constructing JWT claims.
    #[must_use]
    pub fn builder() -> JwtClaimsBuilder {
        JwtClaimsBuilder::default()
    }

    /// Check if the token is expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// Check if this is a partial token awaiting MFA verification.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.purpose.as_deref() == Some(PURPOSE_MFA_VERIFICATION)
    }

    /// Parse the subject claim as a typed user ID.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.sub.parse().ok()
    }
}

/// Builder for constructing JWT claims.
#[derive(Debug, Default)]
pub struct JwtClaimsBuilder {
    sub: Option<String>,
    iss: Option<String>,
    aud: Vec<String>,
    exp: Option<i64>,
    iat: Option<i64>,
    jti: Option<String>,
    purpose: Option<String>,
    email: Option<String>,
}

impl JwtClaimsBuilder {
    /// Set the subject (user ID).
    #[must_use]
    pub fn subject(mut self, sub: impl Into<String>) -> Self {
        self.sub = Some(sub.into());
        self
    }

    /// Set the issuer.
    #[must_use]
    pub fn issuer(mut self, iss: impl Into<String>) -> Self {
        self.iss = Some(iss.into());
        self
    }

    /// Set the audience.
    #[must_use]
    pub fn audience(mut self, aud: Vec<impl Into<String>>) -> Self {
        self.aud = aud.into_iter().map(Into::into).collect();
        self
    }

    /// Set expiration time as Unix timestamp.
    #[must_use]
    pub fn expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Set expiration time as seconds from now.
    #[must_use]
    pub fn expires_in_secs(mut self, secs: i64) -> Self {
        self.exp = Some(Utc::now().timestamp() + secs);
        self
    }

    /// Set expiration time using a Duration.
    #[must_use]
    pub fn expires_in(mut self, duration: Duration) -> Self {
        self.exp = Some((Utc::now() + duration).timestamp());
        self
    }

    /// Set the issued at time.
    #[must_use]
    pub fn issued_at(mut self, iat: i64) -> Self {
        self.iat = Some(iat);
        self
    }

    /// Set the JWT ID.
    #[must_use]
    pub fn jwt_id(mut self, jti: impl Into<String>) -> Self {
        self.jti = Some(jti.into());
        self
    }

    /// Set the token purpose (e.g. `"mfa_verification"`).
    #[must_use]
    pub fn purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = Some(purpose.into());
        self
    }

    /// Set the user's email address.
    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Build the final claims.
    ///
    /// Defaults: empty subject/issuer, expiry one hour from now, `iat` now,
    /// random `jti`.
    #[must_use]
    pub fn build(self) -> JwtClaims {
        let now = Utc::now().timestamp();
        JwtClaims {
            sub: self.sub.unwrap_or_default(),
            iss: self.iss.unwrap_or_default(),
            aud: self.aud,
            exp: self.exp.unwrap_or(now + 3600),
            iat: self.iat.unwrap_or(now),
            jti: self.jti.unwrap_or_else(|| Uuid::new_v4().to_string()),
            purpose: self.purpose,
            email: self.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_fields() {
        let claims = JwtClaims::builder()
            .subject("user-1")
            .issuer("riskgate")
            .audience(vec!["riskgate-api"])
            .expires_in_secs(600)
            .build();

        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.iss, "riskgate");
        assert_eq!(claims.aud, vec!["riskgate-api".to_string()]);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_jti_is_unique_by_default() {
        let a = JwtClaims::builder().subject("u").build();
        let b = JwtClaims::builder().subject("u").build();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_is_partial() {
        let partial = JwtClaims::builder()
            .subject("u")
            .purpose(PURPOSE_MFA_VERIFICATION)
            .build();
        let full = JwtClaims::builder().subject("u").build();

        assert!(partial.is_partial());
        assert!(!full.is_partial());
    }

    #[test]
    fn test_is_expired() {
        let expired = JwtClaims::builder()
            .subject("u")
            .expiration(Utc::now().timestamp() - 10)
            .build();
        assert!(expired.is_expired());
    }

    #[test]
    fn test_user_id_parses_uuid_subject() {
        let id = UserId::new();
        let claims = JwtClaims::builder().subject(id.to_string()).build();
        assert_eq!(claims.user_id(), Some(id));

        let bad = JwtClaims::builder().subject("not-a-uuid").build();
        assert_eq!(bad.user_id(), None);
    }

    #[test]
    fn test_purpose_omitted_when_none() {
        let claims = JwtClaims::builder().subject("u").build();
        let json = serde_json::to_string(&claims).unwrap();
        assert!(!json.contains("purpose"));
    }
}
