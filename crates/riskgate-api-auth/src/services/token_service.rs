//! Token service for access and refresh token management.
//!
//! Access tokens are RS256 JWTs; refresh tokens are opaque random strings
//! whose SHA-256 hashes are stored in the `sessions` table.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use riskgate_auth::{encode_token, JwtClaims, PURPOSE_MFA_VERIFICATION};
use riskgate_core::UserId;
use riskgate_db::models::{CreateSession, Session};
use riskgate_db::DbPool;

use crate::error::ApiAuthError;

/// Default refresh token validity in days.
pub const REFRESH_TOKEN_VALIDITY_DAYS: i64 = 7;

/// Default access token validity in minutes.
pub const ACCESS_TOKEN_VALIDITY_MINUTES: i64 = 15;

/// Partial (MFA-pending) token validity in seconds.
pub const PARTIAL_TOKEN_VALIDITY_SECONDS: i64 = 300;

/// Size of secure tokens in bytes (256 bits of entropy).
pub const SECURE_TOKEN_BYTES: usize = 32;

/// Configuration for JWT token generation.
#[derive(Clone)]
pub struct TokenConfig {
    /// PEM-encoded RSA private key for signing JWTs.
    pub private_key: Vec<u8>,
    /// Token issuer (iss claim).
    pub issuer: String,
    /// Token audience (aud claim).
    pub audience: String,
}

/// Tokens issued for a fully authenticated user.
#[derive(Debug)]
pub struct IssuedTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// Service for managing JWT and refresh tokens.
#[derive(Clone)]
pub struct TokenService {
    config: TokenConfig,
    pool: DbPool,
    access_token_validity: Duration,
    refresh_token_validity: Duration,
}

impl TokenService {
    /// Create a new token service.
    #[must_use]
    pub fn new(config: TokenConfig, pool: DbPool) -> Self {
        Self {
            config,
            pool,
            access_token_validity: Duration::minutes(ACCESS_TOKEN_VALIDITY_MINUTES),
            refresh_token_validity: Duration::days(REFRESH_TOKEN_VALIDITY_DAYS),
        }
    }

    /// Create a token service with custom validity periods.
    #[must_use]
    pub fn with_validity(
        config: TokenConfig,
        pool: DbPool,
        access_token_minutes: i64,
        refresh_token_days: i64,
    ) -> Self {
        Self {
            config,
            pool,
            access_token_validity: Duration::minutes(access_token_minutes),
            refresh_token_validity: Duration::days(refresh_token_days),
        }
    }

    /// Create access and refresh tokens for a fully authenticated user.
    pub async fn create_tokens(
        &self,
        user_id: UserId,
        email: Option<String>,
    ) -> Result<IssuedTokens, ApiAuthError> {
        let access_token = self.create_access_token(user_id, email)?;
        let refresh_token = self.create_refresh_token(user_id).await?;

        Ok(IssuedTokens {
            access_token,
            refresh_token,
            expires_in: self.access_token_validity.num_seconds(),
        })
    }

    /// Create a JWT access token.
    fn create_access_token(
        &self,
        user_id: UserId,
        email: Option<String>,
    ) -> Result<String, ApiAuthError> {
        let mut builder = JwtClaims::builder()
            .subject(user_id.to_string())
            .issuer(&self.config.issuer)
            .audience(vec![self.config.audience.clone()])
            .expires_in_secs(self.access_token_validity.num_seconds());

        if let Some(email) = email {
            builder = builder.email(email);
        }

        let claims = builder.build();

        encode_token(&claims, &self.config.private_key).map_err(|e| {
            tracing::error!("Failed to encode JWT: {}", e);
            ApiAuthError::Internal(format!("Token generation error: {e}"))
        })
    }

    /// Create a partial token for MFA verification.
    ///
    /// This token is short-lived (5 minutes) and can only be used
    /// to complete MFA verification.
    ///
    /// Returns a tuple of (`partial_token`, `expires_in_seconds`).
    pub fn create_partial_token(&self, user_id: UserId) -> Result<(String, i64), ApiAuthError> {
        let claims = JwtClaims::builder()
            .subject(user_id.to_string())
            .issuer(&self.config.issuer)
            .audience(vec![self.config.audience.clone()])
            .expires_in_secs(PARTIAL_TOKEN_VALIDITY_SECONDS)
            .purpose(PURPOSE_MFA_VERIFICATION)
            .build();

        let token = encode_token(&claims, &self.config.private_key).map_err(|e| {
            tracing::error!("Failed to encode partial JWT: {}", e);
            ApiAuthError::Internal(format!("Token generation error: {e}"))
        })?;

        Ok((token, PARTIAL_TOKEN_VALIDITY_SECONDS))
    }

    /// Create an opaque refresh token and store its hash in a session row.
    async fn create_refresh_token(&self, user_id: UserId) -> Result<String, ApiAuthError> {
        // Opaque tokens come from OsRng, not Uuid::new_v4(), which is not
        // designed for cryptographic security.
        let opaque_token = generate_secure_token();
        let token_hash = hash_token(&opaque_token);
        let expires_at = Utc::now() + self.refresh_token_validity;

        Session::create(
            self.pool.inner(),
            CreateSession {
                user_id,
                refresh_token_hash: token_hash,
                expires_at,
            },
        )
        .await?;

        Ok(opaque_token)
    }

    /// Validate a refresh token and return the associated session.
    ///
    /// The row is located by its hash, then the accept decision itself is a
    /// constant-time comparison against the stored hash.
    pub async fn validate_refresh_token(
        &self,
        opaque_token: &str,
    ) -> Result<Session, ApiAuthError> {
        let token_hash = hash_token(opaque_token);

        let session = Session::find_active_by_token_hash(self.pool.inner(), &token_hash)
            .await?
            .ok_or(ApiAuthError::InvalidToken)?;

        if !verify_token_hash_constant_time(&token_hash, &session.refresh_token_hash) {
            return Err(ApiAuthError::InvalidToken);
        }

        Ok(session)
    }

    /// Refresh tokens: validate, rotate the refresh token, and issue a new
    /// access token. The session row is kept; only its hash changes.
    pub async fn refresh_tokens(
        &self,
        opaque_token: &str,
        email: Option<String>,
    ) -> Result<(UserId, IssuedTokens), ApiAuthError> {
        let session = self.validate_refresh_token(opaque_token).await?;
        let user_id = UserId::from_uuid(session.user_id);

        let new_opaque = generate_secure_token();
        let new_hash = hash_token(&new_opaque);
        let new_expires_at = Utc::now() + self.refresh_token_validity;

        Session::rotate_token(self.pool.inner(), session.id, &new_hash, new_expires_at)
            .await?;

        let access_token = self.create_access_token(user_id, email)?;

        Ok((
            user_id,
            IssuedTokens {
                access_token,
                refresh_token: new_opaque,
                expires_in: self.access_token_validity.num_seconds(),
            },
        ))
    }

    /// Revoke the session backing a refresh token (sign-out).
    ///
    /// Returns true if a live session was revoked.
    pub async fn revoke_refresh_token(&self, opaque_token: &str) -> Result<bool, ApiAuthError> {
        let token_hash = hash_token(opaque_token);
        let revoked = Session::revoke_by_token_hash(self.pool.inner(), &token_hash).await?;
        Ok(revoked)
    }
}

/// Hash a token with SHA-256 for storage.
#[must_use]
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Generate a cryptographically secure token.
///
/// Returns a URL-safe base64-encoded string of 32 random bytes (256 bits of
/// entropy). The resulting token is 43 characters long.
#[must_use]
pub fn generate_secure_token() -> String {
    use rand::rngs::OsRng;
    let mut bytes = [0u8; SECURE_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Verify a token hash using constant-time comparison.
#[must_use]
pub fn verify_token_hash_constant_time(candidate_hash: &str, stored_hash: &str) -> bool {
    candidate_hash
        .as_bytes()
        .ct_eq(stored_hash.as_bytes())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_secure_token_length() {
        let token = generate_secure_token();
        assert_eq!(token.len(), 43);
    }

    #[test]
    fn test_generate_secure_token_unique() {
        assert_ne!(generate_secure_token(), generate_secure_token());
    }

    #[test]
    fn test_hash_token_deterministic() {
        let token = "some-token";
        assert_eq!(hash_token(token), hash_token(token));
        assert_eq!(hash_token(token).len(), 64);
    }

    #[test]
    fn test_hash_token_differs_per_input() {
        assert_ne!(hash_token("a"), hash_token("b"));
    }

    #[test]
    fn test_constant_time_comparison() {
        let hash = hash_token("token");
        assert!(verify_token_hash_constant_time(&hash, &hash));
        assert!(!verify_token_hash_constant_time(&hash, &hash_token("other")));
    }
}
