//! TOTP MFA service: enrollment, challenges, and code verification.

use chrono::{Duration, Utc};
use data_encoding::BASE32;
use image::Luma;
use qrcode::QrCode;
use std::io::Cursor;
use totp_rs::{Algorithm, Secret, TOTP};

use riskgate_core::{ChallengeId, FactorId, UserId};
use riskgate_db::models::{
    CreateMfaChallenge, CreateTotpFactor, MfaChallenge, TotpFactor,
};
use riskgate_db::DbPool;

use crate::crypto::{TotpEncryption, TotpEncryptionError};
use crate::error::ApiAuthError;

/// Length of the generated TOTP secret in bytes (160 bits per RFC 4226).
const TOTP_SECRET_LENGTH: usize = 20;

/// Maximum failed verification attempts before lockout.
pub const MAX_FAILED_ATTEMPTS: i32 = 5;

/// Lockout duration in minutes after max failed attempts.
pub const LOCKOUT_MINUTES: i64 = 5;

/// How long a challenge stays answerable.
pub const CHALLENGE_VALIDITY_MINUTES: i64 = 5;

/// The user's current factor inventory.
///
/// Distinguishes "queried successfully, zero factors" from a failed query;
/// the latter surfaces as an error and must never be treated as `Empty`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactorList {
    /// The user has no verified factors.
    Empty,
    /// The user has at least one verified factor.
    Enrolled(Vec<FactorId>),
}

impl FactorList {
    /// The preferred factor to challenge (oldest verified).
    #[must_use]
    pub fn primary(&self) -> Option<FactorId> {
        match self {
            FactorList::Empty => None,
            FactorList::Enrolled(ids) => ids.first().copied(),
        }
    }
}

/// Data returned when TOTP enrollment starts.
#[derive(Debug)]
pub struct EnrollmentData {
    pub factor_id: FactorId,
    pub secret_base32: String,
    pub otpauth_uri: String,
    pub qr_code_base64: String,
}

/// Service for TOTP multi-factor authentication.
#[derive(Clone)]
pub struct MfaService {
    pool: DbPool,
    encryption: TotpEncryption,
    issuer: String,
}

impl MfaService {
    /// Create a new MFA service.
    #[must_use]
    pub fn new(pool: DbPool, encryption: TotpEncryption, issuer: String) -> Self {
        Self {
            pool,
            encryption,
            issuer,
        }
    }

    /// Create an MFA service with the encryption key from the environment.
    pub fn from_env(pool: DbPool, issuer: String) -> Result<Self, TotpEncryptionError> {
        let encryption = TotpEncryption::from_env()?;
        Ok(Self::new(pool, encryption, issuer))
    }

    fn generate_secret() -> Vec<u8> {
        use rand::rngs::OsRng;
        use rand::RngCore;
        let mut secret = vec![0u8; TOTP_SECRET_LENGTH];
        OsRng.fill_bytes(&mut secret[..]);
        secret
    }

    /// List the user's verified factors.
    ///
    /// A database failure here is returned as an error, not an empty list:
    /// callers must not conclude "no MFA" from a failed lookup.
    pub async fn list_factors(&self, user_id: UserId) -> Result<FactorList, ApiAuthError> {
        let factors = TotpFactor::list_verified_for_user(self.pool.inner(), user_id)
            .await
            .map_err(|e| ApiAuthError::FactorListFailed(e.to_string()))?;

        if factors.is_empty() {
            Ok(FactorList::Empty)
        } else {
            Ok(FactorList::Enrolled(
                factors.iter().map(TotpFactor::factor_id).collect(),
            ))
        }
    }

    /// Start TOTP enrollment for a user.
    ///
    /// Generates a fresh secret, stores it encrypted as an unverified
    /// factor, and returns provisioning data including a QR code. Any
    /// earlier incomplete enrollment is discarded.
    pub async fn start_enrollment(
        &self,
        user_id: UserId,
        email: &str,
    ) -> Result<EnrollmentData, ApiAuthError> {
        let mut tx = self.pool.inner().begin().await.map_err(ApiAuthError::Database)?;

        TotpFactor::delete_if_unverified(&mut *tx, user_id)
            .await
            .map_err(ApiAuthError::Database)?;

        let secret_bytes = Self::generate_secret();
        let secret_base32 = BASE32.encode(&secret_bytes);

        let secret_for_totp = Secret::Raw(secret_bytes.clone())
            .to_bytes()
            .map_err(|e| ApiAuthError::Internal(format!("TOTP secret conversion failed: {e}")))?;

        let totp = TOTP::new(
            Algorithm::SHA1,
            6,
            1,
            30,
            secret_for_totp,
            Some(self.issuer.clone()),
            email.to_string(),
        )
        .map_err(|e| ApiAuthError::Internal(format!("TOTP creation failed: {e}")))?;

        let otpauth_uri = totp.get_url();
        let qr_code_base64 = self.generate_qr_code(&otpauth_uri)?;

        let (encrypted, iv) = self
            .encryption
            .encrypt(&secret_bytes)
            .map_err(|e| ApiAuthError::Internal(format!("Encryption failed: {e}")))?;

        let factor = TotpFactor::create(
            &mut *tx,
            CreateTotpFactor {
                user_id,
                secret_encrypted: encrypted,
                iv,
                friendly_name: None,
            },
        )
        .await
        .map_err(ApiAuthError::Database)?;

        tx.commit().await.map_err(ApiAuthError::Database)?;

        tracing::info!(user_id = %user_id, factor_id = %factor.id, "TOTP enrollment started");

        Ok(EnrollmentData {
            factor_id: factor.factor_id(),
            secret_base32,
            otpauth_uri,
            qr_code_base64,
        })
    }

    /// Generate a QR code as base64-encoded PNG.
    fn generate_qr_code(&self, content: &str) -> Result<String, ApiAuthError> {
        let code = QrCode::new(content.as_bytes())
            .map_err(|e| ApiAuthError::Internal(format!("QR code generation failed: {e}")))?;

        let image = code.render::<Luma<u8>>().build();

        let mut png_bytes = Vec::new();
        let mut cursor = Cursor::new(&mut png_bytes);
        image
            .write_to(&mut cursor, image::ImageFormat::Png)
            .map_err(|e| ApiAuthError::Internal(format!("PNG encoding failed: {e}")))?;

        Ok(base64::Engine::encode(
            &base64::engine::general_purpose::STANDARD,
            &png_bytes,
        ))
    }

    /// Create a challenge against a factor.
    pub async fn create_challenge(
        &self,
        user_id: UserId,
        factor_id: FactorId,
    ) -> Result<MfaChallenge, ApiAuthError> {
        let challenge = MfaChallenge::create(
            self.pool.inner(),
            CreateMfaChallenge {
                factor_id,
                user_id,
                expires_at: Utc::now() + Duration::minutes(CHALLENGE_VALIDITY_MINUTES),
            },
        )
        .await?;

        Ok(challenge)
    }

    /// Verify a TOTP code against a pending challenge.
    ///
    /// On success the challenge is consumed and the factor's failure count
    /// resets. An unverified factor becomes verified on its first successful
    /// code, completing enrollment.
    pub async fn verify_challenge(
        &self,
        challenge_id: ChallengeId,
        code: &str,
    ) -> Result<UserId, ApiAuthError> {
        let challenge = MfaChallenge::find_by_id(self.pool.inner(), challenge_id)
            .await?
            .ok_or(ApiAuthError::ChallengeInvalid)?;

        if challenge.is_expired() || challenge.is_verified() {
            return Err(ApiAuthError::ChallengeInvalid);
        }

        let factor = TotpFactor::find_by_id(self.pool.inner(), FactorId::from_uuid(challenge.factor_id))
            .await?
            .ok_or(ApiAuthError::FactorNotFound)?;

        if factor.is_locked() {
            return Err(ApiAuthError::MfaLocked);
        }

        let secret_bytes = self
            .encryption
            .decrypt(&factor.secret_encrypted, &factor.iv)
            .map_err(|e| ApiAuthError::Internal(format!("Decryption failed: {e}")))?;

        if !self.verify_totp_code(&secret_bytes, code)? {
            let attempts = TotpFactor::record_failure(
                self.pool.inner(),
                factor.factor_id(),
                MAX_FAILED_ATTEMPTS,
                LOCKOUT_MINUTES,
            )
            .await?;

            tracing::warn!(
                factor_id = %factor.id,
                attempts,
                "TOTP verification failed"
            );

            if attempts >= MAX_FAILED_ATTEMPTS {
                return Err(ApiAuthError::MfaLocked);
            }
            return Err(ApiAuthError::InvalidMfaCode);
        }

        // A replayed challenge loses the race here and fails.
        let consumed = MfaChallenge::consume(self.pool.inner(), challenge_id).await?;
        if !consumed {
            return Err(ApiAuthError::ChallengeInvalid);
        }

        if factor.is_verified() {
            TotpFactor::record_success(self.pool.inner(), factor.factor_id()).await?;
        } else {
            TotpFactor::mark_verified(self.pool.inner(), factor.factor_id()).await?;
        }

        tracing::info!(
            user_id = %challenge.user_id,
            factor_id = %factor.id,
            "TOTP verification succeeded"
        );

        Ok(UserId::from_uuid(challenge.user_id))
    }

    fn verify_totp_code(&self, secret_bytes: &[u8], code: &str) -> Result<bool, ApiAuthError> {
        let totp = TOTP::new(
            Algorithm::SHA1,
            6,
            1, // 1 step tolerance (±30 seconds)
            30,
            secret_bytes.to_vec(),
            None,
            String::new(),
        )
        .map_err(|e| ApiAuthError::Internal(format!("TOTP creation failed: {e}")))?;

        Ok(totp.check_current(code).unwrap_or(false))
    }
}

impl std::fmt::Debug for MfaService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MfaService")
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_secret_length() {
        let secret = MfaService::generate_secret();
        assert_eq!(secret.len(), TOTP_SECRET_LENGTH);
    }

    #[test]
    fn test_generate_secret_unique() {
        assert_ne!(MfaService::generate_secret(), MfaService::generate_secret());
    }

    #[test]
    fn test_factor_list_primary_is_first() {
        let first = FactorId::new();
        let second = FactorId::new();
        let list = FactorList::Enrolled(vec![first, second]);
        assert_eq!(list.primary(), Some(first));
        assert_eq!(FactorList::Empty.primary(), None);
    }
}
