//! TOTP factor model.
//!
//! Stores encrypted TOTP secrets for multi-factor authentication. A factor
//! starts in `Unverified` state when enrollment begins and transitions to
//! `Verified` once the user proves possession with a valid code.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor};
use uuid::Uuid;

use riskgate_core::{FactorId, UserId};

/// Lifecycle state of a TOTP factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FactorStatus {
    /// Enrollment started but no code verified yet.
    Unverified,
    /// The user has proven possession; the factor counts toward MFA.
    Verified,
}

impl std::fmt::Display for FactorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unverified => write!(f, "unverified"),
            Self::Verified => write!(f, "verified"),
        }
    }
}

/// A user's TOTP factor.
///
/// The secret is encrypted at rest using AES-256-GCM.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TotpFactor {
    /// Unique identifier for this factor.
    pub id: Uuid,

    /// The user this factor belongs to.
    pub user_id: Uuid,

    /// AES-256-GCM encrypted TOTP secret (160-bit minimum).
    #[serde(skip_serializing)]
    pub secret_encrypted: Vec<u8>,

    /// Initialization vector for AES-GCM encryption.
    #[serde(skip_serializing)]
    pub iv: Vec<u8>,

    /// Lifecycle state.
    pub status: FactorStatus,

    /// Human-readable label chosen at enrollment.
    pub friendly_name: Option<String>,

    /// Number of consecutive failed verification attempts.
    pub failed_attempts: i32,

    /// If locked, when the lockout expires.
    pub locked_until: Option<DateTime<Utc>>,

    /// When verification first succeeded.
    pub verified_at: Option<DateTime<Utc>>,

    /// When TOTP was last successfully used.
    pub last_used_at: Option<DateTime<Utc>>,

    /// When this record was created.
    pub created_at: DateTime<Utc>,

    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new TOTP factor.
#[derive(Debug)]
pub struct CreateTotpFactor {
    pub user_id: UserId,
    pub secret_encrypted: Vec<u8>,
    pub iv: Vec<u8>,
    pub friendly_name: Option<String>,
}

impl TotpFactor {
    /// Get the factor ID as a typed `FactorId`.
    #[must_use]
    pub fn factor_id(&self) -> FactorId {
        FactorId::from_uuid(self.id)
    }

    /// Check if the factor is currently locked out.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        if let Some(locked_until) = self.locked_until {
            locked_until > Utc::now()
        } else {
            false
        }
    }

    /// Check if the factor counts toward the user's MFA posture.
    #[must_use]
    pub fn is_verified(&self) -> bool {
        self.status == FactorStatus::Verified
    }

    /// Create a new factor record (enrollment started, not yet verified).
    pub async fn create<'e, E>(executor: E, data: CreateTotpFactor) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as(
            r#"
            INSERT INTO totp_factors (user_id, secret_encrypted, iv, status, friendly_name)
            VALUES ($1, $2, $3, 'unverified', $4)
            RETURNING *
            "#,
        )
        .bind(data.user_id.as_uuid())
        .bind(&data.secret_encrypted)
        .bind(&data.iv)
        .bind(&data.friendly_name)
        .fetch_one(executor)
        .await
    }

    /// Find a factor by its ID.
    pub async fn find_by_id<'e, E>(executor: E, id: FactorId) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as("SELECT * FROM totp_factors WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(executor)
            .await
    }

    /// List only verified factors for a user.
    pub async fn list_verified_for_user<'e, E>(
        executor: E,
        user_id: UserId,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as(
            "SELECT * FROM totp_factors WHERE user_id = $1 AND status = 'verified' ORDER BY created_at",
        )
        .bind(user_id.as_uuid())
        .fetch_all(executor)
        .await
    }

    /// Mark a factor verified after a successful first challenge.
    pub async fn mark_verified<'e, E>(executor: E, id: FactorId) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as(
            r#"
            UPDATE totp_factors
            SET status = 'verified', verified_at = NOW(), failed_attempts = 0, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id.as_uuid())
        .fetch_one(executor)
        .await
    }

    /// Record successful TOTP verification.
    pub async fn record_success<'e, E>(executor: E, id: FactorId) -> Result<(), sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query(
            r#"
            UPDATE totp_factors
            SET last_used_at = NOW(), failed_attempts = 0, locked_until = NULL, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Record failed TOTP verification and potentially lock.
    /// Returns the new failed_attempts count.
    pub async fn record_failure<'e, E>(
        executor: E,
        id: FactorId,
        max_attempts: i32,
        lockout_minutes: i64,
    ) -> Result<i32, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result: (i32,) = sqlx::query_as(
            r#"
            UPDATE totp_factors
            SET
                failed_attempts = failed_attempts + 1,
                locked_until = CASE
                    WHEN failed_attempts + 1 >= $2 THEN NOW() + ($3 || ' minutes')::INTERVAL
                    ELSE locked_until
                END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING failed_attempts
            "#,
        )
        .bind(id.as_uuid())
        .bind(max_attempts)
        .bind(lockout_minutes.to_string())
        .fetch_one(executor)
        .await?;
        Ok(result.0)
    }

    /// Delete an incomplete enrollment (for retry).
    pub async fn delete_if_unverified<'e, E>(
        executor: E,
        user_id: UserId,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result =
            sqlx::query("DELETE FROM totp_factors WHERE user_id = $1 AND status = 'unverified'")
                .bind(user_id.as_uuid())
                .execute(executor)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_locked_when_not_locked() {
        let factor = create_test_factor(None);
        assert!(!factor.is_locked());
    }

    #[test]
    fn test_is_locked_when_locked() {
        let locked_until = Utc::now() + chrono::Duration::minutes(5);
        let factor = create_test_factor(Some(locked_until));
        assert!(factor.is_locked());
    }

    #[test]
    fn test_is_locked_when_expired() {
        let locked_until = Utc::now() - chrono::Duration::minutes(1);
        let factor = create_test_factor(Some(locked_until));
        assert!(!factor.is_locked());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(FactorStatus::Unverified.to_string(), "unverified");
        assert_eq!(FactorStatus::Verified.to_string(), "verified");
    }

    fn create_test_factor(locked_until: Option<DateTime<Utc>>) -> TotpFactor {
        TotpFactor {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            secret_encrypted: vec![],
            iv: vec![],
            status: FactorStatus::Verified,
            friendly_name: None,
            failed_attempts: 0,
            locked_until,
            verified_at: Some(Utc::now()),
            last_used_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}
