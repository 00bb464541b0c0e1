//! MFA challenge model.
//!
//! A challenge is a short-lived record created when a login reaches the
//! second-factor step. Verifying a code consumes the challenge; expired or
//! already-consumed challenges are rejected.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgExecutor};
use uuid::Uuid;

use riskgate_core::{ChallengeId, FactorId, UserId};

/// A pending second-factor verification.
#[derive(Debug, Clone, FromRow)]
pub struct MfaChallenge {
    /// Unique identifier for this challenge.
    pub id: Uuid,

    /// The factor being challenged.
    pub factor_id: Uuid,

    /// The user being challenged.
    pub user_id: Uuid,

    /// When the challenge stops being answerable.
    pub expires_at: DateTime<Utc>,

    /// When the challenge was successfully answered (None if pending).
    pub verified_at: Option<DateTime<Utc>>,

    /// When the challenge was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new challenge.
#[derive(Debug, Clone)]
pub struct CreateMfaChallenge {
    pub factor_id: FactorId,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

impl MfaChallenge {
    /// Get the challenge ID as a typed `ChallengeId`.
    #[must_use]
    pub fn challenge_id(&self) -> ChallengeId {
        ChallengeId::from_uuid(self.id)
    }

    /// Check if the challenge can no longer be answered.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Check if the challenge has already been consumed.
    #[must_use]
    pub fn is_verified(&self) -> bool {
        self.verified_at.is_some()
    }

    /// Create a new challenge.
    pub async fn create<'e, E>(executor: E, data: CreateMfaChallenge) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as(
            r#"
            INSERT INTO mfa_challenges (factor_id, user_id, expires_at)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(data.factor_id.as_uuid())
        .bind(data.user_id.as_uuid())
        .bind(data.expires_at)
        .fetch_one(executor)
        .await
    }

    /// Find a challenge by its ID.
    pub async fn find_by_id<'e, E>(
        executor: E,
        id: ChallengeId,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as("SELECT * FROM mfa_challenges WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(executor)
            .await
    }

    /// Consume a challenge after a successful code verification.
    ///
    /// Only succeeds if the challenge is still pending and unexpired,
    /// so a replayed challenge ID is a no-op.
    pub async fn consume<'e, E>(executor: E, id: ChallengeId) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            r#"
            UPDATE mfa_challenges
            SET verified_at = NOW()
            WHERE id = $1 AND verified_at IS NULL AND expires_at > NOW()
            "#,
        )
        .bind(id.as_uuid())
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete expired challenges. Returns the number removed.
    pub async fn purge_expired<'e, E>(executor: E) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM mfa_challenges WHERE expires_at < NOW()")
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn challenge(expires_at: DateTime<Utc>, verified_at: Option<DateTime<Utc>>) -> MfaChallenge {
        MfaChallenge {
            id: Uuid::new_v4(),
            factor_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            expires_at,
            verified_at,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_is_expired() {
        let live = challenge(Utc::now() + chrono::Duration::minutes(5), None);
        let dead = challenge(Utc::now() - chrono::Duration::seconds(1), None);
        assert!(!live.is_expired());
        assert!(dead.is_expired());
    }

    #[test]
    fn test_is_verified() {
        let pending = challenge(Utc::now() + chrono::Duration::minutes(5), None);
        let consumed = challenge(Utc::now() + chrono::Duration::minutes(5), Some(Utc::now()));
        assert!(!pending.is_verified());
        assert!(consumed.is_verified());
    }
}
