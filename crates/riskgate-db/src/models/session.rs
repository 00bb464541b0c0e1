//! Session model for tracking issued refresh tokens.
//!
//! The opaque refresh token is never stored; only its SHA-256 hash is kept,
//! so a database leak does not expose usable tokens.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgExecutor};
use uuid::Uuid;

use riskgate_core::UserId;

/// A user session backed by a refresh token.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Session {
    /// Unique identifier for this session.
    pub id: Uuid,

    /// The user this session belongs to.
    pub user_id: Uuid,

    /// SHA-256 hash of the opaque refresh token, hex-encoded.
    #[serde(skip_serializing)]
    pub refresh_token_hash: String,

    /// When the session was created.
    pub created_at: DateTime<Utc>,

    /// When the refresh token was last rotated.
    pub last_refreshed_at: DateTime<Utc>,

    /// When the session expires.
    pub expires_at: DateTime<Utc>,

    /// When the session was revoked (None if still active).
    pub revoked_at: Option<DateTime<Utc>>,
}

/// Data required to create a new session.
#[derive(Debug, Clone)]
pub struct CreateSession {
    pub user_id: UserId,
    pub refresh_token_hash: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Check if the session can still be refreshed.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.revoked_at.is_none() && Utc::now() < self.expires_at
    }

    /// Create a new session.
    pub async fn create<'e, E>(executor: E, data: CreateSession) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as(
            r#"
            INSERT INTO sessions (user_id, refresh_token_hash, expires_at)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(data.user_id.as_uuid())
        .bind(&data.refresh_token_hash)
        .bind(data.expires_at)
        .fetch_one(executor)
        .await
    }

    /// Find an active session by refresh token hash.
    pub async fn find_active_by_token_hash<'e, E>(
        executor: E,
        token_hash: &str,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as(
            r#"
            SELECT * FROM sessions
            WHERE refresh_token_hash = $1
              AND revoked_at IS NULL
              AND expires_at > NOW()
            "#,
        )
        .bind(token_hash)
        .fetch_optional(executor)
        .await
    }

    /// Rotate the refresh token for a session.
    pub async fn rotate_token<'e, E>(
        executor: E,
        session_id: Uuid,
        new_token_hash: &str,
        new_expires_at: DateTime<Utc>,
    ) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as(
            r#"
            UPDATE sessions
            SET refresh_token_hash = $2, last_refreshed_at = NOW(), expires_at = $3
            WHERE id = $1 AND revoked_at IS NULL
            RETURNING *
            "#,
        )
        .bind(session_id)
        .bind(new_token_hash)
        .bind(new_expires_at)
        .fetch_one(executor)
        .await
    }

    /// Revoke a session by refresh token hash (sign-out).
    /// Returns true if a live session was revoked.
    pub async fn revoke_by_token_hash<'e, E>(
        executor: E,
        token_hash: &str,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            r#"
            UPDATE sessions
            SET revoked_at = NOW()
            WHERE refresh_token_hash = $1 AND revoked_at IS NULL
            "#,
        )
        .bind(token_hash)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Revoke every live session for a user.
    pub async fn revoke_all_for_user<'e, E>(
        executor: E,
        user_id: UserId,
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE sessions SET revoked_at = NOW() WHERE user_id = $1 AND revoked_at IS NULL",
        )
        .bind(user_id.as_uuid())
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(expires_at: DateTime<Utc>, revoked_at: Option<DateTime<Utc>>) -> Session {
        Session {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            refresh_token_hash: "abc".to_string(),
            created_at: Utc::now(),
            last_refreshed_at: Utc::now(),
            expires_at,
            revoked_at,
        }
    }

    #[test]
    fn test_is_active() {
        let live = session(Utc::now() + chrono::Duration::days(7), None);
        assert!(live.is_active());

        let expired = session(Utc::now() - chrono::Duration::seconds(1), None);
        assert!(!expired.is_active());

        let revoked = session(Utc::now() + chrono::Duration::days(7), Some(Utc::now()));
        assert!(!revoked.is_active());
    }
}
