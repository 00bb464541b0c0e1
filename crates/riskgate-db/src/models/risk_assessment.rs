//! Risk assessment history model.
//!
//! Rows in `risk_analysis_history` are protected by row-level security: the
//! `app.user_id` transaction variable must match `user_id` for both inserts
//! and selects, and no update or delete policy exists. Callers must run
//! inside a transaction after `set_user_context`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgExecutor};
use uuid::Uuid;

use riskgate_core::{AssessmentId, UserId};

/// A persisted risk assessment.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RiskAssessmentRecord {
    /// Unique identifier for this assessment.
    pub id: Uuid,

    /// The user who ran the assessment.
    pub user_id: Uuid,

    /// Kind of change assessed (e.g. "server-migration").
    pub change_type: String,

    /// Number of systems the change touches.
    pub affected_systems: i32,

    /// Urgency level ("low", "medium", "high").
    pub urgency: String,

    /// Rollback complexity ("easy", "medium", "hard").
    pub rollback_complexity: String,

    /// Computed risk score.
    pub risk_score: i32,

    /// Risk tier derived from the score.
    pub risk_level: String,

    /// Confidence percentage reported with the result.
    pub confidence: f64,

    /// Recommended mitigation strategies.
    pub mitigation_strategies: Vec<String>,

    /// When the assessment was recorded.
    pub created_at: DateTime<Utc>,
}

/// Data required to record an assessment.
#[derive(Debug, Clone)]
pub struct CreateRiskAssessment {
    pub user_id: UserId,
    pub change_type: String,
    pub affected_systems: i32,
    pub urgency: String,
    pub rollback_complexity: String,
    pub risk_score: i32,
    pub risk_level: String,
    pub confidence: f64,
    pub mitigation_strategies: Vec<String>,
}

impl RiskAssessmentRecord {
    /// Get the assessment ID as a typed `AssessmentId`.
    #[must_use]
    pub fn assessment_id(&self) -> AssessmentId {
        AssessmentId::from_uuid(self.id)
    }

    /// Insert an assessment row.
    ///
    /// The RLS insert policy requires `app.user_id` to equal `user_id`.
    pub async fn create<'e, E>(
        executor: E,
        data: CreateRiskAssessment,
    ) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as(
            r#"
            INSERT INTO risk_analysis_history (
                user_id, change_type, affected_systems, urgency,
                rollback_complexity, risk_score, risk_level, confidence,
                mitigation_strategies
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(data.user_id.as_uuid())
        .bind(&data.change_type)
        .bind(data.affected_systems)
        .bind(&data.urgency)
        .bind(&data.rollback_complexity)
        .bind(data.risk_score)
        .bind(&data.risk_level)
        .bind(data.confidence)
        .bind(&data.mitigation_strategies)
        .fetch_one(executor)
        .await
    }

    /// List assessments visible under the current RLS context, newest first.
    ///
    /// The select policy already restricts rows to the context user, so no
    /// user filter appears in the query itself.
    pub async fn list<'e, E>(executor: E, limit: i64) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as(
            "SELECT * FROM risk_analysis_history ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(executor)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assessment_id_accessor_preserves_uuid() {
        let id = Uuid::new_v4();
        let record = RiskAssessmentRecord {
            id,
            user_id: Uuid::new_v4(),
            change_type: "server-migration".to_string(),
            affected_systems: 12,
            urgency: "high".to_string(),
            rollback_complexity: "hard".to_string(),
            risk_score: 12,
            risk_level: "Critical".to_string(),
            confidence: 90.0,
            mitigation_strategies: vec![],
            created_at: Utc::now(),
        };
        assert_eq!(record.assessment_id().as_uuid(), &id);
    }
}
