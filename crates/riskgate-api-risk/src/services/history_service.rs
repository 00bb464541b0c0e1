//! Assessment history persistence.
//!
//! Every read and write runs inside a transaction with `app.user_id` set,
//! so the row-level security policies on `risk_analysis_history` scope the
//! statement to the caller's own rows.

use riskgate_core::UserId;
use riskgate_db::models::{CreateRiskAssessment, RiskAssessmentRecord};
use riskgate_db::{set_user_context, DbPool};

use crate::error::ApiRiskError;
use crate::scoring::{AssessmentInput, AssessmentResult};

/// Default number of history entries returned by a list call.
pub const DEFAULT_HISTORY_LIMIT: i64 = 50;

/// Service for recording and listing risk assessments.
#[derive(Debug, Clone)]
pub struct HistoryService {
    pool: DbPool,
}

impl HistoryService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Persist an assessment for the given user.
    pub async fn record(
        &self,
        user_id: UserId,
        input: &AssessmentInput,
        result: &AssessmentResult,
    ) -> Result<RiskAssessmentRecord, ApiRiskError> {
        let affected_systems = i32::try_from(input.affected_systems).map_err(|_| {
            ApiRiskError::Validation("affected_systems exceeds the storable range".to_string())
        })?;

        let mut tx = self.pool.inner().begin().await?;
        set_user_context(&mut *tx, user_id).await?;

        let record = RiskAssessmentRecord::create(
            &mut *tx,
            CreateRiskAssessment {
                user_id,
                change_type: input.change_type.to_string(),
                affected_systems,
                urgency: input.urgency.to_string(),
                rollback_complexity: input.rollback_complexity.to_string(),
                risk_score: i32::from(result.raw_score),
                risk_level: result.risk_level.to_string(),
                confidence: result.confidence,
                mitigation_strategies: result.mitigation_strategies.clone(),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(record)
    }

    /// List the user's assessments, newest first.
    ///
    /// The query carries no explicit user filter; the select policy does
    /// the scoping.
    pub async fn list(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> Result<Vec<RiskAssessmentRecord>, ApiRiskError> {
        let mut tx = self.pool.inner().begin().await?;
        set_user_context(&mut *tx, user_id).await?;

        let records = RiskAssessmentRecord::list(&mut *tx, limit).await?;

        tx.commit().await?;
        Ok(records)
    }
}
