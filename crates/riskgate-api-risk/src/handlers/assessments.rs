//! Assessment endpoint handlers.
//!
//! POST /risk/assessments - Run an assessment and record it.
//! GET  /risk/assessments - List the caller's history.

use axum::{extract::State, http::StatusCode, Extension, Json};
use validator::Validate;

use riskgate_core::UserId;

use crate::error::ApiRiskError;
use crate::models::{AssessmentRequest, AssessmentResponse, HistoryEntry, HistoryResponse};
use crate::router::RiskState;
use crate::scoring::{self, AssessmentInput};
use crate::services::DEFAULT_HISTORY_LIMIT;

/// Run a risk assessment.
///
/// The score is computed unconditionally; persistence is attempted
/// afterwards and its outcome is reported in `history_recorded`. A failed
/// write is logged but never turns a successful assessment into an error
/// response.
#[utoipa::path(
    post,
    path = "/risk/assessments",
    request_body = AssessmentRequest,
    responses(
        (status = 201, description = "Assessment computed", body = AssessmentResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Authentication required"),
    ),
    security(("bearer_auth" = [])),
    tag = "Risk"
)]
pub async fn create_assessment_handler(
    State(state): State<RiskState>,
    Extension(user_id): Extension<UserId>,
    Json(request): Json<AssessmentRequest>,
) -> Result<(StatusCode, Json<AssessmentResponse>), ApiRiskError> {
    request.validate().map_err(|e| {
        let errors: Vec<String> = e
            .field_errors()
            .values()
            .flat_map(|errors| {
                errors
                    .iter()
                    .filter_map(|e| e.message.as_ref().map(std::string::ToString::to_string))
            })
            .collect();
        ApiRiskError::Validation(errors.join(", "))
    })?;

    let input = AssessmentInput {
        change_type: request.change_type,
        affected_systems: request.affected_systems,
        urgency: request.urgency,
        rollback_complexity: request.rollback_complexity,
    };
    let result = scoring::assess(&input);

    let history_recorded = match state.history_service.record(user_id, &input, &result).await {
        Ok(record) => {
            tracing::debug!(
                user_id = %user_id,
                assessment_id = %record.assessment_id(),
                "Assessment recorded"
            );
            true
        }
        Err(e) => {
            tracing::warn!(user_id = %user_id, "Failed to record assessment history: {e}");
            false
        }
    };

    tracing::info!(
        user_id = %user_id,
        risk_score = result.raw_score,
        risk_level = %result.risk_level,
        history_recorded,
        "Assessment completed"
    );

    Ok((
        StatusCode::CREATED,
        Json(AssessmentResponse {
            risk_score: result.raw_score,
            risk_level: result.risk_level,
            confidence: result.confidence,
            mitigation_strategies: result.mitigation_strategies,
            history_recorded,
        }),
    ))
}

/// List the caller's assessment history, newest first.
#[utoipa::path(
    get,
    path = "/risk/assessments",
    responses(
        (status = 200, description = "Assessment history", body = HistoryResponse),
        (status = 401, description = "Authentication required"),
    ),
    security(("bearer_auth" = [])),
    tag = "Risk"
)]
pub async fn list_assessments_handler(
    State(state): State<RiskState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Json<HistoryResponse>, ApiRiskError> {
    let records = state
        .history_service
        .list(user_id, DEFAULT_HISTORY_LIMIT)
        .await?;

    let entries: Vec<HistoryEntry> = records.into_iter().map(HistoryEntry::from).collect();
    let total = entries.len();

    Ok(Json(HistoryResponse { entries, total }))
}
