//! Request and response types for the risk assessment API.

use chrono::{DateTime, Utc};
use riskgate_db::models::RiskAssessmentRecord;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::scoring::{ChangeType, RiskLevel, RollbackComplexity, Urgency};

/// Request to assess a proposed change.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AssessmentRequest {
    pub change_type: ChangeType,
    /// Number of systems touched by the change. Must be at least 1; the
    /// upper bound keeps the value representable in the history table's
    /// integer column.
    #[validate(range(min = 1, max = 2_147_483_647))]
    pub affected_systems: u32,
    pub urgency: Urgency,
    pub rollback_complexity: RollbackComplexity,
}

/// Result of a risk assessment.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AssessmentResponse {
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    pub confidence: f64,
    pub mitigation_strategies: Vec<String>,
    /// Whether the assessment was persisted to the caller's history.
    /// A failed write never blocks the assessment itself.
    pub history_recorded: bool,
}

/// A single persisted assessment.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HistoryEntry {
    #[schema(value_type = String, format = "uuid")]
    pub id: uuid::Uuid,
    pub change_type: String,
    pub affected_systems: i32,
    pub urgency: String,
    pub rollback_complexity: String,
    pub risk_score: i32,
    pub risk_level: String,
    pub confidence: f64,
    pub mitigation_strategies: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<RiskAssessmentRecord> for HistoryEntry {
    fn from(record: RiskAssessmentRecord) -> Self {
        Self {
            id: record.id,
            change_type: record.change_type,
            affected_systems: record.affected_systems,
            urgency: record.urgency,
            rollback_complexity: record.rollback_complexity,
            risk_score: record.risk_score,
            risk_level: record.risk_level,
            confidence: record.confidence,
            mitigation_strategies: record.mitigation_strategies,
            created_at: record.created_at,
        }
    }
}

/// The caller's assessment history, newest first.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HistoryResponse {
    pub entries: Vec<HistoryEntry>,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_deserializes_wire_format() {
        let json = r#"{
            "change_type": "server-migration",
            "affected_systems": 3,
            "urgency": "high",
            "rollback_complexity": "medium"
        }"#;
        let req: AssessmentRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.change_type, ChangeType::ServerMigration);
        assert_eq!(req.affected_systems, 3);
        assert_eq!(req.urgency, Urgency::High);
        assert_eq!(req.rollback_complexity, RollbackComplexity::Medium);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_zero_affected_systems_rejected() {
        let req = AssessmentRequest {
            change_type: ChangeType::SoftwareUpdate,
            affected_systems: 0,
            urgency: Urgency::Low,
            rollback_complexity: RollbackComplexity::Easy,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_affected_systems_above_i32_max_rejected() {
        let req = AssessmentRequest {
            change_type: ChangeType::ServerMigration,
            affected_systems: 3_000_000_000,
            urgency: Urgency::High,
            rollback_complexity: RollbackComplexity::Hard,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_affected_systems_at_i32_max_accepted() {
        let req = AssessmentRequest {
            change_type: ChangeType::ServerMigration,
            affected_systems: i32::MAX as u32,
            urgency: Urgency::High,
            rollback_complexity: RollbackComplexity::Hard,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_unknown_change_type_fails_deserialization() {
        let json = r#"{
            "change_type": "firmware-flash",
            "affected_systems": 1,
            "urgency": "low",
            "rollback_complexity": "easy"
        }"#;
        assert!(serde_json::from_str::<AssessmentRequest>(json).is_err());
    }

    #[test]
    fn test_response_serializes_history_flag() {
        let response = AssessmentResponse {
            risk_score: 9,
            risk_level: RiskLevel::High,
            confidence: 88.5,
            mitigation_strategies: vec!["Back up first".to_string()],
            history_recorded: false,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["risk_level"], "High");
        assert_eq!(json["history_recorded"], false);
    }
}
