//! Risk assessment API endpoints for riskgate.
//!
//! This crate provides the change-management risk assessment surface:
//! - POST /risk/assessments - score a proposed change and record it
//! - GET /risk/assessments - list the caller's assessment history
//!
//! Scoring itself lives in [`scoring`] and is a pure function; the HTTP
//! layer adds persistence behind row-level security.

pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod scoring;
pub mod services;

pub use error::ApiRiskError;
pub use models::{AssessmentRequest, AssessmentResponse, HistoryEntry, HistoryResponse};
pub use router::{risk_router, RiskState};
pub use scoring::{
    assess, raw_score, tier, AssessmentInput, AssessmentResult, ChangeType, RiskLevel,
    RollbackComplexity, Urgency, MITIGATION_STRATEGIES,
};
pub use services::HistoryService;
