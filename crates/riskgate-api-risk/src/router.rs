//! Risk assessment API router configuration.
//!
//! Configures routes for the risk endpoints:
//! - POST /assessments
//! - GET  /assessments
//!
//! Every route requires a full access token. The app layers
//! `jwt_auth_middleware` over this router, which inserts the authenticated
//! `UserId` extension the handlers extract.

use std::sync::Arc;

use axum::{routing::post, Router};

use riskgate_db::DbPool;

use crate::handlers::{create_assessment_handler, list_assessments_handler};
use crate::services::HistoryService;

/// Shared state for risk assessment routes.
#[derive(Clone)]
pub struct RiskState {
    /// Database connection pool.
    pub pool: DbPool,
    /// History persistence service.
    pub history_service: Arc<HistoryService>,
}

impl RiskState {
    pub fn new(pool: DbPool) -> Self {
        let history_service = Arc::new(HistoryService::new(pool.clone()));
        Self {
            pool,
            history_service,
        }
    }
}

/// Build the risk assessment router, nested under `/risk` by the app.
pub fn risk_router(state: RiskState) -> Router {
    Router::new()
        .route(
            "/assessments",
            post(create_assessment_handler).get(list_assessments_handler),
        )
        .with_state(state)
}
