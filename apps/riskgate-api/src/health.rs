//! Health and readiness endpoints.

use std::time::Duration;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde::Serialize;
use tokio::time::timeout;
use utoipa::ToSchema;

use crate::state::AppState;

/// How long to wait for the database ping before reporting it down.
const DB_CHECK_TIMEOUT: Duration = Duration::from_secs(2);

/// Overall service status.
#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
    Degraded,
}

/// Database connectivity status.
#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseStatus {
    Up,
    Down,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: ServiceStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub database: DatabaseStatus,
    pub timestamp: String,
}

async fn check_database(state: &AppState) -> DatabaseStatus {
    let ping = sqlx::query("SELECT 1").execute(state.db.inner());
    match timeout(DB_CHECK_TIMEOUT, ping).await {
        Ok(Ok(_)) => DatabaseStatus::Up,
        Ok(Err(e)) => {
            tracing::warn!("Database health check failed: {e}");
            DatabaseStatus::Down
        }
        Err(_) => {
            tracing::warn!("Database health check timed out");
            DatabaseStatus::Down
        }
    }
}

/// Full health check with database connectivity.
///
/// Returns 200 with `status: degraded` when the database is unreachable, so
/// monitoring can distinguish a degraded service from a dead one.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service health report", body = HealthResponse),
    ),
    tag = "Health"
)]
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = check_database(&state).await;
    let status = match database {
        DatabaseStatus::Up => ServiceStatus::Healthy,
        DatabaseStatus::Down => ServiceStatus::Degraded,
    };

    Json(HealthResponse {
        status,
        version: state.version.to_string(),
        uptime_seconds: state.uptime_seconds(),
        database,
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Liveness probe. Always 200 while the process is running.
#[utoipa::path(
    get,
    path = "/livez",
    responses((status = 200, description = "Process is alive")),
    tag = "Health"
)]
pub async fn livez_handler() -> impl IntoResponse {
    StatusCode::OK
}

/// Readiness probe.
///
/// Returns 503 during shutdown or when the database is unreachable, telling
/// the load balancer to stop routing traffic here.
#[utoipa::path(
    get,
    path = "/readyz",
    responses(
        (status = 200, description = "Ready to serve traffic"),
        (status = 503, description = "Draining or database unreachable"),
    ),
    tag = "Health"
)]
pub async fn readyz_handler(State(state): State<AppState>) -> impl IntoResponse {
    if state.is_shutting_down() {
        return StatusCode::SERVICE_UNAVAILABLE;
    }
    match check_database(&state).await {
        DatabaseStatus::Up => StatusCode::OK,
        DatabaseStatus::Down => StatusCode::SERVICE_UNAVAILABLE,
    }
}
