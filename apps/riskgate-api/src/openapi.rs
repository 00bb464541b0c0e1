//! `OpenAPI` documentation and Swagger UI configuration.

use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::health::{DatabaseStatus, HealthResponse, ServiceStatus};
use crate::state::AppState;

/// Security scheme modifier for Bearer authentication.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// `OpenAPI` documentation for the riskgate API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "riskgate API",
        version = "0.1.0",
        description = "Change-management risk assessment service with MFA-protected accounts"
    ),
    servers(
        (url = "http://localhost:8080", description = "Development server")
    ),
    modifiers(&SecurityAddon),
    paths(
        crate::health::health_handler,
        crate::health::livez_handler,
        crate::health::readyz_handler,
        riskgate_api_auth::handlers::signup::signup_handler,
        riskgate_api_auth::handlers::login::login_handler,
        riskgate_api_auth::handlers::mfa_verify::mfa_verify_handler,
        riskgate_api_auth::handlers::refresh::refresh_handler,
        riskgate_api_auth::handlers::logout::logout_handler,
        riskgate_api_auth::handlers::session::session_handler,
        riskgate_api_risk::handlers::assessments::create_assessment_handler,
        riskgate_api_risk::handlers::assessments::list_assessments_handler,
    ),
    components(schemas(
        HealthResponse,
        ServiceStatus,
        DatabaseStatus,
        riskgate_api_auth::SignupRequest,
        riskgate_api_auth::SignupResponse,
        riskgate_api_auth::LoginRequest,
        riskgate_api_auth::TokenResponse,
        riskgate_api_auth::MfaRequiredResponse,
        riskgate_api_auth::MfaEnrollmentResponse,
        riskgate_api_auth::EnrollmentPayload,
        riskgate_api_auth::MfaVerifyRequest,
        riskgate_api_auth::RefreshRequest,
        riskgate_api_auth::LogoutRequest,
        riskgate_api_auth::SessionResponse,
        riskgate_api_auth::ProblemDetails,
        riskgate_api_risk::AssessmentRequest,
        riskgate_api_risk::AssessmentResponse,
        riskgate_api_risk::HistoryEntry,
        riskgate_api_risk::HistoryResponse,
        riskgate_api_risk::ChangeType,
        riskgate_api_risk::Urgency,
        riskgate_api_risk::RollbackComplexity,
        riskgate_api_risk::RiskLevel,
    )),
    tags(
        (name = "Health", description = "Service health and status"),
        (name = "Authentication", description = "Signup, login, MFA verification, sessions"),
        (name = "Risk", description = "Change risk assessment and history"),
    )
)]
pub struct ApiDoc;

/// Swagger UI routes serving the interactive documentation.
pub fn swagger_routes() -> Router<AppState> {
    Router::new().merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_generates() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string(&spec).unwrap();
        assert!(json.contains("/auth/login"));
        assert!(json.contains("/risk/assessments"));
        assert!(json.contains("/health"));
    }
}
