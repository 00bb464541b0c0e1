//! Authentication API endpoints for riskgate.
//!
//! This crate provides REST API endpoints for user authentication:
//! - Signup (POST /auth/signup)
//! - Login (POST /auth/login)
//! - MFA verification (POST /auth/mfa/verify)
//! - Token refresh (POST /auth/refresh)
//! - Logout (POST /auth/logout)
//! - Session introspection (GET /auth/session)
//!
//! # Example
//!
//! ```rust,ignore
//! use riskgate_api_auth::router::auth_router;
//! use axum::Router;
//!
//! let app = Router::new()
//!     .nest("/auth", auth_router(state));
//! ```

pub mod crypto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod router;
pub mod services;

pub use crypto::{TotpEncryption, TotpEncryptionError};
pub use error::{ApiAuthError, ProblemDetails};
pub use middleware::{jwt_auth_middleware, partial_token_middleware, JwtPublicKey};
pub use models::{
    EnrollmentPayload, LoginRequest, LoginResponse, LogoutRequest, MfaEnrollmentResponse,
    MfaRequiredResponse, MfaVerifyRequest, RefreshRequest, SessionResponse, SignupRequest,
    SignupResponse, TokenResponse,
};
pub use router::{auth_router, AuthState};
pub use services::{
    generate_secure_token, hash_token, normalize_email, AuthService, FactorList, MfaLoginFlow,
    MfaService, SessionEvent, SessionEvents, TokenConfig, TokenService,
};
