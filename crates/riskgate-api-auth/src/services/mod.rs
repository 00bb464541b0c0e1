//! Services for the authentication API.

mod auth_service;
mod mfa_flow;
mod mfa_service;
mod session_events;
mod token_service;
mod validation;

pub use auth_service::AuthService;
pub use mfa_flow::{InvalidTransition, MfaLoginFlow};
pub use mfa_service::{
    EnrollmentData, FactorList, MfaService, CHALLENGE_VALIDITY_MINUTES, LOCKOUT_MINUTES,
    MAX_FAILED_ATTEMPTS,
};
pub use session_events::{SessionEvent, SessionEvents};
pub use token_service::{
    generate_secure_token, hash_token, verify_token_hash_constant_time, IssuedTokens, TokenConfig,
    TokenService, ACCESS_TOKEN_VALIDITY_MINUTES, PARTIAL_TOKEN_VALIDITY_SECONDS,
    REFRESH_TOKEN_VALIDITY_DAYS,
};
pub use validation::{
    normalize_email, validate_password_complexity, PasswordValidationError, MAX_PASSWORD_LENGTH,
    MIN_PASSWORD_LENGTH,
};
