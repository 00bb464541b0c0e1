//! Request and response DTOs for the authentication API.

mod requests;
mod responses;

pub use requests::{LoginRequest, LogoutRequest, MfaVerifyRequest, RefreshRequest, SignupRequest};
pub use responses::{
    EnrollmentPayload, LoginResponse, MfaEnrollmentResponse, MfaRequiredResponse, SessionResponse,
    SignupResponse, TokenResponse,
};
