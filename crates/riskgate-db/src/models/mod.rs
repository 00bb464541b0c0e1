//! Entity models for the riskgate database.

mod mfa_challenge;
mod risk_assessment;
mod session;
mod totp_factor;
mod user;

pub use mfa_challenge::{CreateMfaChallenge, MfaChallenge};
pub use risk_assessment::{CreateRiskAssessment, RiskAssessmentRecord};
pub use session::{CreateSession, Session};
pub use totp_factor::{CreateTotpFactor, FactorStatus, TotpFactor};
pub use user::{CreateUser, User};
