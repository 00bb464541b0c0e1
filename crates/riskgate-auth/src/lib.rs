//! # riskgate-auth
//!
//! Credential primitives for the riskgate service:
//!
//! - Argon2id password hashing with OWASP-recommended parameters
//! - RS256 JWT encoding/decoding with a claims builder
//!
//! Higher-level concerns (sessions, MFA flows, HTTP handlers) live in
//! `riskgate-api-auth`; this crate is deliberately transport-free.

mod claims;
mod error;
mod jwt;
mod password;

pub use claims::{JwtClaims, JwtClaimsBuilder, PURPOSE_MFA_VERIFICATION};
pub use error::AuthError;
pub use jwt::{decode_token, decode_token_with_config, encode_token, ValidationConfig};
pub use password::{hash_password, verify_password, PasswordHasher};
