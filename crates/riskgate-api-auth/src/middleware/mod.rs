//! Middleware for the authentication API.

mod jwt_auth;

pub use jwt_auth::{jwt_auth_middleware, partial_token_middleware, JwtPublicKey};
