//! HTTP handlers for the authentication API.

pub mod login;
pub mod logout;
pub mod mfa_verify;
pub mod refresh;
pub mod session;
pub mod signup;

pub use login::login_handler;
pub use logout::logout_handler;
pub use mfa_verify::mfa_verify_handler;
pub use refresh::refresh_handler;
pub use session::session_handler;
pub use signup::signup_handler;
