//! Cryptographic helpers for the authentication API.

mod totp_encryption;

pub use totp_encryption::{TotpEncryption, TotpEncryptionError};
