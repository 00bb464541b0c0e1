//! TOTP secret encryption using AES-256-GCM.
//!
//! TOTP shared secrets are never stored in plaintext; each secret is
//! encrypted with a service-wide key and a per-row random nonce.

use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use rand::RngCore;
use thiserror::Error;

/// Size of the AES-256 key in bytes.
const KEY_SIZE: usize = 32;

/// Size of the GCM nonce (IV) in bytes.
const NONCE_SIZE: usize = 12;

/// Errors that can occur during TOTP encryption operations.
#[derive(Debug, Error)]
pub enum TotpEncryptionError {
    #[error("Encryption key not configured (MFA_ENCRYPTION_KEY environment variable)")]
    KeyNotConfigured,

    #[error("Invalid encryption key length: expected {KEY_SIZE} bytes, got {0}")]
    InvalidKeyLength(usize),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Invalid IV length: expected {NONCE_SIZE} bytes, got {0}")]
    InvalidIvLength(usize),

    #[error("Invalid key format: {0}")]
    InvalidKeyFormat(String),
}

/// Handles encryption and decryption of TOTP secrets.
///
/// Uses AES-256-GCM for authenticated encryption.
#[derive(Clone)]
pub struct TotpEncryption {
    cipher: Aes256Gcm,
}

impl TotpEncryption {
    /// Create a new instance from the `MFA_ENCRYPTION_KEY` environment variable.
    ///
    /// The key must be exactly 32 bytes (256 bits), provided as a hex-encoded string.
    pub fn from_env() -> Result<Self, TotpEncryptionError> {
        let key_hex = std::env::var("MFA_ENCRYPTION_KEY")
            .map_err(|_| TotpEncryptionError::KeyNotConfigured)?;

        Self::from_hex_key(&key_hex)
    }

    /// Create a new instance from a hex-encoded key string.
    pub fn from_hex_key(key_hex: &str) -> Result<Self, TotpEncryptionError> {
        let key_bytes = hex::decode(key_hex.trim())
            .map_err(|e| TotpEncryptionError::InvalidKeyFormat(e.to_string()))?;

        Self::from_key(&key_bytes)
    }

    /// Create a new instance from raw key bytes.
    pub fn from_key(key: &[u8]) -> Result<Self, TotpEncryptionError> {
        if key.len() != KEY_SIZE {
            return Err(TotpEncryptionError::InvalidKeyLength(key.len()));
        }

        let cipher = Aes256Gcm::new_from_slice(key)
            .map_err(|e| TotpEncryptionError::InvalidKeyFormat(e.to_string()))?;

        Ok(Self { cipher })
    }

    /// Encrypt a TOTP secret.
    ///
    /// Returns (ciphertext, iv) tuple.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<(Vec<u8>, Vec<u8>), TotpEncryptionError> {
        let mut iv = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut iv);
        let nonce = Nonce::from_slice(&iv);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext)
            .map_err(|e| TotpEncryptionError::EncryptionFailed(e.to_string()))?;

        Ok((ciphertext, iv.to_vec()))
    }

    /// Decrypt a TOTP secret.
    pub fn decrypt(&self, ciphertext: &[u8], iv: &[u8]) -> Result<Vec<u8>, TotpEncryptionError> {
        if iv.len() != NONCE_SIZE {
            return Err(TotpEncryptionError::InvalidIvLength(iv.len()));
        }

        let nonce = Nonce::from_slice(iv);

        let plaintext = self
            .cipher
            .decrypt(nonce, ciphertext)
            .map_err(|e| TotpEncryptionError::DecryptionFailed(e.to_string()))?;

        Ok(plaintext)
    }

    /// Generate a new random encryption key (for initial setup).
    #[must_use]
    pub fn generate_key() -> String {
        let mut key = [0u8; KEY_SIZE];
        OsRng.fill_bytes(&mut key);
        hex::encode(key)
    }
}

impl std::fmt::Debug for TotpEncryption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TotpEncryption")
            .field("cipher", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> Vec<u8> {
        (0u8..32).collect()
    }

    #[test]
    fn test_encrypt_decrypt_round_trip() {
        let enc = TotpEncryption::from_key(&test_key()).unwrap();
        let secret = b"supersecrettotpkey12";

        let (ciphertext, iv) = enc.encrypt(secret).unwrap();
        assert_ne!(ciphertext, secret.to_vec());
        assert_eq!(iv.len(), NONCE_SIZE);

        let decrypted = enc.decrypt(&ciphertext, &iv).unwrap();
        assert_eq!(decrypted, secret.to_vec());
    }

    #[test]
    fn test_encrypt_produces_unique_iv() {
        let enc = TotpEncryption::from_key(&test_key()).unwrap();
        let (_, iv1) = enc.encrypt(b"secret").unwrap();
        let (_, iv2) = enc.encrypt(b"secret").unwrap();
        assert_ne!(iv1, iv2);
    }

    #[test]
    fn test_decrypt_rejects_tampered_ciphertext() {
        let enc = TotpEncryption::from_key(&test_key()).unwrap();
        let (mut ciphertext, iv) = enc.encrypt(b"secret").unwrap();
        ciphertext[0] ^= 0xff;
        assert!(enc.decrypt(&ciphertext, &iv).is_err());
    }

    #[test]
    fn test_invalid_key_length() {
        let result = TotpEncryption::from_key(&[0u8; 16]);
        assert!(matches!(
            result,
            Err(TotpEncryptionError::InvalidKeyLength(16))
        ));
    }

    #[test]
    fn test_invalid_iv_length() {
        let enc = TotpEncryption::from_key(&test_key()).unwrap();
        let (ciphertext, _) = enc.encrypt(b"secret").unwrap();
        let result = enc.decrypt(&ciphertext, &[0u8; 4]);
        assert!(matches!(
            result,
            Err(TotpEncryptionError::InvalidIvLength(4))
        ));
    }

    #[test]
    fn test_generate_key_is_valid_hex() {
        let key_hex = TotpEncryption::generate_key();
        assert_eq!(key_hex.len(), KEY_SIZE * 2);
        assert!(TotpEncryption::from_hex_key(&key_hex).is_ok());
    }
}
