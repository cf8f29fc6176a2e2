//! Reversible field encryption
//!
//! AES-256-GCM with a random 96-bit nonce per value. The stored text is
//! URL-safe base64 of `nonce || ciphertext || tag`, so any change to the
//! stored value fails authentication on decrypt.
//!
//! One key is loaded per process from `security.encryption_key` and never
//! rotated.

use crate::config::schema::SecurityConfig;
use crate::domain::{CarevaultError, Result};
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use secrecy::ExposeSecret;
use std::fmt;
use zeroize::Zeroizing;

const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;

/// Development key used when no key is configured
///
/// Refused in production by configuration validation.
pub const DEVELOPMENT_KEY: &str = "8cozhW9kSi6zJQw3xLvMp_6T3Nq3qjWPHvXFnwi4IxE=";

/// Encrypts and decrypts patient identity fields
#[derive(Clone)]
pub struct FieldCipher {
    cipher: Aes256Gcm,
}

impl FieldCipher {
    /// Build the cipher from a base64 key (URL-safe or standard alphabet)
    ///
    /// # Errors
    ///
    /// Returns [`CarevaultError::Configuration`] if the key is not base64 or
    /// does not decode to 32 bytes.
    pub fn from_base64_key(encoded: &str) -> Result<Self> {
        let encoded = encoded.trim();
        let bytes = URL_SAFE
            .decode(encoded)
            .or_else(|_| STANDARD.decode(encoded))
            .map(Zeroizing::new)
            .map_err(|_| {
                CarevaultError::Configuration("Encryption key is not valid base64".to_string())
            })?;

        if bytes.len() != KEY_LEN {
            return Err(CarevaultError::Configuration(format!(
                "Encryption key must decode to {KEY_LEN} bytes, got {}",
                bytes.len()
            )));
        }

        let cipher = Aes256Gcm::new_from_slice(&bytes).map_err(|_| {
            CarevaultError::Configuration("Encryption key has invalid length".to_string())
        })?;
        Ok(Self { cipher })
    }

    /// Build the cipher from configuration, falling back to [`DEVELOPMENT_KEY`]
    pub fn from_config(config: &SecurityConfig) -> Result<Self> {
        match &config.encryption_key {
            Some(key) => Self::from_base64_key(key.expose_secret().as_ref()),
            None => {
                tracing::warn!(
                    "No security.encryption_key configured; using the development key"
                );
                Self::from_base64_key(DEVELOPMENT_KEY)
            }
        }
    }

    /// Encrypt a value
    ///
    /// Every call uses a fresh nonce, so equal plaintexts produce different
    /// ciphertexts.
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| CarevaultError::Other("Field encryption failed".to_string()))?;

        let mut payload = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        payload.extend_from_slice(&nonce_bytes);
        payload.extend_from_slice(&ciphertext);
        Ok(URL_SAFE.encode(payload))
    }

    /// Decrypt a value produced by [`FieldCipher::encrypt`]
    ///
    /// # Errors
    ///
    /// Returns [`CarevaultError::Decode`] if the text is not base64, is too
    /// short, fails authentication or is not UTF-8.
    pub fn decrypt(&self, encoded: &str) -> Result<String> {
        let payload = URL_SAFE
            .decode(encoded)
            .map_err(|_| CarevaultError::Decode("ciphertext is not valid base64".to_string()))?;

        if payload.len() < NONCE_LEN {
            return Err(CarevaultError::Decode("ciphertext is too short".to_string()));
        }

        let (nonce_bytes, ciphertext) = payload.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| CarevaultError::Decode("ciphertext failed authentication".to_string()))?;

        String::from_utf8(plaintext)
            .map_err(|_| CarevaultError::Decode("plaintext is not valid UTF-8".to_string()))
    }
}

impl fmt::Debug for FieldCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldCipher").field("key", &"[REDACTED]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use proptest::prelude::*;

    fn cipher() -> FieldCipher {
        FieldCipher::from_base64_key(DEVELOPMENT_KEY).unwrap()
    }

    #[test]
    fn test_round_trip() {
        let c = cipher();
        for value in ["", "Jane Roe", "+33 6 12 34 56 78", "Zoë Ñúñez 李雷"] {
            let encrypted = c.encrypt(value).unwrap();
            assert_ne!(encrypted, value);
            assert_eq!(c.decrypt(&encrypted).unwrap(), value);
        }
    }

    #[test]
    fn test_nonce_varies() {
        let c = cipher();
        assert_ne!(c.encrypt("same").unwrap(), c.encrypt("same").unwrap());
    }

    #[test]
    fn test_tampering_detected() {
        let c = cipher();
        let mut payload = URL_SAFE.decode(c.encrypt("Jane Roe").unwrap()).unwrap();
        let last = payload.len() - 1;
        payload[last] ^= 0x01;

        let err = c.decrypt(&URL_SAFE.encode(payload)).unwrap_err();
        assert!(matches!(err, CarevaultError::Decode(_)));
    }

    proptest! {
        #[test]
        fn prop_any_flipped_byte_detected(index in any::<usize>(), flip in 1u8..=255) {
            let c = cipher();
            let encrypted = c.encrypt("Jane Roe, 555-123-4567").unwrap();
            let mut payload = URL_SAFE.decode(encrypted).unwrap();
            let index = index % payload.len();
            payload[index] ^= flip;

            let result = c.decrypt(&URL_SAFE.encode(payload));
            prop_assert!(matches!(result, Err(CarevaultError::Decode(_))));
        }
    }

    #[test]
    fn test_garbage_input() {
        let c = cipher();
        assert!(matches!(c.decrypt("not base64!"), Err(CarevaultError::Decode(_))));
        assert!(matches!(c.decrypt("AAAA"), Err(CarevaultError::Decode(_))));
    }

    #[test]
    fn test_wrong_key_fails() {
        let other = FieldCipher::from_base64_key(&STANDARD.encode([7u8; 32])).unwrap();
        let encrypted = cipher().encrypt("secret").unwrap();
        assert!(matches!(other.decrypt(&encrypted), Err(CarevaultError::Decode(_))));
    }

    #[test]
    fn test_key_validation() {
        assert!(matches!(
            FieldCipher::from_base64_key("c2hvcnQ="),
            Err(CarevaultError::Configuration(_))
        ));
        assert!(matches!(
            FieldCipher::from_base64_key("%%%"),
            Err(CarevaultError::Configuration(_))
        ));
    }

    #[test]
    fn test_from_config() {
        let config = SecurityConfig {
            encryption_key: Some(secret_string(STANDARD.encode([3u8; 32]))),
        };
        assert!(FieldCipher::from_config(&config).is_ok());
        assert!(FieldCipher::from_config(&SecurityConfig::default()).is_ok());
    }

    #[test]
    fn test_debug_redacts_key() {
        assert!(!format!("{:?}", cipher()).contains("8coz"));
    }
}
