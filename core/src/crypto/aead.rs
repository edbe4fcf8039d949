//! crypto/aead.rs
//! One-shot AEAD seal/open with a nonce-prepended wire format.
//!
//! Wire format: `[nonce (12 bytes)][ciphertext ‖ tag (16 bytes)]`, no length prefix.
//!
//! Design notes:
//! - The nonce is drawn from the OS RNG on every call; keys are never reused with a
//!   counter, so there is no nonce state to persist.
//! - Tag verification fails closed: no partial plaintext is ever returned.
//! - Keys live in an explicit `CipherConfig`; there is no process-wide default key.

use std::fmt;

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes128Gcm, Aes256Gcm, Nonce};
use chacha20poly1305::ChaCha20Poly1305;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::constants::env_vars;
use crate::crypto::types::{CryptoError, KEY_LEN_16, KEY_LEN_32, NONCE_LEN_12, TAG_LEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherSuite {
    Aes128Gcm,
    Aes256Gcm,
    ChaCha20Poly1305,
}

impl CipherSuite {
    pub fn key_len(self) -> usize {
        match self {
            CipherSuite::Aes128Gcm => KEY_LEN_16,
            CipherSuite::Aes256Gcm | CipherSuite::ChaCha20Poly1305 => KEY_LEN_32,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CipherSuite::Aes128Gcm => "AES-128-GCM",
            CipherSuite::Aes256Gcm => "AES-256-GCM",
            CipherSuite::ChaCha20Poly1305 => "ChaCha20-Poly1305",
        }
    }
}

impl fmt::Display for CipherSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Cipher suite plus key, built once by the caller and passed by reference.
#[derive(Clone)]
pub struct CipherConfig {
    suite: CipherSuite,
    key: Vec<u8>,
}

impl fmt::Debug for CipherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherConfig")
            .field("suite", &self.suite)
            .field("key", &"<redacted>")
            .finish()
    }
}

impl CipherConfig {
    pub fn new(suite: CipherSuite, key: &[u8]) -> Result<Self, CryptoError> {
        if key.len() != suite.key_len() {
            return Err(CryptoError::InvalidKeyLen {
                suite: suite.name(),
                expected: suite.key_len(),
                actual: key.len(),
            });
        }
        Ok(Self { suite, key: key.to_vec() })
    }

    /// AES-GCM with the key size picked from the key length (16 or 32 bytes).
    pub fn from_key(key: &[u8]) -> Result<Self, CryptoError> {
        match key.len() {
            KEY_LEN_16 => Self::new(CipherSuite::Aes128Gcm, key),
            _ => Self::new(CipherSuite::Aes256Gcm, key),
        }
    }

    pub fn from_hex(hex_key: &str) -> Result<Self, CryptoError> {
        let key = hex::decode(hex_key.trim())
            .map_err(|e| CryptoError::InvalidKeyEncoding(e.to_string()))?;
        Self::from_key(&key)
    }

    /// Hex key from `STREAMJOB_KEY`. A missing variable is an error, not a fallback.
    pub fn from_env() -> Result<Self, CryptoError> {
        match std::env::var(env_vars::KEY) {
            Ok(v) if !v.trim().is_empty() => Self::from_hex(&v),
            _ => Err(CryptoError::MissingKey { var: env_vars::KEY }),
        }
    }

    /// Fresh random key for `suite`.
    pub fn generate(suite: CipherSuite) -> Self {
        let mut key = vec![0u8; suite.key_len()];
        OsRng.fill_bytes(&mut key);
        Self { suite, key }
    }

    pub fn suite(&self) -> CipherSuite {
        self.suite
    }

    fn cipher(&self) -> Result<AeadImpl, CryptoError> {
        let bad_len = |_| CryptoError::InvalidKeyLen {
            suite: self.suite.name(),
            expected: self.suite.key_len(),
            actual: self.key.len(),
        };
        Ok(match self.suite {
            CipherSuite::Aes128Gcm => AeadImpl::Aes128(Aes128Gcm::new_from_slice(&self.key).map_err(bad_len)?),
            CipherSuite::Aes256Gcm => AeadImpl::Aes256(Aes256Gcm::new_from_slice(&self.key).map_err(bad_len)?),
            CipherSuite::ChaCha20Poly1305 => {
                AeadImpl::ChaCha(ChaCha20Poly1305::new_from_slice(&self.key).map_err(bad_len)?)
            }
        })
    }
}

enum AeadImpl {
    Aes128(Aes128Gcm),
    Aes256(Aes256Gcm),
    ChaCha(ChaCha20Poly1305),
}

impl AeadImpl {
    fn seal(&self, nonce: &[u8; NONCE_LEN_12], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let nonce = Nonce::from_slice(nonce);
        let sealed = match self {
            AeadImpl::Aes128(c) => c.encrypt(nonce, plaintext),
            AeadImpl::Aes256(c) => c.encrypt(nonce, plaintext),
            AeadImpl::ChaCha(c) => c.encrypt(nonce, plaintext),
        };
        sealed.map_err(|_| CryptoError::Seal("AEAD seal failed"))
    }

    fn open(&self, nonce: &[u8], sealed: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let nonce = Nonce::from_slice(nonce);
        let opened = match self {
            AeadImpl::Aes128(c) => c.decrypt(nonce, sealed),
            AeadImpl::Aes256(c) => c.decrypt(nonce, sealed),
            AeadImpl::ChaCha(c) => c.decrypt(nonce, sealed),
        };
        opened.map_err(|_| CryptoError::Authentication("AEAD tag mismatch"))
    }
}

/// Seal `plaintext` under a fresh random nonce; returns `nonce ‖ ciphertext ‖ tag`.
pub fn encrypt(config: &CipherConfig, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = config.cipher()?;

    let mut nonce = [0u8; NONCE_LEN_12];
    OsRng.fill_bytes(&mut nonce);

    let sealed = cipher.seal(&nonce, plaintext)?;
    let mut out = Vec::with_capacity(NONCE_LEN_12 + sealed.len());
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&sealed);

    tracing::trace!(suite = %config.suite, plaintext = plaintext.len(), ciphertext = out.len(), "sealed");
    Ok(out)
}

/// Open a `nonce ‖ ciphertext ‖ tag` buffer produced by [`encrypt`].
pub fn decrypt(config: &CipherConfig, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if ciphertext.len() < NONCE_LEN_12 + TAG_LEN {
        return Err(CryptoError::Authentication("ciphertext shorter than nonce and tag"));
    }
    let cipher = config.cipher()?;

    let (nonce, sealed) = ciphertext.split_at(NONCE_LEN_12);
    let plaintext = cipher.open(nonce, sealed)?;

    tracing::trace!(suite = %config.suite, ciphertext = ciphertext.len(), plaintext = plaintext.len(), "opened");
    Ok(plaintext)
}
