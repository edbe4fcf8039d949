use crate::job::ErrorKind;

/// Key sizes accepted by the supported suites.
pub const KEY_LEN_16: usize = 16;
pub const KEY_LEN_32: usize = 32;

/// Standard 12-byte nonce length for AES-GCM and ChaCha20-Poly1305.
pub const NONCE_LEN_12: usize = 12;

/// Fixed AEAD tag length (bytes).
pub const TAG_LEN: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// Key does not fit the selected cipher suite.
    #[error("invalid key length for {suite}: expected {expected}, got {actual}")]
    InvalidKeyLen {
        suite: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Key material could not be decoded.
    #[error("invalid key encoding: {0}")]
    InvalidKeyEncoding(String),

    /// No key configured in the environment.
    #[error("no key configured: set {var}")]
    MissingKey { var: &'static str },

    /// Ciphertext truncated, tampered with, or sealed under another key.
    #[error("authentication failed: {0}")]
    Authentication(&'static str),

    /// Sealing failed inside the AEAD implementation.
    #[error("encryption failed: {0}")]
    Seal(&'static str),
}

impl CryptoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CryptoError::Authentication(_) => ErrorKind::Authentication,
            CryptoError::Seal(_) => ErrorKind::Io,
            CryptoError::InvalidKeyLen { .. }
            | CryptoError::InvalidKeyEncoding(_)
            | CryptoError::MissingKey { .. } => ErrorKind::Config,
        }
    }
}
