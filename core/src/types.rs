use crate::crypto::CryptoError;
use crate::job::{ErrorKind, JobError};

/// Unified error for the compress → encrypt → decrypt → decompress pipeline.
/// `From` impls let `?` cross module boundaries.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A streaming job failed (I/O, codec, cancellation).
    #[error("job error: {0}")]
    Job(#[from] JobError),

    /// Key setup or authentication failure.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// End-to-end check failed.
    #[error("validation error: {0}")]
    Validation(String),
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Job(e) => e.kind(),
            PipelineError::Crypto(e) => e.kind(),
            PipelineError::Validation(_) => ErrorKind::Codec,
        }
    }
}
