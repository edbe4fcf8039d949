use std::io;
use std::sync::Arc;

/// Failure taxonomy shared by jobs, crypto and the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Source or sink read/write failure.
    Io,
    /// Malformed compressed stream.
    Codec,
    /// AEAD integrity check failure.
    Authentication,
    /// Job cancelled before natural completion.
    Cancellation,
    /// Rejected configuration.
    Config,
    /// Runner thread died without reporting a terminal state.
    Runner,
}

/// Terminal failure of a streaming job.
///
/// `Clone` so the same failure can be delivered on the err channel and returned
/// from `JobHandle::wait`; I/O sources are shared behind an `Arc`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum JobError {
    #[error("I/O error during {op}: {source}")]
    Io {
        op: &'static str,
        #[source]
        source: Arc<io::Error>,
    },

    #[error("codec {codec} rejected the stream: {source}")]
    Codec {
        codec: &'static str,
        #[source]
        source: Arc<io::Error>,
    },

    #[error("job cancelled after {chunks} chunk(s)")]
    Cancelled { chunks: u64 },

    #[error("invalid job configuration: {0}")]
    Config(String),

    #[error("job runner failed: {0}")]
    Runner(String),
}

impl JobError {
    pub fn io(op: &'static str, e: io::Error) -> Self {
        JobError::Io { op, source: Arc::new(e) }
    }

    pub fn codec(codec: &'static str, e: io::Error) -> Self {
        JobError::Codec { codec, source: Arc::new(e) }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            JobError::Io { .. } => ErrorKind::Io,
            JobError::Codec { .. } => ErrorKind::Codec,
            JobError::Cancelled { .. } => ErrorKind::Cancellation,
            JobError::Config(_) => ErrorKind::Config,
            JobError::Runner(_) => ErrorKind::Runner,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, JobError::Cancelled { .. })
    }
}
