//! streamjob-core
//!
//! Observable, cancellable, backpressured streaming transform jobs.
//! A job drives a chunked byte transform (gzip compress/decompress) on its own
//! thread and reports progress, completion and failure over bounded channels.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;

pub mod compression;
pub mod crypto;
pub mod telemetry;

// Job layer
pub mod job;

pub mod pipeline;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::compression::{gunzip, gzip, GzipCompress, GzipDecompress};
    pub use crate::crypto::{decrypt, encrypt, CipherConfig, CipherSuite, CryptoError};
    pub use crate::job::{
        CancelToken, ChunkTransform, ErrorKind, JobConfig, JobError, JobHandle, JobReport,
        Observation, Observer, StreamJob, Terminal,
    };
    pub use crate::pipeline::{run_pipeline, PipelineReport};
    pub use crate::types::PipelineError;
}
