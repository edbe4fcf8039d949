//! job: single-producer streaming transform jobs.
//!
//! A job owns one source, one chunked transform and one sink. The runner thread is
//! the only writer to the four job channels:
//!
//! - `bytes_read`: one event per chunk pulled from the source
//! - `bytes_written`: one event per push, plus one for the drain flush
//! - `done`: exactly one `bool` (true on success)
//! - `err`: exactly one [`Terminal`] (`Completed` doubles as the end-of-stream marker)
//!
//! Progress channels are bounded by `JobConfig::queue_depth`. When nobody drains them
//! the runner blocks on the full queue: a caller that neither observes progress nor
//! calls [`JobHandle::discard_progress`] stalls the job once
//! [`JobConfig::in_flight_chunks`] chunks have been processed.

pub mod adapter;
pub mod cancel;
pub mod config;
pub mod error;
pub mod handle;
pub mod observer;
pub mod runner;

pub use adapter::{ChunkTransform, Pull, TransformAdapter};
pub use cancel::CancelToken;
pub use config::JobConfig;
pub use error::{ErrorKind, JobError};
pub use handle::{JobHandle, JobReport, Terminal};
pub use observer::{Observation, Observer, ObserverHandle};
pub use runner::StreamJob;
