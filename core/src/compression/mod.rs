//! compression/mod.rs
//! gzip transforms for streaming jobs.
//!
//! Notes:
//! - Both directions write through a `CountingWriter`, so write progress reports
//!   bytes that actually reached the sink, not bytes handed to the codec.
//! - The encoder buffers internally; most of a small stream arrives on the drain flush.

pub mod gzip;
pub mod types;

pub use gzip::*;
pub use types::*;
