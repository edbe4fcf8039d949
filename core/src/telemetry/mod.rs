//! telemetry/mod.rs
//! Per-job counters, stage timers and immutable snapshots.
//!
//! Notes:
//! - Counters are owned by the runner thread; no atomics or locks.
//! - The snapshot is taken once, after finalization, and returned in `JobReport`.

pub mod counters;
pub mod timers;
pub mod snapshot;

pub use counters::*;
pub use timers::*;
pub use snapshot::*;
