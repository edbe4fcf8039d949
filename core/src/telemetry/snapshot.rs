//! telemetry/snapshot.rs
//! Immutable per-job summary, serializable for logs and reports.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::telemetry::counters::JobCounters;
use crate::telemetry::timers::{StageTimes, TelemetryTimer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub chunks: u64,
    pub bytes_read: u64,
    /// Total bytes the sink received, including the drain flush.
    pub bytes_written: u64,
    pub bytes_flushed: u64,
    /// `bytes_written / bytes_read`; below 1.0 when compressing well.
    pub output_ratio: f64,
    pub throughput_bytes_per_sec: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
}

impl JobSnapshot {
    pub fn from(counters: &JobCounters, timer: &TelemetryTimer) -> Self {
        let elapsed = timer.elapsed();
        let bytes_written = counters.total_output();

        let output_ratio = if counters.bytes_read > 0 {
            bytes_written as f64 / counters.bytes_read as f64
        } else {
            0.0
        };

        let throughput = if elapsed.as_secs_f64() > 0.0 {
            counters.bytes_read as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        Self {
            chunks: counters.chunks,
            bytes_read: counters.bytes_read,
            bytes_written,
            bytes_flushed: counters.bytes_flushed,
            output_ratio,
            throughput_bytes_per_sec: throughput,
            elapsed,
            stage_times: timer.stage_times().clone(),
        }
    }

    /// Stage time cannot exceed wall time, flushed bytes cannot exceed output.
    pub fn sanity_check(&self) -> bool {
        self.bytes_flushed <= self.bytes_written && self.stage_times.total() <= self.elapsed
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
