//! telemetry/counters.rs
//! Mutable counters collected while a job runs.
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobCounters {
    /// Chunks pulled from the source (one read event each).
    pub chunks: u64,
    pub bytes_read: u64,
    /// Push calls (one write event each, excluding the drain flush).
    pub writes: u64,
    /// Bytes delivered to the sink by pushes.
    pub bytes_written: u64,
    /// Bytes delivered to the sink by the drain flush.
    pub bytes_flushed: u64,
}

impl JobCounters {
    pub fn add_read(&mut self, n: usize) {
        self.chunks += 1;
        self.bytes_read += n as u64;
    }

    pub fn add_write(&mut self, n: usize) {
        self.writes += 1;
        self.bytes_written += n as u64;
    }

    pub fn add_flush(&mut self, n: usize) {
        self.bytes_flushed += n as u64;
    }

    /// Everything the sink received, push output plus trailing flush.
    pub fn total_output(&self) -> u64 {
        self.bytes_written + self.bytes_flushed
    }
}

impl AddAssign<&JobCounters> for JobCounters {
    fn add_assign(&mut self, rhs: &JobCounters) {
        self.chunks        += rhs.chunks;
        self.bytes_read    += rhs.bytes_read;
        self.writes        += rhs.writes;
        self.bytes_written += rhs.bytes_written;
        self.bytes_flushed += rhs.bytes_flushed;
    }
}
