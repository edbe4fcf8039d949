use serde::{Deserialize, Serialize};

use crate::constants::{env_vars, DEFAULT_CHUNK_SIZE, DEFAULT_QUEUE_DEPTH, MAX_CHUNK_SIZE};
use crate::job::JobError;

/// Sizing for a single streaming job.
///
/// - `chunk_size`: bytes per transform operation. Smaller chunks give finer progress
///   at the cost of more scheduling and per-event overhead.
/// - `queue_depth`: progress events buffered per channel before the runner blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JobConfig {
    pub chunk_size: usize,
    pub queue_depth: usize,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            queue_depth: DEFAULT_QUEUE_DEPTH,
        }
    }
}

impl JobConfig {
    pub fn new(chunk_size: usize, queue_depth: usize) -> Self {
        Self { chunk_size, queue_depth }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_queue_depth(mut self, queue_depth: usize) -> Self {
        self.queue_depth = queue_depth;
        self
    }

    pub fn validate(&self) -> Result<(), JobError> {
        if self.chunk_size == 0 || self.chunk_size > MAX_CHUNK_SIZE {
            return Err(JobError::Config(format!(
                "chunkSize must be in 1..={MAX_CHUNK_SIZE}, got {}",
                self.chunk_size
            )));
        }
        if self.queue_depth == 0 {
            return Err(JobError::Config("queueDepth must be at least 1".into()));
        }
        Ok(())
    }

    /// Chunks a job can finish with nobody draining its progress channels.
    ///
    /// Every chunk costs one slot on each progress channel and the drain flush costs
    /// one more write slot, so a source of at most this many chunks completes unobserved.
    pub fn in_flight_chunks(&self) -> usize {
        self.queue_depth.saturating_sub(1)
    }

    /// Overlay `STREAMJOB_CHUNK_SIZE` / `STREAMJOB_QUEUE_DEPTH` on the defaults.
    pub fn from_env() -> Result<Self, JobError> {
        let mut config = Self::default();
        if let Some(v) = read_usize_var(env_vars::CHUNK_SIZE)? {
            config.chunk_size = v;
        }
        if let Some(v) = read_usize_var(env_vars::QUEUE_DEPTH)? {
            config.queue_depth = v;
        }
        config.validate()?;
        Ok(config)
    }
}

fn read_usize_var(name: &str) -> Result<Option<usize>, JobError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|e| JobError::Config(format!("{name}={raw:?}: {e}"))),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(JobError::Config(format!("{name}: {e}"))),
    }
}
