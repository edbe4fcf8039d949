//! telemetry/timers.rs
//! Stage timers for the job loop.

use std::collections::{hash_map, HashMap};
use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Where a runner thread spends its time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Pulling chunks from the source.
    Read,
    /// Codec work inside `push`.
    Transform,
    /// Draining the codec at end of input.
    Flush,
    /// Blocked on a full progress queue.
    Backpressure,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Read => "read",
            Stage::Transform => "transform",
            Stage::Flush => "flush",
            Stage::Backpressure => "backpressure",
        })
    }
}

/// Accumulated time per stage. Stages never entered read as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageTimes {
    times: HashMap<Stage, Duration>,
}

impl StageTimes {
    pub fn add(&mut self, stage: Stage, dur: Duration) {
        *self.times.entry(stage).or_default() += dur;
    }

    pub fn get(&self, stage: Stage) -> Duration {
        self.times.get(&stage).copied().unwrap_or_default()
    }

    pub fn total(&self) -> Duration {
        self.times.values().sum()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, Stage, Duration> {
        self.times.iter()
    }
}

impl<'a> IntoIterator for &'a StageTimes {
    type Item = (&'a Stage, &'a Duration);
    type IntoIter = hash_map::Iter<'a, Stage, Duration>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Wall clock for one job plus its per-stage breakdown.
#[derive(Clone, Debug)]
pub struct TelemetryTimer {
    started: Instant,
    stopped: Option<Instant>,
    stage_times: StageTimes,
}

impl TelemetryTimer {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            stopped: None,
            stage_times: StageTimes::default(),
        }
    }

    /// Run `f` and charge its duration to `stage`, whether it succeeds or not.
    pub fn time<T>(&mut self, stage: Stage, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        self.stage_times.add(stage, start.elapsed());
        out
    }

    /// Freeze the wall clock. Later calls keep the first stop time.
    pub fn finish(&mut self) {
        self.stopped.get_or_insert_with(Instant::now);
    }

    pub fn stage_times(&self) -> &StageTimes {
        &self.stage_times
    }

    pub fn elapsed(&self) -> Duration {
        self.stopped.unwrap_or_else(Instant::now).duration_since(self.started)
    }
}

impl Default for TelemetryTimer {
    fn default() -> Self {
        Self::new()
    }
}
