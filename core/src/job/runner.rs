use std::any::Any;
use std::io::Read;
use std::panic::{self, AssertUnwindSafe};
use std::thread;

use tracing::{debug, info, trace, warn};

use crate::job::adapter::{ChunkTransform, Pull, TransformAdapter};
use crate::job::handle::{job_channels, JobHandle, JobReport, JobSenders, Terminal};
use crate::job::{CancelToken, JobConfig, JobError};
use crate::telemetry::{JobCounters, JobSnapshot, Stage, TelemetryTimer};

/// Builder for one streaming job over any [`ChunkTransform`].
pub struct StreamJob<R, T> {
    name: &'static str,
    source: R,
    transform: T,
    config: JobConfig,
    cancel: CancelToken,
}

impl<R, T> StreamJob<R, T>
where
    R: Read + Send + 'static,
    T: ChunkTransform + 'static,
    T::Output: 'static,
{
    pub fn new(name: &'static str, source: R, transform: T) -> Self {
        Self {
            name,
            source,
            transform,
            config: JobConfig::default(),
            cancel: CancelToken::new(),
        }
    }

    pub fn config(mut self, config: JobConfig) -> Self {
        self.config = config;
        self
    }

    /// Share a cancellation token with other jobs or an external controller.
    pub fn cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Validate the configuration, start the runner thread and return at once.
    pub fn spawn(self) -> Result<JobHandle<T::Output>, JobError> {
        self.config.validate()?;

        let StreamJob { name, source, transform, config, cancel } = self;
        let (senders, receivers) = job_channels(&config);
        let adapter = TransformAdapter::new(source, transform, config.chunk_size);
        let runner_cancel = cancel.clone();

        let runner = thread::Builder::new()
            .name(format!("streamjob-{name}"))
            .spawn(move || run_job(name, adapter, senders, runner_cancel))
            .map_err(|e| JobError::io("spawn", e))?;

        debug!(
            job = name,
            chunk_size = config.chunk_size,
            queue_depth = config.queue_depth,
            "job spawned"
        );
        Ok(JobHandle::new(name, receivers, cancel, runner))
    }
}

/// Runner thread body: drive, drain, then finalize exactly once.
fn run_job<R, T>(
    name: &'static str,
    mut adapter: TransformAdapter<R, T>,
    mut senders: JobSenders,
    cancel: CancelToken,
) -> Result<JobReport<T::Output>, JobError>
where
    R: Read,
    T: ChunkTransform,
{
    let mut counters = JobCounters::default();
    let mut timer = TelemetryTimer::new();
    info!(job = name, transform = adapter.name(), "job started");

    // A panicking transform must still reach `finalize`; the unwind drops the codec.
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        match drive(&mut adapter, &mut senders, &cancel, &mut counters, &mut timer) {
            Ok(()) => drain(adapter, &mut senders, &cancel, &mut counters, &mut timer),
            Err(e) => {
                adapter.abort();
                Err(e)
            }
        }
    }))
    .unwrap_or_else(|payload| {
        Err(JobError::Runner(format!(
            "{name} runner panicked: {}",
            panic_message(payload.as_ref())
        )))
    });
    timer.finish();

    let terminal = match &result {
        Ok(_) => Terminal::Completed,
        Err(e) => Terminal::Failed(e.clone()),
    };
    senders.finalize(terminal);

    match result {
        Ok(output) => {
            let snapshot = JobSnapshot::from(&counters, &timer);
            info!(
                job = name,
                chunks = snapshot.chunks,
                bytes_read = snapshot.bytes_read,
                bytes_written = snapshot.bytes_written,
                elapsed_ms = snapshot.elapsed.as_millis() as u64,
                "job completed"
            );
            Ok(JobReport { output, snapshot })
        }
        Err(e) => {
            warn!(job = name, chunks = counters.chunks, error = %e, "job failed");
            Err(e)
        }
    }
}

fn panic_message<'a>(payload: &'a (dyn Any + Send + 'static)) -> &'a str {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg
    } else {
        "non-string panic payload"
    }
}

/// Running state: pull, report, push, report, until end of input.
fn drive<R, T>(
    adapter: &mut TransformAdapter<R, T>,
    senders: &mut JobSenders,
    cancel: &CancelToken,
    counters: &mut JobCounters,
    timer: &mut TelemetryTimer,
) -> Result<(), JobError>
where
    R: Read,
    T: ChunkTransform,
{
    loop {
        if cancel.is_cancelled() {
            return Err(JobError::Cancelled { chunks: counters.chunks });
        }

        let chunk = match timer.time(Stage::Read, || adapter.pull())? {
            Pull::Chunk(chunk) => chunk,
            Pull::EndOfInput => return Ok(()),
        };
        counters.add_read(chunk.len());
        timer.time(Stage::Backpressure, || senders.emit_read(chunk.len(), cancel, counters.chunks))?;

        let written = timer.time(Stage::Transform, || adapter.push(&chunk))?;
        counters.add_write(written);
        trace!(read = chunk.len(), written, chunk = counters.chunks, "chunk transformed");
        timer.time(Stage::Backpressure, || senders.emit_written(written, cancel, counters.chunks))?;
    }
}

/// Draining state: flush and close the codec, report the trailing bytes.
fn drain<R, T>(
    adapter: TransformAdapter<R, T>,
    senders: &mut JobSenders,
    cancel: &CancelToken,
    counters: &mut JobCounters,
    timer: &mut TelemetryTimer,
) -> Result<T::Output, JobError>
where
    R: Read,
    T: ChunkTransform,
{
    // Cancellation after end of input still wins over flushing.
    if cancel.is_cancelled() {
        adapter.abort();
        return Err(JobError::Cancelled { chunks: counters.chunks });
    }

    let (output, flushed) = timer.time(Stage::Flush, || adapter.finish())?;
    counters.add_flush(flushed);
    trace!(flushed, "codec flushed");

    timer.time(Stage::Backpressure, || senders.emit_written(flushed, cancel, counters.chunks))?;
    Ok(output)
}
