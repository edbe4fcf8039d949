use std::thread::JoinHandle;
use std::time::Instant;

use crossbeam::channel::{bounded, select, Receiver, Sender, TrySendError};

use crate::job::{CancelToken, JobConfig, JobError, Observer, ObserverHandle};
use crate::telemetry::JobSnapshot;

/// The one terminal outcome of a job, carried on the err channel.
#[derive(Debug, Clone)]
pub enum Terminal {
    /// Input exhausted and codec flushed; this is the end-of-stream marker.
    Completed,
    Failed(JobError),
}

impl Terminal {
    pub fn is_success(&self) -> bool {
        matches!(self, Terminal::Completed)
    }

    pub fn into_result(self) -> Result<(), JobError> {
        match self {
            Terminal::Completed => Ok(()),
            Terminal::Failed(e) => Err(e),
        }
    }
}

/// What a successful job hands back: the sink plus its telemetry.
#[derive(Debug)]
pub struct JobReport<O> {
    pub output: O,
    pub snapshot: JobSnapshot,
}

/// Write ends of the four job channels. Owned by the runner only.
pub(crate) struct JobSenders {
    read: Option<Sender<usize>>,
    written: Option<Sender<usize>>,
    done: Sender<bool>,
    err: Sender<Terminal>,
}

pub(crate) struct JobReceivers {
    pub(crate) read: Receiver<usize>,
    pub(crate) written: Receiver<usize>,
    pub(crate) done: Receiver<bool>,
    pub(crate) err: Receiver<Terminal>,
}

pub(crate) fn job_channels(config: &JobConfig) -> (JobSenders, JobReceivers) {
    let (read_tx, read_rx) = bounded(config.queue_depth);
    let (written_tx, written_rx) = bounded(config.queue_depth);
    // Terminal channels hold their single value, so finalization never blocks.
    let (done_tx, done_rx) = bounded(1);
    let (err_tx, err_rx) = bounded(1);

    (
        JobSenders {
            read: Some(read_tx),
            written: Some(written_tx),
            done: done_tx,
            err: err_tx,
        },
        JobReceivers {
            read: read_rx,
            written: written_rx,
            done: done_rx,
            err: err_rx,
        },
    )
}

#[derive(Clone, Copy)]
enum Progress {
    Read,
    Written,
}

impl Progress {
    fn label(self) -> &'static str {
        match self {
            Progress::Read => "bytes_read",
            Progress::Written => "bytes_written",
        }
    }
}

impl JobSenders {
    pub(crate) fn emit_read(&mut self, n: usize, cancel: &CancelToken, chunks: u64) -> Result<(), JobError> {
        self.emit(Progress::Read, n, cancel, chunks)
    }

    pub(crate) fn emit_written(&mut self, n: usize, cancel: &CancelToken, chunks: u64) -> Result<(), JobError> {
        self.emit(Progress::Written, n, cancel, chunks)
    }

    /// Enqueue one progress sample, blocking while the queue is full.
    ///
    /// Cancellation wakes the wait. A channel with no receivers left is unobserved:
    /// its sender is dropped and later samples for it are skipped.
    fn emit(&mut self, which: Progress, n: usize, cancel: &CancelToken, chunks: u64) -> Result<(), JobError> {
        let slot = match which {
            Progress::Read => &mut self.read,
            Progress::Written => &mut self.written,
        };
        let Some(tx) = slot.as_ref() else {
            return Ok(());
        };

        // Free space wins over a pending cancel; only a full queue waits on the signal.
        let disconnected = match tx.try_send(n) {
            Ok(()) => false,
            Err(TrySendError::Disconnected(_)) => true,
            Err(TrySendError::Full(n)) => select! {
                send(tx, n) -> res => res.is_err(),
                recv(cancel.signal()) -> _ => return Err(JobError::Cancelled { chunks }),
            },
        };

        if disconnected {
            tracing::debug!(channel = which.label(), "progress receivers gone, dropping channel");
            *slot = None;
        }
        Ok(())
    }

    /// Single exit path for every runner outcome.
    ///
    /// Progress channels close first, then `done` and `err` receive their one value
    /// each. Taking `self` by value closes every channel exactly once.
    pub(crate) fn finalize(self, terminal: Terminal) {
        let JobSenders { read, written, done, err } = self;
        drop(read);
        drop(written);

        // Capacity-1 channels sent once: these only fail when nobody is listening.
        let _ = done.send(terminal.is_success());
        let _ = err.send(terminal);
    }
}

/// Caller-facing side of a running job. Returned before any work happens.
pub struct JobHandle<O> {
    name: &'static str,
    receivers: JobReceivers,
    cancel: CancelToken,
    runner: JoinHandle<Result<JobReport<O>, JobError>>,
    started: Instant,
}

impl<O> JobHandle<O> {
    pub(crate) fn new(
        name: &'static str,
        receivers: JobReceivers,
        cancel: CancelToken,
        runner: JoinHandle<Result<JobReport<O>, JobError>>,
    ) -> Self {
        Self {
            name,
            receivers,
            cancel,
            runner,
            started: Instant::now(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Byte count of every chunk pulled from the source, in order.
    pub fn bytes_read(&self) -> &Receiver<usize> {
        &self.receivers.read
    }

    /// Byte count delivered to the sink by every push, then the drain flush.
    pub fn bytes_written(&self) -> &Receiver<usize> {
        &self.receivers.written
    }

    pub fn done(&self) -> &Receiver<bool> {
        &self.receivers.done
    }

    pub fn err(&self) -> &Receiver<Terminal> {
        &self.receivers.err
    }

    pub fn cancel(&self) {
        tracing::debug!(job = self.name, "cancellation requested");
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// True once the runner thread has exited (terminal signal already sent).
    pub fn is_finished(&self) -> bool {
        self.runner.is_finished()
    }

    /// Drop this handle's progress receivers.
    ///
    /// With no observer attached the runner then stops emitting progress instead of
    /// stalling on full queues. Receivers already cloned by an observer keep working.
    pub fn discard_progress(mut self) -> Self {
        let (_, read) = bounded(0);
        let (_, written) = bounded(0);
        self.receivers.read = read;
        self.receivers.written = written;
        self
    }

    /// Attach a default observer on its own thread.
    pub fn observe(&self) -> Result<ObserverHandle, JobError> {
        Observer::new(self.name).attach(self)
    }

    /// Block until the runner exits and return its result.
    ///
    /// Stalls while progress queues are full and undrained; see the module docs.
    pub fn wait(self) -> Result<JobReport<O>, JobError> {
        let name = self.name;
        let result = match self.runner.join() {
            Ok(result) => result,
            Err(_) => Err(JobError::Runner(format!("{name} runner panicked"))),
        };
        tracing::debug!(
            job = name,
            ok = result.is_ok(),
            waited_ms = self.started.elapsed().as_millis() as u64,
            "job joined"
        );
        result
    }
}
