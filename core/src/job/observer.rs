use std::io::Write;
use std::thread::{self, JoinHandle};

use crossbeam::channel::{never, select, Receiver};
use tracing::{debug, info, warn};

use crate::job::{JobError, JobHandle, Terminal};

/// Everything an observer saw before all four channels closed.
#[derive(Debug, Clone, Default)]
pub struct Observation {
    pub reads: Vec<usize>,
    pub writes: Vec<usize>,
    pub done: Vec<bool>,
    pub terminals: Vec<Terminal>,
}

impl Observation {
    pub fn total_read(&self) -> usize {
        self.reads.iter().sum()
    }

    pub fn total_written(&self) -> usize {
        self.writes.iter().sum()
    }

    /// The job's typed outcome. The caller decides whether a failure is fatal.
    pub fn outcome(&self) -> Result<(), JobError> {
        match self.terminals.as_slice() {
            [terminal] => terminal.clone().into_result(),
            [] => Err(JobError::Runner("channels closed without a terminal signal".into())),
            more => Err(JobError::Runner(format!("{} terminal signals observed", more.len()))),
        }
    }
}

/// Drains a job's channels and renders progress.
pub struct Observer {
    label: String,
    writer: Option<Box<dyn Write + Send>>,
}

impl Observer {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), writer: None }
    }

    /// Also render one line per event to `writer`.
    pub fn with_writer(mut self, writer: impl Write + Send + 'static) -> Self {
        self.writer = Some(Box::new(writer));
        self
    }

    /// Drain on a dedicated thread.
    pub fn attach<O>(self, handle: &JobHandle<O>) -> Result<ObserverHandle, JobError> {
        let channels = Channels::from_handle(handle);
        let join = thread::Builder::new()
            .name(format!("observer-{}", self.label))
            .spawn(move || self.run(channels))
            .map_err(|e| JobError::io("spawn", e))?;
        Ok(ObserverHandle { join })
    }

    /// Drain on the current thread until every channel is closed.
    pub fn drain<O>(self, handle: &JobHandle<O>) -> Observation {
        self.run(Channels::from_handle(handle))
    }

    fn run(mut self, channels: Channels) -> Observation {
        let Channels { read, written, done, err } = channels;
        let mut read = Some(read);
        let mut written = Some(written);
        let mut done = Some(done);
        let mut err = Some(err);
        let mut seen = Observation::default();

        // A closed channel is swapped for `never()` so the select stops polling it.
        while read.is_some() || written.is_some() || done.is_some() || err.is_some() {
            let never_usize = never::<usize>();
            let never_bool = never::<bool>();
            let never_terminal = never::<Terminal>();

            let event = select! {
                recv(read.as_ref().unwrap_or(&never_usize)) -> msg => Event::Read(msg.ok()),
                recv(written.as_ref().unwrap_or(&never_usize)) -> msg => Event::Written(msg.ok()),
                recv(done.as_ref().unwrap_or(&never_bool)) -> msg => Event::Done(msg.ok()),
                recv(err.as_ref().unwrap_or(&never_terminal)) -> msg => Event::Terminal(msg.ok()),
            };

            match event {
                Event::Read(Some(n)) => {
                    self.render(format_args!("read {n} bytes"));
                    seen.reads.push(n);
                }
                Event::Written(Some(n)) => {
                    self.render(format_args!("written {n} bytes"));
                    seen.writes.push(n);
                }
                Event::Done(Some(success)) => {
                    self.render(format_args!("done: success={success}"));
                    seen.done.push(success);
                }
                Event::Terminal(Some(Terminal::Completed)) => {
                    self.render(format_args!("end of stream"));
                    seen.terminals.push(Terminal::Completed);
                }
                Event::Terminal(Some(Terminal::Failed(e))) => {
                    warn!(observer = %self.label, error = %e, "job failed");
                    self.render(format_args!("failed: {e}"));
                    seen.terminals.push(Terminal::Failed(e));
                }
                Event::Read(None) => read = None,
                Event::Written(None) => written = None,
                Event::Done(None) => done = None,
                Event::Terminal(None) => err = None,
            }
        }

        info!(
            observer = %self.label,
            read = seen.total_read(),
            written = seen.total_written(),
            success = seen.outcome().is_ok(),
            "observer finished"
        );
        seen
    }

    fn render(&mut self, line: std::fmt::Arguments<'_>) {
        debug!(observer = %self.label, "{line}");
        if let Some(w) = self.writer.as_mut() {
            if let Err(e) = writeln!(w, "[{}] {}", self.label, line) {
                warn!(observer = %self.label, error = %e, "render writer failed, disabling");
                self.writer = None;
            }
        }
    }
}

/// Join side of an attached observer.
pub struct ObserverHandle {
    join: JoinHandle<Observation>,
}

impl ObserverHandle {
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    pub fn join(self) -> Result<Observation, JobError> {
        self.join
            .join()
            .map_err(|_| JobError::Runner("observer panicked".into()))
    }
}

enum Event {
    Read(Option<usize>),
    Written(Option<usize>),
    Done(Option<bool>),
    Terminal(Option<Terminal>),
}

struct Channels {
    read: Receiver<usize>,
    written: Receiver<usize>,
    done: Receiver<bool>,
    err: Receiver<Terminal>,
}

impl Channels {
    fn from_handle<O>(handle: &JobHandle<O>) -> Self {
        Self {
            read: handle.bytes_read().clone(),
            written: handle.bytes_written().clone(),
            done: handle.done().clone(),
            err: handle.err().clone(),
        }
    }
}
