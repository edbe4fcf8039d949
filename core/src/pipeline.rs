//! Demo pipeline: gzip → encrypt → decrypt → gunzip, observed at every job.

use std::io::{Cursor, Write};
use std::time::{Duration, Instant};

use tracing::info;

use crate::compression::{gunzip, gzip};
use crate::crypto::{decrypt, encrypt, CipherConfig};
use crate::job::{JobConfig, JobHandle, JobReport, Observation, Observer};
use crate::telemetry::JobSnapshot;
use crate::types::PipelineError;

/// One completed pipeline stage.
#[derive(Debug, Clone, PartialEq)]
pub struct StageRecord {
    pub label: &'static str,
    pub len: usize,
    /// Time since the pipeline started.
    pub at: Duration,
}

#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub stages: Vec<StageRecord>,
    pub compressed: Vec<u8>,
    pub ciphertext: Vec<u8>,
    pub output: Vec<u8>,
    pub compress: JobSnapshot,
    pub decompress: JobSnapshot,
    pub compress_observed: Observation,
    pub decompress_observed: Observation,
}

/// Run the full round trip over `input`.
///
/// Each job gets an observer, so progress queues are always drained. When `render`
/// is set, observer lines and stage summaries are written to it.
pub fn run_pipeline(
    input: &[u8],
    cipher: &CipherConfig,
    config: &JobConfig,
    render: Option<Box<dyn Write + Send>>,
) -> Result<PipelineReport, PipelineError> {
    let start = Instant::now();
    let mut render = render.map(SharedWriter::new);
    let mut stages = Vec::with_capacity(5);

    let mut record = |label: &'static str, bytes: &[u8]| {
        let rec = StageRecord { label, len: bytes.len(), at: start.elapsed() };
        info!(stage = label, len = rec.len, at_us = rec.at.as_micros() as u64, "pipeline stage completed");
        stages.push(rec);
    };

    record("unencrypted", input);

    let job = gzip(Cursor::new(input.to_vec()), Vec::new(), config)?;
    let (compress, compress_observed) = observe_and_wait(job, &mut render)?;
    let compressed = compress.output;
    record("gzipped", &compressed);

    let ciphertext = encrypt(cipher, &compressed)?;
    record("gzipped encrypted", &ciphertext);

    let decrypted = decrypt(cipher, &ciphertext)?;
    record("gzipped decrypted", &decrypted);

    let job = gunzip(Cursor::new(decrypted), Vec::new(), config)?;
    let (decompress, decompress_observed) = observe_and_wait(job, &mut render)?;
    let output = decompress.output;
    record("gunzipped decrypted", &output);

    if output != input {
        return Err(PipelineError::Validation(format!(
            "round trip mismatch: {} bytes in, {} bytes out",
            input.len(),
            output.len()
        )));
    }

    if let Some(w) = render.as_mut() {
        for s in &stages {
            // Rendering is best effort; the pipeline result does not depend on it.
            let _ = writeln!(w, "[pipeline-stage-completed=({}) (in {:?}) => len == {}]", s.label, s.at, s.len);
        }
    }

    Ok(PipelineReport {
        stages,
        compressed,
        ciphertext,
        output,
        compress: compress.snapshot,
        decompress: decompress.snapshot,
        compress_observed,
        decompress_observed,
    })
}

fn observe_and_wait(
    job: JobHandle<Vec<u8>>,
    render: &mut Option<SharedWriter>,
) -> Result<(JobReport<Vec<u8>>, Observation), PipelineError> {
    let mut observer = Observer::new(job.name());
    if let Some(w) = render.as_ref() {
        observer = observer.with_writer(w.clone());
    }
    let observer = observer.attach(&job)?;

    let result = job.wait();
    let observation = observer.join()?;
    let report = result?;
    observation.outcome()?;
    Ok((report, observation))
}

/// Lets each observer thread render into the caller's writer in turn.
#[derive(Clone)]
struct SharedWriter {
    inner: std::sync::Arc<std::sync::Mutex<Box<dyn Write + Send>>>,
}

impl SharedWriter {
    fn new(w: Box<dyn Write + Send>) -> Self {
        Self { inner: std::sync::Arc::new(std::sync::Mutex::new(w)) }
    }
}

impl Write for SharedWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut guard = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        guard.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        let mut guard = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        guard.flush()
    }
}
