//! gzip compress/decompress via flate2 write-side adapters.

use std::io::{self, Read, Write};

use flate2::write::{GzEncoder, MultiGzDecoder};
use flate2::Compression;

use crate::compression::types::{gzip_level, CountingWriter};
use crate::job::{ChunkTransform, JobConfig, JobError, JobHandle, StreamJob};

pub struct GzipCompress<W: Write> {
    encoder: GzEncoder<CountingWriter<W>>,
}

impl<W: Write> GzipCompress<W> {
    pub fn new(sink: W, level: Compression) -> Self {
        Self {
            encoder: GzEncoder::new(CountingWriter::new(sink), level),
        }
    }

    pub fn with_default_level(sink: W) -> Self {
        Self::new(sink, gzip_level(None))
    }
}

impl<W: Write + Send> ChunkTransform for GzipCompress<W> {
    type Output = W;

    fn name(&self) -> &'static str {
        "gzip"
    }

    fn push(&mut self, chunk: &[u8]) -> Result<usize, JobError> {
        let before = self.encoder.get_ref().written();
        self.encoder
            .write_all(chunk)
            .map_err(|e| JobError::io("write", e))?;
        Ok((self.encoder.get_ref().written() - before) as usize)
    }

    fn finish(self) -> Result<(W, usize), JobError> {
        let before = self.encoder.get_ref().written();
        let sink = self.encoder.finish().map_err(|e| JobError::io("flush", e))?;
        let flushed = (sink.written() - before) as usize;
        Ok((sink.into_inner(), flushed))
    }
}

/// Decodes every gzip member in the input, like `gzip -d` on concatenated files.
pub struct GzipDecompress<W: Write> {
    decoder: MultiGzDecoder<CountingWriter<W>>,
}

impl<W: Write> GzipDecompress<W> {
    pub fn new(sink: W) -> Self {
        Self {
            decoder: MultiGzDecoder::new(CountingWriter::new(sink)),
        }
    }

    /// Blame the sink only if it actually failed; everything else is the stream's fault,
    /// including a decoder that stops accepting input (`WriteZero` from `write_all`).
    fn classify(&self, op: &'static str, e: io::Error) -> JobError {
        if self.decoder.get_ref().sink_failed() {
            JobError::io(op, e)
        } else {
            JobError::codec("gunzip", e)
        }
    }
}

impl<W: Write + Send> ChunkTransform for GzipDecompress<W> {
    type Output = W;

    fn name(&self) -> &'static str {
        "gunzip"
    }

    fn push(&mut self, chunk: &[u8]) -> Result<usize, JobError> {
        let before = self.decoder.get_ref().written();
        if let Err(e) = self.decoder.write_all(chunk) {
            return Err(self.classify("write", e));
        }
        Ok((self.decoder.get_ref().written() - before) as usize)
    }

    fn finish(mut self) -> Result<(W, usize), JobError> {
        let before = self.decoder.get_ref().written();
        if let Err(e) = self.decoder.try_finish() {
            return Err(self.classify("flush", e));
        }
        let sink = self.decoder.finish().map_err(|e| JobError::io("flush", e))?;
        let flushed = (sink.written() - before) as usize;
        Ok((sink.into_inner(), flushed))
    }
}

/// Compress `source` into `sink` on a background job at best compression.
pub fn gzip<R, W>(source: R, sink: W, config: &JobConfig) -> Result<JobHandle<W>, JobError>
where
    R: Read + Send + 'static,
    W: Write + Send + 'static,
{
    StreamJob::new("gzip", source, GzipCompress::with_default_level(sink))
        .config(*config)
        .spawn()
}

/// Decompress a gzip `source` into `sink` on a background job.
pub fn gunzip<R, W>(source: R, sink: W, config: &JobConfig) -> Result<JobHandle<W>, JobError>
where
    R: Read + Send + 'static,
    W: Write + Send + 'static,
{
    StreamJob::new("gunzip", source, GzipDecompress::new(sink))
        .config(*config)
        .spawn()
}
