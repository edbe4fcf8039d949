use std::io::{self, Read};

use bytes::Bytes;

use crate::job::JobError;

/// Chunked byte transform driven by a job runner.
///
/// Implementations own the codec and the sink. `push` reports how many bytes reached
/// the sink during the call (zero is normal while the codec buffers internally);
/// `finish` flushes and closes the codec and hands the sink back.
pub trait ChunkTransform: Send {
    type Output: Send;

    fn name(&self) -> &'static str;

    fn push(&mut self, chunk: &[u8]) -> Result<usize, JobError>;

    fn finish(self) -> Result<(Self::Output, usize), JobError>;
}

/// Result of pulling from the source. End of input is not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pull {
    Chunk(Bytes),
    EndOfInput,
}

/// Couples an input source with a transform, in fixed-size chunks.
pub struct TransformAdapter<R, T> {
    source: R,
    transform: T,
    chunk_size: usize,
}

impl<R: Read, T: ChunkTransform> TransformAdapter<R, T> {
    pub fn new(source: R, transform: T, chunk_size: usize) -> Self {
        Self { source, transform, chunk_size }
    }

    pub fn name(&self) -> &'static str {
        self.transform.name()
    }

    /// Read up to `chunk_size` bytes. Only the last chunk before end of input is short.
    pub fn pull(&mut self) -> Result<Pull, JobError> {
        let buf = read_exact_or_eof(&mut self.source, self.chunk_size)
            .map_err(|e| JobError::io("read", e))?;
        if buf.is_empty() {
            return Ok(Pull::EndOfInput);
        }
        Ok(Pull::Chunk(buf))
    }

    pub fn push(&mut self, chunk: &[u8]) -> Result<usize, JobError> {
        self.transform.push(chunk)
    }

    /// Flush and close the codec. Skipping this loses trailing output.
    pub fn finish(self) -> Result<(T::Output, usize), JobError> {
        self.transform.finish()
    }

    /// Release codec state without reporting a result.
    pub fn abort(self) {
        tracing::debug!(transform = self.transform.name(), "transform aborted, releasing codec state");
        drop(self.transform);
    }
}

/// Fill a buffer of `len` bytes, stopping early only at end of input.
pub(crate) fn read_exact_or_eof<R: Read>(r: &mut R, len: usize) -> io::Result<Bytes> {
    let mut buf = vec![0u8; len];
    let mut off = 0;

    while off < len {
        match r.read(&mut buf[off..]) {
            Ok(0) => break,
            Ok(n) => off += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    buf.truncate(off);
    Ok(Bytes::from(buf))
}
