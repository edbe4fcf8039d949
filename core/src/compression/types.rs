use std::io::{self, Write};

use flate2::Compression;

use crate::constants::DEFAULT_GZIP_LEVEL;

/// Map a requested level onto flate2. Out-of-range levels fall back to the default.
pub fn gzip_level(level: Option<u32>) -> Compression {
    match level.unwrap_or(DEFAULT_GZIP_LEVEL) {
        lvl @ 0..=9 => Compression::new(lvl),
        _ => Compression::default(),
    }
}

/// Sink wrapper that counts bytes accepted by the inner writer.
///
/// It also remembers whether the inner writer ever failed, so a codec sitting on top
/// can tell its own errors apart from errors it merely passed through.
#[derive(Debug)]
pub struct CountingWriter<W> {
    inner: W,
    written: u64,
    sink_failed: bool,
}

impl<W> CountingWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, written: 0, sink_failed: false }
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    /// True once the inner writer returned an error other than `Interrupted`.
    pub fn sink_failed(&self) -> bool {
        self.sink_failed
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W> CountingWriter<W> {
    fn track<T>(&mut self, res: io::Result<T>) -> io::Result<T> {
        if let Err(e) = &res {
            if e.kind() != io::ErrorKind::Interrupted {
                self.sink_failed = true;
            }
        }
        res
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let res = self.inner.write(buf);
        let n = self.track(res)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        let res = self.inner.flush();
        self.track(res)
    }
}
