#[cfg(test)]
mod tests {
    use std::io::{self, Cursor, Write};
    use std::sync::{Arc, Mutex};

    use streamjob_core::compression::{gunzip, gzip};
    use streamjob_core::job::{ErrorKind, JobConfig, Observer, Terminal};

    /// Cloneable in-memory writer so the test can read what the observer rendered.
    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Capture {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "terminal gone"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn renders_one_line_per_event() {
        let capture = Capture::default();
        let handle = gzip(Cursor::new(b"aaaaaaaaaa".to_vec()), Vec::new(), &JobConfig::new(4, 2)).unwrap();
        let observer = Observer::new("gz").with_writer(capture.clone()).attach(&handle).unwrap();

        handle.wait().unwrap();
        let seen = observer.join().unwrap();
        let text = capture.text();

        assert_eq!(seen.reads, vec![4, 4, 2]);
        assert_eq!(text.matches("[gz] read ").count(), 3);
        assert_eq!(text.matches("[gz] written ").count(), seen.writes.len());
        assert!(text.contains("[gz] read 2 bytes"));
        assert!(text.contains("[gz] done: success=true"));
        assert!(text.contains("[gz] end of stream"));
    }

    #[test]
    fn drains_every_channel_to_closure() {
        let handle = gzip(Cursor::new(vec![7u8; 1000]), Vec::new(), &JobConfig::new(10, 3)).unwrap();
        let seen = Observer::new("all").drain(&handle);

        // the observer returns only after all four channels closed
        assert_eq!(seen.reads.len(), 100);
        assert_eq!(seen.writes.len(), 101);
        assert_eq!(seen.done, vec![true]);
        assert!(matches!(seen.terminals.as_slice(), [Terminal::Completed]));
        assert!(seen.outcome().is_ok());
        assert!(handle.wait().is_ok());
    }

    #[test]
    fn failure_is_returned_not_fatal() {
        let capture = Capture::default();
        let handle = gunzip(Cursor::new(b"nope".to_vec()), Vec::new(), &JobConfig::default()).unwrap();
        let observer = Observer::new("bad").with_writer(capture.clone()).attach(&handle).unwrap();

        let seen = observer.join().unwrap();
        let err = seen.outcome().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Codec);
        assert!(capture.text().contains("[bad] failed: "));
        assert!(capture.text().contains("[bad] done: success=false"));
        assert!(handle.wait().is_err());
    }

    #[test]
    fn broken_render_writer_does_not_stop_draining() {
        let handle = gzip(Cursor::new(vec![1u8; 64]), Vec::new(), &JobConfig::new(8, 1)).unwrap();
        let seen = Observer::new("broken").with_writer(BrokenWriter).drain(&handle);

        assert_eq!(seen.total_read(), 64);
        assert!(seen.outcome().is_ok());
        assert!(handle.wait().is_ok());
    }

    #[test]
    fn late_observer_sees_buffered_events() {
        let handle = gzip(Cursor::new(vec![3u8; 12]), Vec::new(), &JobConfig::new(4, 16)).unwrap();
        let report_output_len = {
            // the job fits in the queues, so it finishes before anyone observes
            while !handle.is_finished() {
                std::thread::yield_now();
            }
            let seen = Observer::new("late").drain(&handle);
            assert_eq!(seen.reads, vec![4, 4, 4]);
            assert_eq!(seen.done, vec![true]);
            seen.total_written()
        };
        assert_eq!(handle.wait().unwrap().output.len(), report_output_len);
    }
}
