#[cfg(test)]
mod tests {
    use std::io::{self, Cursor, Write};
    use std::sync::{Arc, Mutex};

    use proptest::prelude::*;
    use streamjob_core::compression::{gunzip, gzip};
    use streamjob_core::crypto::{CipherConfig, CipherSuite};
    use streamjob_core::job::{ErrorKind, JobConfig};
    use streamjob_core::pipeline::run_pipeline;
    use streamjob_core::types::PipelineError;

    const PASSAGE: &[u8] = b"Everything which is in any way beautiful is beautiful in itself, \
and terminates in itself, not having praise as part of itself.";

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

    fn roundtrip(data: &[u8], config: &JobConfig) -> Vec<u8> {
        let compressed = gzip(Cursor::new(data.to_vec()), Vec::new(), config)
            .unwrap()
            .discard_progress()
            .wait()
            .unwrap()
            .output;
        gunzip(Cursor::new(compressed), Vec::new(), config)
            .unwrap()
            .discard_progress()
            .wait()
            .unwrap()
            .output
    }

    #[test]
    fn pipeline_records_every_stage() {
        let cipher = CipherConfig::generate(CipherSuite::Aes256Gcm);
        let report = run_pipeline(PASSAGE, &cipher, &JobConfig::new(8, 4), None).unwrap();

        let labels: Vec<_> = report.stages.iter().map(|s| s.label).collect();
        assert_eq!(
            labels,
            ["unencrypted", "gzipped", "gzipped encrypted", "gzipped decrypted", "gunzipped decrypted"]
        );
        assert_eq!(report.output, PASSAGE);
        assert_eq!(report.stages[1].len, report.compressed.len());
        assert_eq!(report.stages[2].len, report.compressed.len() + 12 + 16);
        assert_eq!(report.stages[3].len, report.compressed.len());
        assert!(report.stages.windows(2).all(|w| w[0].at <= w[1].at));

        assert_eq!(report.compress_observed.total_read(), PASSAGE.len());
        assert_eq!(report.compress_observed.total_written(), report.compressed.len());
        assert_eq!(report.decompress_observed.total_written(), PASSAGE.len());
        assert_eq!(report.compress.bytes_read as usize, PASSAGE.len());
    }

    #[test]
    fn pipeline_renders_progress_and_stages() {
        let capture = Capture::default();
        let cipher = CipherConfig::generate(CipherSuite::ChaCha20Poly1305);
        run_pipeline(PASSAGE, &cipher, &JobConfig::new(32, 2), Some(Box::new(capture.clone()))).unwrap();

        let text = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
        assert!(text.contains("[gzip] read 32 bytes"));
        assert!(text.contains("[gunzip] end of stream"));
        assert!(text.contains("pipeline-stage-completed=(gzipped encrypted)"));
    }

    #[test]
    fn pipeline_rejects_invalid_config() {
        let cipher = CipherConfig::generate(CipherSuite::Aes128Gcm);
        let err = run_pipeline(PASSAGE, &cipher, &JobConfig::new(0, 4), None).unwrap_err();
        assert!(matches!(err, PipelineError::Job(_)));
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn empty_input_roundtrips() {
        assert!(roundtrip(b"", &JobConfig::new(4, 2)).is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_gzip_roundtrip(
            data in proptest::collection::vec(any::<u8>(), 0..4096),
            chunk_size in 1usize..512,
            queue_depth in 1usize..8,
        ) {
            let config = JobConfig::new(chunk_size, queue_depth);
            prop_assert_eq!(roundtrip(&data, &config), data);
        }

        #[test]
        fn prop_full_pipeline_roundtrip(data in proptest::collection::vec(any::<u8>(), 0..1024)) {
            let cipher = CipherConfig::generate(CipherSuite::Aes256Gcm);
            let report = run_pipeline(&data, &cipher, &JobConfig::new(64, 4), None).unwrap();
            prop_assert_eq!(report.output, data);
        }
    }
}
