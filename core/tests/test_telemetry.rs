#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::time::Duration;

    use streamjob_core::compression::gzip;
    use streamjob_core::job::JobConfig;
    use streamjob_core::telemetry::{JobCounters, JobSnapshot, Stage, StageTimes, TelemetryTimer};

    #[test]
    fn counters_accumulate_reads_writes_and_flush() {
        let mut c = JobCounters::default();
        c.add_read(4);
        c.add_write(10);
        c.add_read(2);
        c.add_write(0);
        c.add_flush(15);

        assert_eq!(c.chunks, 2);
        assert_eq!(c.bytes_read, 6);
        assert_eq!(c.writes, 2);
        assert_eq!(c.total_output(), 25);

        let mut total = JobCounters::default();
        total += &c;
        total += &c;
        assert_eq!(total.bytes_read, 12);
        assert_eq!(total.bytes_flushed, 30);
    }

    #[test]
    fn stage_times_accumulate() {
        let mut times = StageTimes::default();
        times.add(Stage::Read, Duration::from_millis(2));
        times.add(Stage::Read, Duration::from_millis(3));
        times.add(Stage::Flush, Duration::from_millis(1));

        assert_eq!(times.get(Stage::Read), Duration::from_millis(5));
        assert_eq!(times.get(Stage::Backpressure), Duration::ZERO);
        assert_eq!(times.total(), Duration::from_millis(6));
        assert_eq!(Stage::Backpressure.to_string(), "backpressure");
    }

    #[test]
    fn timer_charges_closures_to_stages() {
        let mut timer = TelemetryTimer::new();
        let out: Result<u8, &str> = timer.time(Stage::Transform, || {
            std::thread::sleep(Duration::from_millis(2));
            Err("boom")
        });
        assert!(out.is_err());
        timer.finish();

        let charged = timer.stage_times().get(Stage::Transform);
        assert!(charged >= Duration::from_millis(2));
        assert!(timer.elapsed() >= charged);

        let frozen = timer.elapsed();
        timer.finish();
        assert_eq!(timer.elapsed(), frozen);
    }

    #[test]
    fn snapshot_ratio_and_json() {
        let mut c = JobCounters::default();
        c.add_read(100);
        c.add_write(20);
        c.add_flush(5);
        let mut timer = TelemetryTimer::new();
        timer.finish();

        let snap = JobSnapshot::from(&c, &timer);
        assert_eq!(snap.bytes_written, 25);
        assert!((snap.output_ratio - 0.25).abs() < f64::EPSILON);
        assert!(snap.sanity_check());

        let json = snap.to_json().unwrap();
        let back: JobSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.bytes_written, 25);
    }

    #[test]
    fn job_report_carries_snapshot() {
        let input = vec![0u8; 4096];
        let report = gzip(Cursor::new(input), Vec::new(), &JobConfig::new(512, 16))
            .unwrap()
            .wait()
            .unwrap();

        let snap = &report.snapshot;
        assert_eq!(snap.chunks, 8);
        assert_eq!(snap.bytes_read, 4096);
        assert_eq!(snap.bytes_written as usize, report.output.len());
        assert!(snap.output_ratio < 1.0);
        assert!(snap.sanity_check());
    }
}
