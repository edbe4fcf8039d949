/// Defaults when a job is configured without explicit sizes.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024; // 64 KiB

/// Progress events buffered per channel before the runner blocks.
pub const DEFAULT_QUEUE_DEPTH: usize = 1000;

/// Max chunk size sanity bound (32 MiB).
pub const MAX_CHUNK_SIZE: usize = 32 * 1024 * 1024;

/// gzip level used when none is requested (best compression).
pub const DEFAULT_GZIP_LEVEL: u32 = 9;

/// Environment variables recognised by `JobConfig::from_env` and `CipherConfig::from_env`.
pub mod env_vars {
    pub const CHUNK_SIZE: &str = "STREAMJOB_CHUNK_SIZE";
    pub const QUEUE_DEPTH: &str = "STREAMJOB_QUEUE_DEPTH";
    pub const KEY: &str = "STREAMJOB_KEY";
}
