//! streamjob-demo
//!
//! Compresses a short passage, encrypts it, decrypts it and decompresses it again,
//! printing each stage's length and the observers' progress lines.
//!
//! Environment:
//! - `STREAMJOB_KEY`: hex AES key (16 or 32 bytes). Unset → ephemeral random key.
//! - `STREAMJOB_CHUNK_SIZE`, `STREAMJOB_QUEUE_DEPTH`: job sizing.
//! - `RUST_LOG`: tracing filter (default `info`).

use anyhow::Context;
use streamjob_core::crypto::{CipherConfig, CipherSuite, CryptoError};
use streamjob_core::job::JobConfig;
use streamjob_core::pipeline::run_pipeline;
use tracing_subscriber::EnvFilter;

const PASSAGE: &str = "Everything which is in any way beautiful is beautiful in itself, and terminates in itself, \
not having praise as part of itself. Neither worse then, nor better, is a thing made by being praised. \
I affirm this also of the things which are called beautiful by the vulgar; for example, material things \
and works of art. That which is really beautiful has no need of anything; not more than law, not more than \
truth, not more than benevolence or modesty. Which of these things is beautiful because it is praised, or \
spoiled by being blamed? Is such a thing as an emerald made worse than it was, if it is not praised? Or gold, \
ivory, purple, a lyre, a little knife, a flower, a shrub?";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = JobConfig::from_env().context("loading job configuration")?;
    let cipher = match CipherConfig::from_env() {
        Ok(cipher) => cipher,
        Err(CryptoError::MissingKey { var }) => {
            tracing::warn!(var, "no key configured, using an ephemeral random key");
            CipherConfig::generate(CipherSuite::Aes256Gcm)
        }
        Err(e) => return Err(e).context("loading cipher key"),
    };

    let report = run_pipeline(
        PASSAGE.as_bytes(),
        &cipher,
        &config,
        Some(Box::new(std::io::stdout())),
    )
    .context("running demo pipeline")?;

    println!(
        "gzip: {} -> {} bytes (ratio {:.3}) in {:?}",
        report.compress.bytes_read,
        report.compress.bytes_written,
        report.compress.output_ratio,
        report.compress.elapsed
    );
    println!("compress telemetry: {}", report.compress.to_json()?);
    println!("decompress telemetry: {}", report.decompress.to_json()?);
    Ok(())
}
