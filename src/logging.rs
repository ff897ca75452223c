use crate::persistence::{ensure_dir, log_file};
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (e.g. `debug`)
pub const LOG_ENV: &str = "TODOTICK_LOG";

/// Send tracing output to `<data dir>/todotick.log`.
///
/// The terminal belongs to the UI, so nothing is written to stdout/stderr.
pub fn init_logging(data_dir: &Path) -> Result<()> {
    ensure_dir(data_dir)?;
    let path = log_file(data_dir);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    // A subscriber may already be installed (tests); keep it
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_creates_log_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path().join("data");

        init_logging(&dir).unwrap();
        assert!(log_file(&dir).exists());
    }
}
