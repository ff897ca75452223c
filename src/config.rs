use crate::persistence::{get_data_dir, DEFAULT_SLOT};
use crate::ticker::{tick_duration, REFRESH_INTERVAL_MS};
use anyhow::{bail, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Runtime settings resolved from the command line, environment and defaults
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding slot files and the log
    pub data_dir: PathBuf,
    /// Name of the persisted slot
    pub slot: String,
    /// Relative-time refresh interval
    pub refresh_interval: Duration,
    /// Event poll interval of the TUI loop
    pub tick_rate: Duration,
}

impl Config {
    /// Build the config; `dir` comes from `--dir` or `TODOTICK_DIR`,
    /// otherwise the directory is discovered
    pub fn resolve(dir: Option<PathBuf>, slot: Option<String>) -> Result<Self> {
        let data_dir = match dir {
            Some(dir) => dir,
            None => get_data_dir()?,
        };

        let slot = slot.unwrap_or_else(|| DEFAULT_SLOT.to_string());
        validate_slot(&slot)?;

        Ok(Self {
            data_dir,
            slot,
            refresh_interval: Duration::from_millis(REFRESH_INTERVAL_MS),
            tick_rate: tick_duration(),
        })
    }
}

/// Slot names become file names, so keep them to one plain path component
fn validate_slot(slot: &str) -> Result<()> {
    if slot.is_empty() {
        bail!("Slot name must not be empty");
    }
    if !slot
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        bail!("Invalid slot name '{}': use letters, digits, '-' or '_'", slot);
    }
    Ok(())
}
