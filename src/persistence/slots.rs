use super::files::{atomic_write, ensure_dir, read_file, slot_file};
use super::ports::{ChangeFeed, SnapshotPort};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

/// Slots stored as `<slot>.json` files in one directory
#[derive(Debug, Clone)]
pub struct FileSlotStore {
    dir: PathBuf,
}

impl FileSlotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl SnapshotPort for FileSlotStore {
    fn load(&self, slot: &str) -> Result<Option<String>> {
        let content = read_file(slot_file(&self.dir, slot))?;
        if content.is_empty() {
            Ok(None)
        } else {
            Ok(Some(content))
        }
    }

    fn save(&mut self, slot: &str, contents: &str) -> Result<()> {
        ensure_dir(&self.dir)?;
        atomic_write(slot_file(&self.dir, slot), contents)
    }
}

/// Modification time and length of a slot file
type Fingerprint = (Option<SystemTime>, u64);

/// Detects slot files changed by other processes by comparing fingerprints
/// between polls.
///
/// Every change is reported, this process's own writes included; the
/// receiver is expected to ignore contents it already holds.
#[derive(Debug)]
pub struct FileSlotWatcher {
    dir: PathBuf,
    seen: HashMap<String, Fingerprint>,
}

impl FileSlotWatcher {
    /// Start watching `dir`; files already present are not reported
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        let seen = scan(&dir)?;
        Ok(Self { dir, seen })
    }
}

impl ChangeFeed for FileSlotWatcher {
    fn poll_changes(&mut self) -> Result<Vec<String>> {
        let current = scan(&self.dir)?;

        let mut changed: Vec<String> = current
            .iter()
            .filter(|(slot, print)| self.seen.get(*slot) != Some(*print))
            .map(|(slot, _)| slot.clone())
            .collect();
        changed.extend(
            self.seen
                .keys()
                .filter(|slot| !current.contains_key(*slot))
                .cloned(),
        );
        changed.sort();

        if !changed.is_empty() {
            debug!(dir = ?self.dir, slots = ?changed, "Slot files changed");
        }

        self.seen = current;
        Ok(changed)
    }
}

/// Fingerprint every `*.json` file in `dir`
fn scan(dir: &Path) -> Result<HashMap<String, Fingerprint>> {
    let mut prints = HashMap::new();
    if !dir.is_dir() {
        return Ok(prints);
    }

    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to list directory: {}", dir.display()))?;

    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        let Some(slot) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };

        // The file may vanish between listing and stat
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        prints.insert(slot.to_string(), (metadata.modified().ok(), metadata.len()));
    }

    Ok(prints)
}
