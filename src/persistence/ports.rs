use anyhow::Result;

/// Named storage slots holding whole serialized snapshots
pub trait SnapshotPort {
    /// Raw contents of `slot`, or `None` if nothing was ever written
    fn load(&self, slot: &str) -> Result<Option<String>>;

    /// Overwrite `slot` with `contents`
    fn save(&mut self, slot: &str, contents: &str) -> Result<()>;
}

/// Source of notifications about slots modified by someone else
pub trait ChangeFeed {
    /// Keys of slots that changed since the previous poll
    fn poll_changes(&mut self) -> Result<Vec<String>>;
}
