pub mod files;
#[cfg(test)]
pub mod memory;
pub mod ports;
pub mod slots;
pub mod snapshot;

pub use files::{ensure_dir, get_data_dir, init_local_dir, log_file};
#[cfg(test)]
pub use memory::MemorySlots;
pub use ports::{ChangeFeed, SnapshotPort};
pub use slots::{FileSlotStore, FileSlotWatcher};
pub use snapshot::{Snapshot, SnapshotError, DEFAULT_SLOT};
