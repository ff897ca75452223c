use super::ports::{ChangeFeed, SnapshotPort};
use anyhow::Result;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Default)]
struct Slots {
    contents: HashMap<String, String>,
    pending: Vec<String>,
    writes: usize,
}

/// In-memory slots shared between handles, for tests
///
/// Writes through [`SnapshotPort::save`] stay silent, writes through
/// [`MemorySlots::external_write`] are reported by the change feed.
#[derive(Debug, Clone, Default)]
pub struct MemorySlots {
    slots: Rc<RefCell<Slots>>,
}

impl MemorySlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slot(slot: &str, contents: &str) -> Self {
        let slots = Self::new();
        slots
            .slots
            .borrow_mut()
            .contents
            .insert(slot.to_string(), contents.to_string());
        slots
    }

    /// Simulate another instance overwriting `slot`
    pub fn external_write(&self, slot: &str, contents: &str) {
        let mut slots = self.slots.borrow_mut();
        slots.contents.insert(slot.to_string(), contents.to_string());
        slots.pending.push(slot.to_string());
    }

    pub fn get(&self, slot: &str) -> Option<String> {
        self.slots.borrow().contents.get(slot).cloned()
    }

    /// Number of saves made through the port
    pub fn write_count(&self) -> usize {
        self.slots.borrow().writes
    }
}

impl SnapshotPort for MemorySlots {
    fn load(&self, slot: &str) -> Result<Option<String>> {
        Ok(self.get(slot))
    }

    fn save(&mut self, slot: &str, contents: &str) -> Result<()> {
        let mut slots = self.slots.borrow_mut();
        slots.contents.insert(slot.to_string(), contents.to_string());
        slots.writes += 1;
        Ok(())
    }
}

impl ChangeFeed for MemorySlots {
    fn poll_changes(&mut self) -> Result<Vec<String>> {
        Ok(std::mem::take(&mut self.slots.borrow_mut().pending))
    }
}
