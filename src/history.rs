//! BC-side sensor history.
//!
//! Every status record the bridge accepts is appended with its arrival
//! time. The buffer is fixed-size; once full, the oldest entry is dropped.
//! Nothing survives a reboot.

use heapless::Deque;

use crate::link::record::StatusRecord;

/// Entries kept before the oldest is evicted. At the default 3 s request
/// cadence this covers roughly ten minutes.
pub const HISTORY_CAPACITY: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryEntry {
    /// BC clock when the record arrived.
    pub at_ms: u64,
    pub record: StatusRecord,
}

pub struct SensorHistory {
    entries: Deque<HistoryEntry, HISTORY_CAPACITY>,
    /// Records accepted since boot, evicted ones included.
    total: u64,
}

impl SensorHistory {
    pub fn new() -> Self {
        Self {
            entries: Deque::new(),
            total: 0,
        }
    }

    pub fn record(&mut self, at_ms: u64, record: StatusRecord) {
        if self.entries.is_full() {
            self.entries.pop_front();
        }
        // Cannot fail: a slot was freed above.
        let _ = self.entries.push_back(HistoryEntry { at_ms, record });
        self.total = self.total.saturating_add(1);
    }

    /// Entries currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Up to `limit` entries, newest first.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev().take(limit)
    }

    /// Every held entry, oldest first.
    pub fn oldest_first(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }
}

impl Default for SensorHistory {
    fn default() -> Self {
        Self::new()
    }
}
