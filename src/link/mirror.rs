//! BC status mirror, the replicated read model of the SAC's state.
//!
//! Written only by the bridge receive path, read by the HTTP boundary.
//! The whole record lives in one `Cell` behind a critical-section mutex:
//! a replacement is a single swap and a read is a single copy, so a reader
//! can never observe a mix of old and new fields.

use core::cell::Cell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

use super::record::StatusRecord;

pub struct StatusMirror {
    inner: Mutex<CriticalSectionRawMutex, Cell<StatusRecord>>,
}

impl StatusMirror {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(Cell::new(StatusRecord::UNKNOWN)),
        }
    }

    /// Replace every field at once. Returns the previous record.
    pub fn replace(&self, record: StatusRecord) -> StatusRecord {
        self.inner.lock(|cell| cell.replace(record))
    }

    /// Copy of the current record.
    pub fn snapshot(&self) -> StatusRecord {
        self.inner.lock(Cell::get)
    }
}

impl Default for StatusMirror {
    fn default() -> Self {
        Self::new()
    }
}
