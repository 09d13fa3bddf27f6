//! BC-side liveness of the SAC.
//!
//! `connected` is never stored: it is derived on every query from the time
//! of the last valid record, so it cannot drift out of sync with it.

pub struct LinkHealth {
    last_response_ms: Option<u64>,
    timeout_ms: u64,
}

impl LinkHealth {
    pub fn new(timeout_ms: u64) -> Self {
        Self {
            last_response_ms: None,
            timeout_ms,
        }
    }

    /// Note a complete, parseable record received at `now_ms`.
    pub fn record_response(&mut self, now_ms: u64) {
        self.last_response_ms = Some(now_ms);
    }

    /// True for every `now_ms` in `[last, last + timeout)`.
    pub fn is_connected(&self, now_ms: u64) -> bool {
        self.last_response_ms
            .is_some_and(|last| now_ms.saturating_sub(last) < self.timeout_ms)
    }

    pub fn last_response_ms(&self) -> Option<u64> {
        self.last_response_ms
    }
}
