//! Millisecond timers for the cooperative control loops.
//!
//! Both controllers run one loop with a fixed inter-cycle delay; anything
//! that happens "every N seconds" or "once after N seconds" is a timer
//! polled with the loop's `now_ms`. Nothing here sleeps.
//!
//! ```text
//!  BC:   boot ──settle──▶ S ──interval──▶ S ──interval──▶ S …
//!  SAC:  boot ──interval──▶ push ──interval──▶ push …
//! ```

use log::debug;

/// Recurring timer. Fires at most once per poll; if the loop stalls past
/// several intervals it fires once and re-phases from `now`, it does not
/// replay the missed ones.
#[derive(Debug, Clone)]
pub struct Periodic {
    label: &'static str,
    interval_ms: u64,
    next_due_ms: u64,
}

impl Periodic {
    /// First fire is one interval after `now_ms`.
    pub fn new(label: &'static str, interval_ms: u64, now_ms: u64) -> Self {
        Self {
            label,
            interval_ms,
            next_due_ms: now_ms.saturating_add(interval_ms),
        }
    }

    /// Returns `true` if the timer fired.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        if now_ms < self.next_due_ms {
            return false;
        }
        self.next_due_ms = now_ms.saturating_add(self.interval_ms);
        debug!("timer '{}' fired at {}ms", self.label, now_ms);
        true
    }

    /// Restart the interval from `now_ms` (e.g. after an out-of-band push).
    pub fn restart(&mut self, now_ms: u64) {
        self.next_due_ms = now_ms.saturating_add(self.interval_ms);
    }

    pub fn next_due_ms(&self) -> u64 {
        self.next_due_ms
    }
}

/// Single-fire timer.
#[derive(Debug, Clone)]
pub struct OneShot {
    label: &'static str,
    due_ms: Option<u64>,
}

impl OneShot {
    /// Armed to fire `delay_ms` after `now_ms`.
    pub fn armed(label: &'static str, delay_ms: u64, now_ms: u64) -> Self {
        Self {
            label,
            due_ms: Some(now_ms.saturating_add(delay_ms)),
        }
    }

    /// Returns `true` exactly once, on the first poll at or after the
    /// due time.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.due_ms {
            Some(due) if now_ms >= due => {
                self.due_ms = None;
                debug!("one-shot '{}' fired at {}ms", self.label, now_ms);
                true
            }
            _ => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.due_ms.is_some()
    }
}
