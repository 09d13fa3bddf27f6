//! Runtime diagnostics.
//!
//! Counters only; nothing here influences control. Malformed link traffic
//! ends up here (and in the log) instead of being surfaced as an error.

use serde::Serialize;

/// Per-controller link counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LinkStats {
    /// Valid status records accepted into the mirror (BC).
    pub records_received: u32,
    /// Lines discarded as partial, malformed or over-long (BC).
    pub lines_discarded: u32,
    /// Manual commands written to the link (BC).
    pub commands_relayed: u32,
    /// Manual commands refused at the HTTP boundary (BC).
    pub commands_rejected: u32,
    /// Status records written to the link (SAC).
    pub records_sent: u32,
    /// Received bytes that were not commands, whitespace excluded (SAC).
    pub bytes_ignored: u32,
    /// Writes the transport refused or truncated.
    pub send_failures: u32,
}

/// Runtime diagnostics snapshot collected on demand.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RuntimeMetrics {
    pub uptime_ms: u64,
    pub control_cycles: u64,
    pub moves_started: u32,
    pub link: LinkStats,
}

pub(crate) fn bump(counter: &mut u32) {
    *counter = counter.saturating_add(1);
}
