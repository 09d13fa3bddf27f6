//! SAC end of the link.
//!
//! Drains command bytes from the transport, queues manual commands for the
//! next arbitration cycle, and writes status records: one per received
//! command plus the periodic / on-change pushes the service asks for.

use log::{debug, warn};

use crate::app::commands::ManualCommand;
use crate::config::SystemConfig;
use crate::diagnostics::{LinkStats, bump};
use crate::error::LinkError;
use crate::scheduler::Periodic;

use super::codec::{Command, CommandDecoder, LinkMessage};
use super::record::StatusRecord;
use super::transport::Transport;

/// Bytes pulled from the transport per read call.
const RX_CHUNK: usize = 32;

pub struct SacLink {
    decoder: CommandDecoder,
    /// Latest manual command not yet handed to the arbiter. A newer one
    /// overwrites an older one received in the same cycle.
    pending_manual: Option<ManualCommand>,
    push_timer: Periodic,
    stats: LinkStats,
}

impl SacLink {
    pub fn new(config: &SystemConfig, now_ms: u64) -> Self {
        Self {
            decoder: CommandDecoder::new(),
            pending_manual: None,
            push_timer: Periodic::new("status-push", config.status_push_interval_ms, now_ms),
            stats: LinkStats::default(),
        }
    }

    /// Feed one received byte.
    pub fn on_byte_received(&mut self, b: u8) -> Option<Command> {
        let cmd = self.decoder.push(b)?;
        debug!("SAC rx command {:?}", cmd);
        if let Some(manual) = cmd.manual() {
            if let Some(prev) = self.pending_manual.replace(manual) {
                debug!("Manual {:?} superseded by {:?}", prev, manual);
            }
        }
        Some(cmd)
    }

    /// Drain everything available without blocking. Returns how many
    /// commands arrived; each one is owed a status reply.
    pub fn drain<T: Transport>(&mut self, transport: &mut T) -> usize {
        let mut commands = 0;
        let mut buf = [0u8; RX_CHUNK];
        while transport.available() {
            let n = match transport.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) => {
                    warn!("SAC link read failed: {:?}", e);
                    break;
                }
            };
            commands += buf[..n]
                .iter()
                .filter(|&&b| self.on_byte_received(b).is_some())
                .count();
        }
        commands
    }

    /// Hand the pending manual command to the arbiter.
    pub fn take_manual(&mut self) -> Option<ManualCommand> {
        self.pending_manual.take()
    }

    /// Write one status line. Restarts the periodic push timer so a
    /// reply and a push never go out back to back.
    pub fn send_status<T: Transport>(
        &mut self,
        transport: &mut T,
        record: &StatusRecord,
        now_ms: u64,
    ) -> Result<(), LinkError> {
        let bytes = LinkMessage::Status(*record).encode()?;
        let result = match transport.write(&bytes) {
            Ok(n) if n == bytes.len() => transport.flush().map_err(|e| {
                warn!("SAC link flush failed: {:?}", e);
                LinkError::Transport
            }),
            Ok(n) => {
                warn!("SAC link short write: {}/{} bytes", n, bytes.len());
                Err(LinkError::Transport)
            }
            Err(e) => {
                warn!("SAC link write failed: {:?}", e);
                Err(LinkError::Transport)
            }
        };

        self.push_timer.restart(now_ms);
        match result {
            Ok(()) => bump(&mut self.stats.records_sent),
            Err(_) => bump(&mut self.stats.send_failures),
        }
        result
    }

    /// Whether the periodic push interval has elapsed.
    pub fn push_due(&mut self, now_ms: u64) -> bool {
        self.push_timer.poll(now_ms)
    }

    pub fn stats(&self) -> LinkStats {
        LinkStats {
            bytes_ignored: self.decoder.ignored(),
            ..self.stats
        }
    }
}
