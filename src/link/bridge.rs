//! BC end of the link.
//!
//! ```text
//!   boot ──settle delay──▶ 'S' ──request interval──▶ 'S' ──▶ …
//!
//!   rx bytes ──▶ LineFramer ──▶ StatusRecord::parse_line ──▶ on_record()
//!                    │                    │                     + LinkHealth
//!                    └── overflow ────────┴── rejected ──▶ warn!, counted
//! ```
//!
//! Nothing received here is trusted until it parses as a whole record; a
//! rejected line changes neither the mirror nor the liveness timestamp.

use log::{debug, warn};

use crate::config::SystemConfig;
use crate::diagnostics::{LinkStats, bump};
use crate::error::LinkError;
use crate::scheduler::{OneShot, Periodic};

use super::codec::{Command, LineFramer, LinkMessage};
use super::health::LinkHealth;
use super::record::StatusRecord;
use super::transport::Transport;

const RX_CHUNK: usize = 64;

pub struct BridgeLink {
    framer: LineFramer,
    health: LinkHealth,
    settle: OneShot,
    /// Started once the settle delay has elapsed.
    cadence: Option<Periodic>,
    request_interval_ms: u64,
    stats: LinkStats,
}

impl BridgeLink {
    pub fn new(config: &SystemConfig, now_ms: u64) -> Self {
        Self {
            framer: LineFramer::new(),
            health: LinkHealth::new(config.link_timeout_ms),
            settle: OneShot::armed("boot-settle", config.boot_settle_delay_ms, now_ms),
            cadence: None,
            request_interval_ms: config.status_request_interval_ms,
            stats: LinkStats::default(),
        }
    }

    /// Send a status request if one is due. Returns `true` if one was sent.
    pub fn poll_request<T: Transport>(&mut self, now_ms: u64, transport: &mut T) -> bool {
        let due = if let Some(cadence) = self.cadence.as_mut() {
            cadence.poll(now_ms)
        } else if self.settle.poll(now_ms) {
            self.cadence = Some(Periodic::new(
                "status-request",
                self.request_interval_ms,
                now_ms,
            ));
            true
        } else {
            false
        };
        due && self.write(transport, Command::RequestStatus).is_ok()
    }

    /// Write a command. Manual commands are counted as relayed.
    pub fn send_command<T: Transport>(
        &mut self,
        transport: &mut T,
        cmd: Command,
    ) -> Result<(), LinkError> {
        self.write(transport, cmd)?;
        if cmd.manual().is_some() {
            bump(&mut self.stats.commands_relayed);
        }
        Ok(())
    }

    /// Drain received bytes without blocking. Each accepted record is
    /// passed to `on_record`; returns how many were accepted.
    pub fn drain<T: Transport>(
        &mut self,
        now_ms: u64,
        transport: &mut T,
        mut on_record: impl FnMut(StatusRecord),
    ) -> usize {
        let mut accepted = 0;
        let mut buf = [0u8; RX_CHUNK];
        while transport.available() {
            let n = match transport.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) => {
                    warn!("BC link read failed: {:?}", e);
                    break;
                }
            };
            for &b in &buf[..n] {
                let Some(line) = self.framer.push(b) else {
                    continue;
                };
                match line.and_then(|l| StatusRecord::parse_line(&l)) {
                    Ok(record) => {
                        debug!("BC rx {:?}", record);
                        self.health.record_response(now_ms);
                        bump(&mut self.stats.records_received);
                        on_record(record);
                        accepted += 1;
                    }
                    Err(e) => {
                        warn!("BC discarded line: {}", e);
                        bump(&mut self.stats.lines_discarded);
                    }
                }
            }
        }
        accepted
    }

    pub fn is_connected(&self, now_ms: u64) -> bool {
        self.health.is_connected(now_ms)
    }

    pub fn stats(&self) -> LinkStats {
        self.stats
    }

    fn write<T: Transport>(&mut self, transport: &mut T, cmd: Command) -> Result<(), LinkError> {
        let bytes = LinkMessage::Command(cmd).encode()?;
        let written = transport.write(&bytes).map_err(|e| {
            warn!("BC link write failed: {:?}", e);
            LinkError::Transport
        });
        match written {
            Ok(n) if n == bytes.len() => {
                debug!("BC tx {:?}", cmd);
                Ok(())
            }
            Ok(_) | Err(_) => {
                bump(&mut self.stats.send_failures);
                Err(LinkError::Transport)
            }
        }
    }
}
