//! SAC application service, the hexagonal core of the sensor/actuator
//! controller.
//!
//! [`SacService`] owns sensor fusion, the actuator state machine, the
//! control arbiter and the SAC end of the link, and threads them together
//! once per control cycle. All I/O flows through port traits injected at
//! call sites, so the whole service is testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                 │          SacService          │
//! ActuatorPort ◀──│ Fusion · Arbiter · Motion    │ ◀─▶ Transport
//!                 └──────────────────────────────┘
//! ```

use log::info;

use crate::config::SystemConfig;
use crate::control::{ControlArbiter, ControlMode};
use crate::diagnostics::RuntimeMetrics;
use crate::link::record::StatusRecord;
use crate::link::sac::SacLink;
use crate::link::transport::Transport;
use crate::motion::{ActuatorMotion, ActuatorState, Position};
use crate::sensors::{SensorFusion, SensorSample};

use super::events::AppEvent;
use super::ports::{ActuatorPort, EventSink, SensorPort};

// ───────────────────────────────────────────────────────────────
// SacService
// ───────────────────────────────────────────────────────────────

pub struct SacService {
    sensors: SensorFusion,
    actuator: ActuatorMotion,
    arbiter: ControlArbiter,
    link: SacLink,
    started_at_ms: u64,
    cycles: u64,
}

impl SacService {
    /// Construct the service. The actuator starts in its default posture,
    /// open and idle.
    pub fn new(config: &SystemConfig, now_ms: u64) -> Self {
        Self {
            sensors: SensorFusion::new(config),
            actuator: ActuatorMotion::new(config),
            arbiter: ControlArbiter::new(),
            link: SacLink::new(config, now_ms),
            started_at_ms: now_ms,
            cycles: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Park the servo at the open angle. No move is started, so the first
    /// cycle already arbitrates from `Open`/`Idle`.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        self.actuator.park(hw);
        sink.emit(&AppEvent::Started(self.actuator.position()));
        info!("SacService started, parked {:?}", self.actuator.position());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle:
    /// drain link → sample → advance motion → arbitrate → report.
    ///
    /// `hw` satisfies both [`SensorPort`] and [`ActuatorPort`] so sensing
    /// and actuation share one adapter without a double borrow.
    pub fn tick<T: Transport>(
        &mut self,
        now_ms: u64,
        hw: &mut (impl SensorPort + ActuatorPort),
        transport: &mut T,
        sink: &mut impl EventSink,
    ) {
        self.cycles += 1;

        // 1. Inbound commands. Manual ones wait for this cycle's evaluate().
        let replies_owed = self.link.drain(transport);

        // 2. Sensors.
        let sample = self.sensors.sample(hw);

        // 3. Motion.
        let completed = self.actuator.tick(now_ms, hw);
        if let Some(position) = completed {
            sink.emit(&AppEvent::MoveCompleted(position));
        }

        // 4. Arbitration.
        let manual = self.link.take_manual();
        let mode_before = self.arbiter.mode();
        let started =
            self.arbiter
                .evaluate(&sample, manual, &mut self.actuator, hw, now_ms);
        let mode_after = self.arbiter.mode();
        if mode_after != mode_before {
            sink.emit(&AppEvent::ModeChanged {
                from: mode_before,
                to: mode_after,
            });
        }
        if let Some(target) = started {
            sink.emit(&AppEvent::MoveStarted {
                target,
                mode: mode_after,
            });
        }

        // 5. Status out: command replies and status changes go immediately,
        //    otherwise on the periodic push.
        let changed = self.arbiter.take_status_changed() || completed.is_some();
        if replies_owed > 0 || changed || self.link.push_due(now_ms) {
            let record = self.status_record(now_ms);
            if self.link.send_status(transport, &record, now_ms).is_ok() {
                sink.emit(&AppEvent::Telemetry(record));
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// The record that would go on the wire right now.
    pub fn status_record(&self, now_ms: u64) -> StatusRecord {
        let remaining_ms = self.actuator.remaining(now_ms).as_millis() as u64;
        StatusRecord::build(&self.sensors.last(), &self.actuator.state(), remaining_ms)
    }

    pub fn mode(&self) -> ControlMode {
        self.arbiter.mode()
    }

    pub fn actuator_state(&self) -> ActuatorState {
        self.actuator.state()
    }

    pub fn position(&self) -> Position {
        self.actuator.position()
    }

    pub fn last_sample(&self) -> SensorSample {
        self.sensors.last()
    }

    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        self.actuator.remaining(now_ms).as_millis() as u64
    }

    pub fn metrics(&self, now_ms: u64) -> RuntimeMetrics {
        RuntimeMetrics {
            uptime_ms: now_ms.saturating_sub(self.started_at_ms),
            control_cycles: self.cycles,
            moves_started: self.actuator.moves_started(),
            link: self.link.stats(),
        }
    }
}
