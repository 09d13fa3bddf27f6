//! Control arbiter: fuses the sensor sample with manual commands into at
//! most one actuator start per cycle.
//!
//! ## Policy
//!
//! 1. A manual command always wins: mode becomes `Manual` and the matching
//!    start is issued even mid-motion.
//! 2. While `Manual`, sensors are ignored until the manual move settles;
//!    the first idle cycle hands control back to `Autonomous`.
//! 3. While `Autonomous`, a move is only started from idle, toward the
//!    position the sample asks for. An in-flight move is never redirected
//!    by a changed reading.
//!
//! Rule 3 together with the plain threshold classification is the only
//! anti-chatter mechanism. There is no hysteresis band.

use log::info;
use serde::Serialize;

use crate::app::commands::ManualCommand;
use crate::app::ports::ActuatorPort;
use crate::motion::{ActuatorMotion, Position};
use crate::sensors::SensorSample;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ControlMode {
    Autonomous,
    Manual,
}

pub struct ControlArbiter {
    mode: ControlMode,
    /// Set whenever a move is started; consumed by the link push path.
    status_changed: bool,
}

impl ControlArbiter {
    pub fn new() -> Self {
        Self {
            mode: ControlMode::Autonomous,
            status_changed: false,
        }
    }

    /// Run one arbitration cycle. Returns the target of a move started
    /// this cycle, if any.
    pub fn evaluate(
        &mut self,
        sample: &SensorSample,
        manual: Option<ManualCommand>,
        actuator: &mut ActuatorMotion,
        hw: &mut impl ActuatorPort,
        now_ms: u64,
    ) -> Option<Position> {
        if let Some(cmd) = manual {
            self.set_mode(ControlMode::Manual);
            let started = match cmd {
                ManualCommand::Open => actuator.start_open(now_ms, hw),
                ManualCommand::Close => actuator.start_close(now_ms, hw),
            };
            return self.note_start(started, actuator);
        }

        if self.mode == ControlMode::Manual {
            if actuator.is_idle() {
                self.set_mode(ControlMode::Autonomous);
            }
            return None;
        }

        if !actuator.is_idle() {
            return None;
        }

        let started = if sample.should_be_closed() {
            actuator.position() != Position::Closed && actuator.start_close(now_ms, hw)
        } else {
            actuator.position() != Position::Open && actuator.start_open(now_ms, hw)
        };
        self.note_start(started, actuator)
    }

    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    /// Read and clear the status-changed flag.
    pub fn take_status_changed(&mut self) -> bool {
        core::mem::take(&mut self.status_changed)
    }

    // ── Internal ──────────────────────────────────────────────

    fn set_mode(&mut self, mode: ControlMode) {
        if self.mode != mode {
            info!("Control mode {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }
    }

    fn note_start(&mut self, started: bool, actuator: &ActuatorMotion) -> Option<Position> {
        if !started {
            return None;
        }
        self.status_changed = true;
        info!("{:?} move started toward {:?}", self.mode, actuator.position());
        Some(actuator.position())
    }
}

impl Default for ControlArbiter {
    fn default() -> Self {
        Self::new()
    }
}
