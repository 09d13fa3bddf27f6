//! Non-blocking actuator motion state machine.
//!
//! ```text
//!                start_open()                 tick(): elapsed >= rotation
//!        ┌──────────────────────▶ MovingToOpen ───────────────────────┐
//!        │                         ▲        │                          ▼
//!      Idle ◀───────────────────── │ ────── │ ─────────────────────  Idle
//!        │                         │        ▼                          ▲
//!        └──────────────────────▶ MovingToClosed ─────────────────────┘
//!                start_close()     (opposite start restarts the timer)
//! ```
//!
//! A move never blocks the control loop: [`ActuatorMotion::tick`] is polled
//! every cycle and only flips back to `Idle` once the fixed rotation
//! duration has elapsed. Position is updated optimistically when the move
//! starts, so a status consumer polling mid-motion sees the *target*.
//!
//! The line boots in its default posture, `Open` and `Idle`.

use core::time::Duration;

use log::{debug, info};

use crate::app::ports::ActuatorPort;
use crate::config::SystemConfig;

/// Where the line is (or is being driven to).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Open,
    Closed,
}

/// What the servo is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Idle,
    MovingToOpen,
    MovingToClosed,
}

/// Snapshot of the actuator. `motion_start_ms` is `Some` exactly when
/// `motion != Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorState {
    pub position: Position,
    pub motion: Motion,
    pub motion_start_ms: Option<u64>,
}

impl ActuatorState {
    pub fn is_idle(&self) -> bool {
        self.motion == Motion::Idle
    }
}

pub struct ActuatorMotion {
    state: ActuatorState,
    rotation_ms: u64,
    open_angle: u8,
    closed_angle: u8,
    moves_started: u32,
}

impl ActuatorMotion {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            state: ActuatorState {
                position: Position::Open,
                motion: Motion::Idle,
                motion_start_ms: None,
            },
            rotation_ms: config.rotation_duration_ms,
            open_angle: config.open_angle_deg,
            closed_angle: config.closed_angle_deg,
            moves_started: 0,
        }
    }

    /// Put the servo on the open angle without starting a move.
    ///
    /// Only valid while idle; the position stays `Open` and no timer runs,
    /// so status reads TERBUKA straight away.
    pub fn park(&mut self, hw: &mut impl ActuatorPort) {
        if !self.is_idle() {
            debug!("Actuator busy, park ignored");
            return;
        }
        self.state.position = Position::Open;
        hw.drive_to(self.open_angle);
    }

    /// Begin a move toward the open position.
    ///
    /// Accepted from `Idle` and from `MovingToClosed` (which restarts the
    /// timer toward the new target). Returns `false` when already moving
    /// to open; that move keeps its original timer.
    pub fn start_open(&mut self, now_ms: u64, hw: &mut impl ActuatorPort) -> bool {
        self.start(Motion::MovingToOpen, now_ms, hw)
    }

    /// Begin a move toward the closed position. Mirror of [`Self::start_open`].
    pub fn start_close(&mut self, now_ms: u64, hw: &mut impl ActuatorPort) -> bool {
        self.start(Motion::MovingToClosed, now_ms, hw)
    }

    /// Advance the timer. Returns the settled position on the tick that
    /// completes a move; `None` otherwise (including every later call).
    pub fn tick(&mut self, now_ms: u64, hw: &mut impl ActuatorPort) -> Option<Position> {
        let start = self.state.motion_start_ms?;
        if now_ms.saturating_sub(start) < self.rotation_ms {
            return None;
        }

        self.state.motion = Motion::Idle;
        self.state.motion_start_ms = None;
        hw.release();
        info!("Actuator settled at {:?}", self.state.position);
        Some(self.state.position)
    }

    /// Time left on the current move; zero when idle. Never negative.
    pub fn remaining(&self, now_ms: u64) -> Duration {
        match self.state.motion_start_ms {
            Some(start) => {
                let elapsed = now_ms.saturating_sub(start);
                Duration::from_millis(self.rotation_ms.saturating_sub(elapsed))
            }
            None => Duration::ZERO,
        }
    }

    pub fn state(&self) -> ActuatorState {
        self.state
    }

    pub fn position(&self) -> Position {
        self.state.position
    }

    pub fn motion(&self) -> Motion {
        self.state.motion
    }

    pub fn is_idle(&self) -> bool {
        self.state.is_idle()
    }

    /// Total moves commanded since boot.
    pub fn moves_started(&self) -> u32 {
        self.moves_started
    }

    // ── Internal ──────────────────────────────────────────────

    fn start(&mut self, motion: Motion, now_ms: u64, hw: &mut impl ActuatorPort) -> bool {
        if self.state.motion == motion {
            debug!("Actuator already {:?}, start ignored", motion);
            return false;
        }

        let (position, angle) = match motion {
            Motion::MovingToOpen => (Position::Open, self.open_angle),
            Motion::MovingToClosed => (Position::Closed, self.closed_angle),
            Motion::Idle => return false,
        };

        if self.state.motion != Motion::Idle {
            info!("Actuator redirected {:?} -> {:?}", self.state.motion, motion);
        }

        self.state = ActuatorState {
            position,
            motion,
            motion_start_ms: Some(now_ms),
        };
        self.moves_started = self.moves_started.saturating_add(1);
        hw.drive_to(angle);
        true
    }
}
