//! Outbound application events.
//!
//! The services emit these through the [`EventSink`](super::ports::EventSink)
//! port. Adapters on the other side decide what to do with them.

use crate::control::ControlMode;
use crate::link::record::StatusRecord;
use crate::motion::Position;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The SAC finished boot, parked in its default posture.
    Started(Position),

    /// A new move was commanded. `mode` is the owner of the move.
    MoveStarted { target: Position, mode: ControlMode },

    /// A move ran its full duration and the servo was released.
    MoveCompleted(Position),

    /// Control ownership changed.
    ModeChanged { from: ControlMode, to: ControlMode },

    /// A status record was pushed to (SAC) or accepted from (BC) the link.
    Telemetry(StatusRecord),

    /// BC: first valid record after silence.
    LinkUp,

    /// BC: no valid record within the link timeout.
    LinkDown,
}
