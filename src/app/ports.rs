//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ SacService / BridgeService (domain)
//! ```
//!
//! Driven adapters (transducers, the servo, event sinks, clocks) implement
//! these traits. The services consume them via generics, so the domain core
//! never touches hardware directly. The serial link has its own port,
//! [`Transport`](crate::link::transport::Transport).

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this once per control cycle.
pub trait SensorPort {
    /// Raw LDR divider reading (higher = darker).
    fn read_light_raw(&mut self) -> u16;

    /// Raw rain-board reading (lower = wetter).
    fn read_moisture_raw(&mut self) -> u16;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the single rotational actuator.
pub trait ActuatorPort {
    /// Command the servo toward `angle_deg` (0–180). Re-engages the
    /// output if it had been released.
    fn drive_to(&mut self, angle_deg: u8);

    /// De-energise the servo so it stops holding torque.
    fn release(&mut self);

    /// Whether the output is currently energised.
    fn is_engaged(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / display)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go (serial log,
/// indicator LEDs, a display).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock. Only the orchestrating loop reads it;
/// every domain call receives `now_ms` explicitly.
pub trait ClockPort {
    fn now_ms(&self) -> u64;
}
