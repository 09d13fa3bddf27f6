//! Application core: pure domain logic, zero I/O.
//!
//! Two services live here, one per controller:
//!
//! - [`service::SacService`] owns the physical loop: sensor fusion,
//!   arbitration and actuator motion, plus the SAC end of the link.
//! - [`bridge::BridgeService`] owns the bridge end of the link: liveness,
//!   the status mirror and the manual-command relay.
//!
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without real peripherals.

pub mod bridge;
pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
