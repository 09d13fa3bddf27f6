//! Control policy: who decides where the actuator goes.

pub mod arbiter;

pub use arbiter::{ControlArbiter, ControlMode};
