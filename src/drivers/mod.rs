//! Actuator drivers.

pub mod servo;
pub mod sim_pwm;
