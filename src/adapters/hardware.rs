//! Hardware adapter: bridges peripherals to domain port traits.
//!
//! [`SimHardware`] stands in for the SAC board on the host: preset light
//! and rain readings and a real [`ServoDriver`] over a [`SimPwm`] channel.
//! A board adapter implements the same two ports over its ADC and timer
//! channel; nothing in the core changes.

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::drivers::servo::ServoDriver;
use crate::drivers::sim_pwm::SimPwm;

/// Raw LDR reading for full daylight.
pub const LIGHT_BRIGHT: u16 = 200;
/// Raw LDR reading at night.
pub const LIGHT_DARK: u16 = 850;
/// Raw rain-board reading, dry.
pub const MOISTURE_DRY: u16 = 950;
/// Raw rain-board reading under rain.
pub const MOISTURE_WET: u16 = 250;

pub struct SimHardware {
    light_raw: u16,
    moisture_raw: u16,
    servo: ServoDriver<SimPwm>,
}

impl SimHardware {
    /// Bright and dry, servo released.
    pub fn new() -> Self {
        Self {
            light_raw: LIGHT_BRIGHT,
            moisture_raw: MOISTURE_DRY,
            servo: ServoDriver::new(SimPwm::new()),
        }
    }

    pub fn set_weather(&mut self, dark: bool, raining: bool) {
        self.light_raw = if dark { LIGHT_DARK } else { LIGHT_BRIGHT };
        self.moisture_raw = if raining { MOISTURE_WET } else { MOISTURE_DRY };
    }

    pub fn servo(&self) -> &ServoDriver<SimPwm> {
        &self.servo
    }
}

impl Default for SimHardware {
    fn default() -> Self {
        Self::new()
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for SimHardware {
    fn read_light_raw(&mut self) -> u16 {
        self.light_raw
    }

    fn read_moisture_raw(&mut self) -> u16 {
        self.moisture_raw
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for SimHardware {
    fn drive_to(&mut self, angle_deg: u8) {
        self.servo.drive_to(angle_deg);
    }

    fn release(&mut self) {
        self.servo.release();
    }

    fn is_engaged(&self) -> bool {
        self.servo.is_engaged()
    }
}
