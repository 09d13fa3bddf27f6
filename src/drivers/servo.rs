//! Hobby servo driver (SG90-class, 50 Hz).
//!
//! Position is encoded as pulse width within a 20 ms frame:
//!
//! ```text
//!   0°   → 0.5 ms     90° → 1.5 ms     180° → 2.5 ms
//! ```
//!
//! The driver is generic over any `embedded_hal::pwm::SetDutyCycle`
//! channel, so the same code runs on an MCU timer channel and on
//! [`SimPwm`](super::sim_pwm::SimPwm) on the host.
//!
//! ## Release
//!
//! [`ServoDriver::release`] drives the channel fully off. With no pulses
//! the servo stops holding torque (no buzz, no stall current once the
//! line is in place). The next `drive_to` re-engages it.

use embedded_hal::pwm::SetDutyCycle;
use log::warn;

/// PWM frame length at 50 Hz.
pub const FRAME_US: u16 = 20_000;
/// Pulse width at 0°.
pub const MIN_PULSE_US: u16 = 500;
/// Pulse width at 180°.
pub const MAX_PULSE_US: u16 = 2_500;

pub fn pulse_width_us(angle_deg: u8) -> u16 {
    let angle = u32::from(angle_deg.min(180));
    let span = u32::from(MAX_PULSE_US - MIN_PULSE_US);
    MIN_PULSE_US + (angle * span / 180) as u16
}

pub struct ServoDriver<P: SetDutyCycle> {
    pwm: P,
    angle_deg: Option<u8>,
    engaged: bool,
}

impl<P: SetDutyCycle> ServoDriver<P> {
    /// Takes ownership of the channel and leaves it released.
    pub fn new(mut pwm: P) -> Self {
        if let Err(e) = pwm.set_duty_cycle_fully_off() {
            warn!("Servo PWM init failed: {:?}", e);
        }
        Self {
            pwm,
            angle_deg: None,
            engaged: false,
        }
    }

    pub fn drive_to(&mut self, angle_deg: u8) {
        let angle = angle_deg.min(180);
        match self.pwm.set_duty_cycle_fraction(pulse_width_us(angle), FRAME_US) {
            Ok(()) => {
                self.angle_deg = Some(angle);
                self.engaged = true;
            }
            Err(e) => warn!("Servo drive to {}° failed: {:?}", angle, e),
        }
    }

    pub fn release(&mut self) {
        if let Err(e) = self.pwm.set_duty_cycle_fully_off() {
            warn!("Servo release failed: {:?}", e);
            return;
        }
        self.engaged = false;
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    /// Last commanded angle. Kept across a release.
    pub fn angle_deg(&self) -> Option<u8> {
        self.angle_deg
    }

    pub fn pwm(&self) -> &P {
        &self.pwm
    }
}
