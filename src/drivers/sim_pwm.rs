//! In-memory PWM channel for host simulation and tests.

use core::convert::Infallible;

use embedded_hal::pwm::{ErrorType, SetDutyCycle};

use super::servo::FRAME_US;

/// A 14-bit PWM channel that only remembers its duty.
#[derive(Debug, Default)]
pub struct SimPwm {
    duty: u16,
    writes: u32,
}

impl SimPwm {
    /// 14-bit resolution, a common choice for 50 Hz servo timers.
    pub const MAX_DUTY: u16 = 16_383;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn duty(&self) -> u16 {
        self.duty
    }

    /// Number of duty writes, including writes of 0.
    pub fn writes(&self) -> u32 {
        self.writes
    }

    /// High time per frame, or `None` when the channel is off.
    pub fn pulse_width_us(&self) -> Option<u16> {
        if self.duty == 0 {
            return None;
        }
        let us = u32::from(self.duty) * u32::from(FRAME_US) / u32::from(Self::MAX_DUTY);
        // Round to the nearest 10 µs to absorb duty quantisation.
        Some(((us + 5) / 10 * 10) as u16)
    }
}

impl ErrorType for SimPwm {
    type Error = Infallible;
}

impl SetDutyCycle for SimPwm {
    fn max_duty_cycle(&self) -> u16 {
        Self::MAX_DUTY
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.duty = duty.min(Self::MAX_DUTY);
        self.writes += 1;
        Ok(())
    }
}
