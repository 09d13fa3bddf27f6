//! Sensor fusion: the LDR smoother plus the threshold classifiers.
//!
//! [`SensorFusion`] produces one [`SensorSample`] per control cycle. Raw
//! readings are accepted as-is; out-of-range values simply classify by the
//! same threshold comparison as everything else.
//!
//! Both transducers are inverted relative to intuition and that must stay
//! that way:
//!
//! ```text
//!   LDR divider:   higher raw  = darker    -> is_dark    = smoothed > LDR_THRESHOLD
//!   rain board:    lower raw   = wetter    -> is_raining = moisture < RAIN_THRESHOLD
//! ```

pub mod light;

use crate::app::ports::SensorPort;
use crate::config::SystemConfig;
use light::LightSmoother;

/// A point-in-time view of both sensors after smoothing and classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SensorSample {
    /// Latest raw LDR ADC value.
    pub light_raw: u16,
    /// Moving average of the last `smoothing_window` LDR values.
    pub light_smoothed: u16,
    /// Latest raw rain-board ADC value.
    pub moisture_raw: u16,
    pub is_dark: bool,
    pub is_raining: bool,
}

impl SensorSample {
    /// Conditions under which laundry belongs under shelter.
    pub fn should_be_closed(&self) -> bool {
        self.is_raining || self.is_dark
    }
}

pub struct SensorFusion {
    light: LightSmoother,
    ldr_threshold: u16,
    rain_threshold: u16,
    last: SensorSample,
}

impl SensorFusion {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            light: LightSmoother::new(config.smoothing_window),
            ldr_threshold: config.ldr_threshold,
            rain_threshold: config.rain_threshold,
            last: SensorSample::default(),
        }
    }

    /// Read both transducers through the port and classify.
    pub fn sample(&mut self, hw: &mut impl SensorPort) -> SensorSample {
        let light_raw = hw.read_light_raw();
        let moisture_raw = hw.read_moisture_raw();
        self.ingest(light_raw, moisture_raw)
    }

    /// Classify an already-read pair of raw values.
    pub fn ingest(&mut self, light_raw: u16, moisture_raw: u16) -> SensorSample {
        let light_smoothed = self.light.push(light_raw);

        self.last = SensorSample {
            light_raw,
            light_smoothed,
            moisture_raw,
            is_dark: light_smoothed > self.ldr_threshold,
            is_raining: moisture_raw < self.rain_threshold,
        };
        self.last
    }

    /// Most recent sample (default before the first cycle).
    pub fn last(&self) -> SensorSample {
        self.last
    }
}
