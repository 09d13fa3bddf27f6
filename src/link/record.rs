//! The SAC status record is the only structured payload on the link.
//!
//! The labels keep the strings the deployed dashboards already match on.

use serde::{Deserialize, Serialize};

use crate::error::LinkError;
use crate::motion::{ActuatorState, Motion, Position};
use crate::sensors::SensorSample;

/// Human-readable actuator status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusLabel {
    /// No record received yet. Only the BC mirror shows this.
    #[serde(rename = "MENDETEKSI...")]
    Detecting,
    #[serde(rename = "MEMBUKA...")]
    Opening,
    #[serde(rename = "MENUTUP...")]
    Closing,
    #[serde(rename = "TERBUKA")]
    Open,
    #[serde(rename = "TERTUTUP")]
    Closed,
}

impl StatusLabel {
    pub fn from_state(state: &ActuatorState) -> Self {
        match (state.motion, state.position) {
            (Motion::MovingToOpen, _) => Self::Opening,
            (Motion::MovingToClosed, _) => Self::Closing,
            (Motion::Idle, Position::Open) => Self::Open,
            (Motion::Idle, Position::Closed) => Self::Closed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeatherLabel {
    #[serde(rename = "CERAH")]
    Clear,
    #[serde(rename = "HUJAN")]
    Raining,
}

impl WeatherLabel {
    pub fn from_sample(sample: &SensorSample) -> Self {
        if sample.is_raining {
            Self::Raining
        } else {
            Self::Clear
        }
    }
}

/// One line of SAC → BC status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    /// Smoothed LDR value.
    pub ldr: u16,
    /// Raw rain-board value.
    pub rain: u16,
    pub status: StatusLabel,
    pub weather: WeatherLabel,
    /// Whole seconds left on the current move, rounded up; 0 when idle.
    pub rotation: u32,
}

impl StatusRecord {
    /// What the bridge shows before it has heard from the SAC.
    pub const UNKNOWN: Self = Self {
        ldr: 0,
        rain: 0,
        status: StatusLabel::Detecting,
        weather: WeatherLabel::Clear,
        rotation: 0,
    };

    pub fn build(sample: &SensorSample, state: &ActuatorState, remaining_ms: u64) -> Self {
        Self {
            ldr: sample.light_smoothed,
            rain: sample.moisture_raw,
            status: StatusLabel::from_state(state),
            weather: WeatherLabel::from_sample(sample),
            rotation: remaining_ms.div_ceil(1000) as u32,
        }
    }

    /// Parse one received line (terminator already removed).
    ///
    /// The line must be enclosed in `{` … `}`; anything else is a partial
    /// or garbled transmission and is rejected without being parsed.
    pub fn parse_line(line: &[u8]) -> Result<Self, LinkError> {
        let line = line.trim_ascii();
        if !(line.starts_with(b"{") && line.ends_with(b"}")) {
            return Err(LinkError::Unframed);
        }
        serde_json::from_slice(line).map_err(|_| LinkError::Malformed)
    }
}

impl Default for StatusRecord {
    fn default() -> Self {
        Self::UNKNOWN
    }
}
