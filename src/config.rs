//! System configuration parameters
//!
//! Calibration and timing constants for both controllers. Every value is
//! fixed at build time; [`SystemConfig`] only exists to carry them into
//! component constructors (and to let tests build components with a
//! different calibration).

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// --- Sensor calibration ---

/// Smoothed LDR reading above which the environment counts as dark.
/// Higher raw value = darker (LDR divider characteristic).
pub const LDR_THRESHOLD: u16 = 500;
/// Raw moisture reading below which the environment counts as raining.
/// Lower raw value = wetter (resistive rain-board characteristic).
pub const RAIN_THRESHOLD: u16 = 500;
/// Number of light samples in the moving-average window.
pub const SMOOTHING_WINDOW: usize = 10;

// --- Actuator ---

/// Time the servo is given to sweep between end positions.
pub const ROTATION_DURATION_MS: u64 = 3_000;
/// Servo angle for the exposed (open) position.
pub const OPEN_ANGLE_DEG: u8 = 0;
/// Servo angle for the sheltered (closed) position.
pub const CLOSED_ANGLE_DEG: u8 = 180;

// --- Timing ---

/// Control loop cadence on both controllers.
pub const CONTROL_LOOP_INTERVAL_MS: u64 = 100;
/// SAC unsolicited status push cadence.
pub const STATUS_PUSH_INTERVAL_MS: u64 = 3_000;
/// BC status request cadence.
pub const STATUS_REQUEST_INTERVAL_MS: u64 = 3_000;
/// BC waits this long after boot before the first status request.
pub const BOOT_SETTLE_DELAY_MS: u64 = 2_000;
/// BC considers the SAC disconnected after this long without a valid record.
pub const LINK_TIMEOUT_MS: u64 = 5_000;
/// BC retrains the rain forecast model this often.
pub const MODEL_TRAINING_INTERVAL_MS: u64 = 30 * 60 * 1_000;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Sensors ---
    /// Dark threshold on the smoothed LDR value.
    pub ldr_threshold: u16,
    /// Rain threshold on the raw moisture value.
    pub rain_threshold: u16,
    /// Moving-average window (samples).
    pub smoothing_window: usize,

    // --- Actuator ---
    /// Duration of one open/close sweep (milliseconds).
    pub rotation_duration_ms: u64,
    pub open_angle_deg: u8,
    pub closed_angle_deg: u8,

    // --- Timing ---
    /// Control loop interval (milliseconds)
    pub control_loop_interval_ms: u64,
    /// SAC status push interval (milliseconds)
    pub status_push_interval_ms: u64,
    /// BC status request interval (milliseconds)
    pub status_request_interval_ms: u64,
    /// BC boot settle delay before the first request (milliseconds)
    pub boot_settle_delay_ms: u64,
    /// BC link liveness timeout (milliseconds)
    pub link_timeout_ms: u64,
    /// BC forecast model retraining interval (milliseconds)
    pub model_training_interval_ms: u64,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            ldr_threshold: LDR_THRESHOLD,
            rain_threshold: RAIN_THRESHOLD,
            smoothing_window: SMOOTHING_WINDOW,

            rotation_duration_ms: ROTATION_DURATION_MS,
            open_angle_deg: OPEN_ANGLE_DEG,
            closed_angle_deg: CLOSED_ANGLE_DEG,

            control_loop_interval_ms: CONTROL_LOOP_INTERVAL_MS, // 10 Hz
            status_push_interval_ms: STATUS_PUSH_INTERVAL_MS,
            status_request_interval_ms: STATUS_REQUEST_INTERVAL_MS,
            boot_settle_delay_ms: BOOT_SETTLE_DELAY_MS,
            link_timeout_ms: LINK_TIMEOUT_MS,
            model_training_interval_ms: MODEL_TRAINING_INTERVAL_MS,
        }
    }
}

impl SystemConfig {
    /// Reject combinations the controllers cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.smoothing_window == 0 || self.smoothing_window > crate::sensors::light::MAX_WINDOW {
            return Err(ConfigError::ValidationFailed("smoothing_window out of range"));
        }
        if self.rotation_duration_ms == 0 {
            return Err(ConfigError::ValidationFailed("rotation_duration_ms must be > 0"));
        }
        if self.open_angle_deg > 180 || self.closed_angle_deg > 180 {
            return Err(ConfigError::ValidationFailed("servo angle above 180"));
        }
        if self.control_loop_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("control_loop_interval_ms must be > 0"));
        }
        // A healthy link must deliver at least one record per timeout window.
        if self.status_push_interval_ms >= self.link_timeout_ms {
            return Err(ConfigError::ValidationFailed(
                "status_push_interval_ms must be below link_timeout_ms",
            ));
        }
        if self.status_request_interval_ms >= self.link_timeout_ms {
            return Err(ConfigError::ValidationFailed(
                "status_request_interval_ms must be below link_timeout_ms",
            ));
        }
        if self.model_training_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("model_training_interval_ms must be > 0"));
        }
        Ok(())
    }
}
