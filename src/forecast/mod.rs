//! Next-hour rain forecast on the BC.
//!
//! A [`DecisionTree`] is trained on the sensor history: every run of
//! [`WINDOW`] consecutive records is one sample, labelled with whether the
//! record right after it reported rain. A forecast feeds the latest
//! [`WINDOW`] records through the tree.
//!
//! The model lives in RAM only and is retrained on a timer, so after a
//! reboot forecasts are unavailable until enough history has arrived.

pub mod tree;

use alloc::vec::Vec;

use log::info;
use serde::Serialize;

use crate::config::SystemConfig;
use crate::error::ForecastError;
use crate::history::SensorHistory;
use crate::link::record::StatusRecord;

use self::tree::{DecisionTree, FEATURES, Features, TreeParams};

/// Records per forecast input.
pub const WINDOW: usize = FEATURES / 2;
/// History needed before a training run is attempted.
pub const MIN_TRAINING_RECORDS: usize = WINDOW + 11;

/// Reported probability is `FLOOR + p * SPAN` for leaf rain fraction `p`.
const PROBABILITY_FLOOR: f32 = 0.60;
const PROBABILITY_SPAN: f32 = 0.35;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Forecast {
    pub will_rain: bool,
    pub probability: f32,
}

/// Outcome of the last successful training run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelInfo {
    pub trained: bool,
    /// Held-out accuracy in `0.0..=1.0`.
    pub accuracy: Option<f32>,
    pub last_training_ms: Option<u64>,
    /// Records the model was trained on.
    pub records: usize,
}

pub struct RainPredictor {
    tree: Option<DecisionTree>,
    info: ModelInfo,
    rain_threshold: u16,
    params: TreeParams,
}

impl RainPredictor {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            tree: None,
            info: ModelInfo {
                trained: false,
                accuracy: None,
                last_training_ms: None,
                records: 0,
            },
            rain_threshold: config.rain_threshold,
            params: TreeParams::default(),
        }
    }

    /// Train on everything the history holds. The first 80% of samples fit
    /// the tree; accuracy is measured on the rest. On error the previous
    /// model is kept.
    pub fn train(&mut self, history: &SensorHistory, now_ms: u64) -> Result<f32, ForecastError> {
        let records: Vec<StatusRecord> = history.oldest_first().map(|e| e.record).collect();
        if records.len() < MIN_TRAINING_RECORDS {
            return Err(ForecastError::InsufficientData {
                needed: MIN_TRAINING_RECORDS,
                have: records.len(),
            });
        }

        let samples: Vec<(Features, bool)> = records
            .windows(WINDOW + 1)
            .map(|w| (features(&w[..WINDOW]), w[WINDOW].rain < self.rain_threshold))
            .collect();
        let split = (samples.len() * 4 / 5).max(1);
        let (fit, held_out) = samples.split_at(split);
        let tree = DecisionTree::fit(fit, &self.params).ok_or(ForecastError::InsufficientData {
            needed: MIN_TRAINING_RECORDS,
            have: records.len(),
        })?;

        let scored = if held_out.is_empty() { fit } else { held_out };
        let hits = scored
            .iter()
            .filter(|(x, raining)| (tree.rain_probability(x) >= 0.5) == *raining)
            .count();
        let accuracy = hits as f32 / scored.len() as f32;

        info!(
            "Forecast model trained on {} records (depth {}, accuracy {:.2})",
            records.len(),
            tree.depth(),
            accuracy
        );
        self.tree = Some(tree);
        self.info = ModelInfo {
            trained: true,
            accuracy: Some(accuracy),
            last_training_ms: Some(now_ms),
            records: records.len(),
        };
        Ok(accuracy)
    }

    pub fn predict(&self, history: &SensorHistory) -> Result<Forecast, ForecastError> {
        let tree = self.tree.as_ref().ok_or(ForecastError::NotTrained)?;
        let mut window: Vec<StatusRecord> = history.recent(WINDOW).map(|e| e.record).collect();
        if window.len() < WINDOW {
            return Err(ForecastError::InsufficientData {
                needed: WINDOW,
                have: window.len(),
            });
        }
        window.reverse();

        let p = tree.rain_probability(&features(&window));
        Ok(Forecast {
            will_rain: p >= 0.5,
            probability: PROBABILITY_FLOOR + p * PROBABILITY_SPAN,
        })
    }

    pub fn is_trained(&self) -> bool {
        self.tree.is_some()
    }

    pub fn info(&self) -> ModelInfo {
        self.info
    }
}

/// Oldest record first.
fn features(window: &[StatusRecord]) -> Features {
    let mut x = [0; FEATURES];
    for (slot, r) in x.chunks_exact_mut(2).zip(window) {
        slot[0] = r.ldr;
        slot[1] = r.rain;
    }
    x
}
