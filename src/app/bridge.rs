//! BC application service.
//!
//! [`BridgeService`] is the bridge controller's core: it owns the BC end
//! of the link, the status mirror, the command relay queue, the sensor
//! history and the forecast model. The HTTP boundary only ever talks to it
//! through `&self` calls such as [`snapshot`](BridgeService::snapshot) and
//! [`relay`](BridgeService::relay).
//!
//! ```text
//!  HTTP ─relay()──▶ outbox (Channel, depth 4) ──tick()──▶ Transport ──▶ SAC
//!  HTTP ◀snapshot()─ StatusMirror ◀──────────── tick() ◀── Transport ◀── SAC
//!  HTTP ◀forecast()─ RainPredictor ◀─ SensorHistory ◀┘
//! ```

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::{debug, info, warn};

use crate::config::SystemConfig;
use crate::diagnostics::LinkStats;
use crate::error::{ApiError, ForecastError};
use crate::forecast::{Forecast, MIN_TRAINING_RECORDS, ModelInfo, RainPredictor};
use crate::history::SensorHistory;
use crate::link::bridge::BridgeLink;
use crate::link::codec::Command;
use crate::link::mirror::StatusMirror;
use crate::link::record::StatusRecord;
use crate::link::transport::Transport;
use crate::scheduler::Periodic;

use super::commands::ManualCommand;
use super::events::AppEvent;
use super::ports::EventSink;

/// Manual commands waiting for the next bridge cycle.
pub const COMMAND_QUEUE_DEPTH: usize = 4;

/// What the HTTP boundary serves: the mirrored record plus liveness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MirrorSnapshot {
    pub record: StatusRecord,
    pub connected: bool,
}

pub struct BridgeService {
    link: BridgeLink,
    mirror: StatusMirror,
    outbox: Channel<CriticalSectionRawMutex, Command, COMMAND_QUEUE_DEPTH>,
    rejected: AtomicU32,
    was_connected: bool,
    history: SensorHistory,
    predictor: RainPredictor,
    training: Periodic,
}

impl BridgeService {
    pub fn new(config: &SystemConfig, now_ms: u64) -> Self {
        Self {
            link: BridgeLink::new(config, now_ms),
            mirror: StatusMirror::new(),
            outbox: Channel::new(),
            rejected: AtomicU32::new(0),
            was_connected: false,
            history: SensorHistory::new(),
            predictor: RainPredictor::new(config),
            training: Periodic::new("model-training", config.model_training_interval_ms, now_ms),
        }
    }

    /// Run one bridge cycle: flush relayed commands, issue the periodic
    /// status request, ingest received records, retrain when due, report
    /// liveness edges.
    pub fn tick<T: Transport>(&mut self, now_ms: u64, transport: &mut T, sink: &mut impl EventSink) {
        while let Ok(cmd) = self.outbox.try_receive() {
            if let Err(e) = self.link.send_command(transport, cmd) {
                warn!("Relay of {:?} failed: {}", cmd, e);
            }
        }

        self.link.poll_request(now_ms, transport);

        let mirror = &self.mirror;
        let history = &mut self.history;
        self.link.drain(now_ms, transport, |record| {
            mirror.replace(record);
            history.record(now_ms, record);
            sink.emit(&AppEvent::Telemetry(record));
        });

        self.maybe_train(now_ms);

        let connected = self.link.is_connected(now_ms);
        if connected != self.was_connected {
            self.was_connected = connected;
            if connected {
                info!("SAC link up");
                sink.emit(&AppEvent::LinkUp);
            } else {
                info!("SAC link down, serving last known status");
                sink.emit(&AppEvent::LinkDown);
            }
        }
    }

    /// Current mirror and liveness. Never fails: a stale link only flips
    /// `connected`.
    pub fn snapshot(&self, now_ms: u64) -> MirrorSnapshot {
        MirrorSnapshot {
            record: self.mirror.snapshot(),
            connected: self.link.is_connected(now_ms),
        }
    }

    /// Queue a manual command for the SAC. It goes out on the next
    /// [`tick`](Self::tick).
    pub fn relay(&self, cmd: ManualCommand) -> Result<(), ApiError> {
        self.outbox.try_send(Command::from(cmd)).map_err(|_| {
            warn!("Relay queue full, {:?} rejected", cmd);
            self.note_rejected();
            ApiError::QueueFull
        })?;
        info!("Manual {:?} queued for SAC", cmd);
        Ok(())
    }

    /// Count a request refused at the HTTP boundary.
    pub fn note_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Commands queued but not yet written to the link.
    pub fn queued(&self) -> usize {
        self.outbox.len()
    }

    pub fn stats(&self) -> LinkStats {
        LinkStats {
            commands_rejected: self.rejected.load(Ordering::Relaxed),
            ..self.link.stats()
        }
    }

    pub fn history(&self) -> &SensorHistory {
        &self.history
    }

    /// Rain forecast from the latest history.
    pub fn forecast(&self) -> Result<Forecast, ForecastError> {
        self.predictor.predict(&self.history)
    }

    pub fn model_info(&self) -> ModelInfo {
        self.predictor.info()
    }

    /// Train as soon as the history first allows it, then on the interval.
    fn maybe_train(&mut self, now_ms: u64) {
        let due = self.training.poll(now_ms);
        let first = !self.predictor.is_trained() && self.history.len() >= MIN_TRAINING_RECORDS;
        if !due && !first {
            return;
        }
        match self.predictor.train(&self.history, now_ms) {
            Ok(_) => self.training.restart(now_ms),
            Err(e) => debug!("Forecast training skipped: {}", e),
        }
    }
}
