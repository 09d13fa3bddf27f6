//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (UART on a board, `env_logger` on the host). A display
//! or indicator-LED adapter would implement the same trait.

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] with a fixed tag per controller.
pub struct LogEventSink {
    tag: &'static str,
}

impl LogEventSink {
    pub fn new(tag: &'static str) -> Self {
        Self { tag }
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        let tag = self.tag;
        match event {
            AppEvent::Telemetry(r) => {
                info!(
                    "{tag} TELEM | ldr={} rain={} | {:?} | {:?} | rotation={}s",
                    r.ldr, r.rain, r.status, r.weather, r.rotation,
                );
            }
            AppEvent::MoveStarted { target, mode } => {
                info!("{tag} MOVE  | -> {:?} ({:?})", target, mode);
            }
            AppEvent::MoveCompleted(position) => {
                info!("{tag} MOVE  | settled at {:?}", position);
            }
            AppEvent::ModeChanged { from, to } => {
                info!("{tag} MODE  | {:?} -> {:?}", from, to);
            }
            AppEvent::LinkUp => info!("{tag} LINK  | up"),
            AppEvent::LinkDown => info!("{tag} LINK  | down"),
            AppEvent::Started(position) => {
                info!("{tag} START | parked {:?}", position);
            }
        }
    }
}
