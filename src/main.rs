//! Clothesline host simulation: both controllers in one process.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │  SimHardware ── SacService ══ LoopbackPair ══ BridgeService   │
//! │  (LDR, rain,    (Fusion ·        (serial)     (Mirror ·       │
//! │   ServoDriver)   Arbiter ·                     Relay) ◀─ api  │
//! │                  Motion)                                      │
//! │                                                               │
//! │  HostClock · LogEventSink · env_logger                        │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! A scripted weather profile drives the sensors; one manual `open` is
//! posted through the HTTP dispatch mid-rain. At the end the history and
//! forecast routes are queried once. Set `RUST_LOG=debug` to see
//! every byte-level exchange.

#![deny(unused_must_use)]

use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};

use clothesline::adapters::hardware::SimHardware;
use clothesline::adapters::log_sink::LogEventSink;
use clothesline::adapters::time::HostClock;
use clothesline::api::{self, ApiRequest, Method};
use clothesline::app::bridge::BridgeService;
use clothesline::app::ports::ClockPort;
use clothesline::app::service::SacService;
use clothesline::config::SystemConfig;
use clothesline::link::transport::LoopbackPair;

/// Simulation length.
const RUN_FOR_MS: u64 = 24_000;
/// Dashboard poll cadence.
const DATA_POLL_MS: u64 = 2_000;

/// `(from_ms, dark, raining)`; each step holds until the next one.
const WEATHER_SCRIPT: &[(u64, bool, bool)] = &[
    (0, false, false),
    (6_000, false, true),
    (15_000, false, false),
    (20_000, true, false),
];

/// Manual command posted through the HTTP dispatch.
const MANUAL_AT_MS: u64 = 10_000;

fn weather_at(t_ms: u64) -> (bool, bool) {
    WEATHER_SCRIPT
        .iter()
        .rev()
        .find(|(from, _, _)| t_ms >= *from)
        .map_or((false, false), |&(_, dark, raining)| (dark, raining))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SystemConfig::default();
    config
        .validate()
        .map_err(clothesline::error::Error::from)
        .context("invalid build-time configuration")?;

    info!("Clothesline simulation starting");

    let clock = HostClock::new();
    let (mut sac_uart, mut bc_uart) = LoopbackPair::new();
    let mut hw = SimHardware::new();
    let mut sac_sink = LogEventSink::new("SAC");
    let mut bc_sink = LogEventSink::new("BC ");

    let now = clock.now_ms();
    let mut sac = SacService::new(&config, now);
    let mut bridge = BridgeService::new(&config, now);
    sac.start(&mut hw, &mut sac_sink);

    let mut manual_sent = false;
    let mut next_poll = DATA_POLL_MS;
    let mut last_weather = None;

    loop {
        let now = clock.now_ms();
        if now >= RUN_FOR_MS {
            break;
        }

        let weather = weather_at(now);
        if last_weather != Some(weather) {
            info!("Weather now dark={} raining={}", weather.0, weather.1);
            hw.set_weather(weather.0, weather.1);
            last_weather = Some(weather);
        }

        sac.tick(now, &mut hw, &mut sac_uart, &mut sac_sink);
        bridge.tick(now, &mut bc_uart, &mut bc_sink);

        if !manual_sent && now >= MANUAL_AT_MS {
            manual_sent = true;
            let req = ApiRequest::new(Method::Post, "/api/control?action=open", "");
            let resp = api::handle(&req, &bridge, now);
            info!("POST /api/control action=open -> {} {}", resp.status, resp.body);
        }

        if now >= next_poll {
            next_poll += DATA_POLL_MS;
            let resp = api::handle(&ApiRequest::new(Method::Get, "/api/data", ""), &bridge, now);
            if resp.status == 200 {
                info!("GET /api/data -> {}", resp.body);
            } else {
                warn!("GET /api/data -> {}", resp.status);
            }
        }

        thread::sleep(Duration::from_millis(config.control_loop_interval_ms));
    }

    let end = clock.now_ms();
    for route in ["/check-data-count", "/view-data?limit=3", "/predict-weather"] {
        let resp = api::handle(&ApiRequest::new(Method::Get, route, ""), &bridge, end);
        info!("GET {} -> {} {}", route, resp.status, resp.body);
    }

    let metrics = sac.metrics(end);
    info!(
        "Done: {} cycles, {} moves, SAC link {:?}, BC link {:?}",
        metrics.control_cycles,
        metrics.moves_started,
        metrics.link,
        bridge.stats()
    );
    info!("Servo engaged at exit: {}", hw.servo().is_engaged());
    Ok(())
}
