//! Both controllers wired over one in-memory serial line.

use clothesline::api::{self, ApiRequest, Method};
use clothesline::app::bridge::BridgeService;
use clothesline::app::service::SacService;
use clothesline::config::SystemConfig;
use clothesline::control::ControlMode;
use clothesline::link::record::StatusLabel;
use clothesline::link::transport::{LoopbackEnd, LoopbackPair};
use clothesline::motion::{Motion, Position};

use super::mock_hw::{LogSink, MockHardware};

struct System {
    sac: SacService,
    bc: BridgeService,
    hw: MockHardware,
    sac_uart: LoopbackEnd,
    bc_uart: LoopbackEnd,
    sac_sink: LogSink,
    bc_sink: LogSink,
}

impl System {
    fn boot() -> Self {
        let config = SystemConfig::default();
        let (sac_uart, bc_uart) = LoopbackPair::new();
        let mut s = Self {
            sac: SacService::new(&config, 0),
            bc: BridgeService::new(&config, 0),
            hw: MockHardware::new(),
            sac_uart,
            bc_uart,
            sac_sink: LogSink::new(),
            bc_sink: LogSink::new(),
        };
        s.sac.start(&mut s.hw, &mut s.sac_sink);
        s
    }

    fn step(&mut self, now: u64) {
        self.sac
            .tick(now, &mut self.hw, &mut self.sac_uart, &mut self.sac_sink);
        self.bc.tick(now, &mut self.bc_uart, &mut self.bc_sink);
    }

    fn run(&mut self, from: u64, to: u64) {
        for t in (from..=to).step_by(100) {
            self.step(t);
        }
    }
}

#[test]
fn clear_weather_then_rain_then_manual_open() {
    let mut s = System::boot();

    // Clear at boot: already open by default, so no move at all.
    s.run(100, 4_900);
    assert_eq!(s.hw.drives(), [0], "only the park");
    assert_eq!(s.sac.position(), Position::Open);
    assert_eq!(s.bc.snapshot(4_900).record.status, StatusLabel::Open);

    // Rain at t0.
    let t0 = 5_000;
    s.hw.rain();
    s.step(t0);
    assert_eq!(s.hw.drives(), [0, 180]);
    assert_eq!(s.sac.remaining_ms(t0 + 1_000), 2_000);

    // The BC sees the close in progress.
    let snap = s.bc.snapshot(t0);
    assert_eq!(snap.record.status, StatusLabel::Closing);
    assert!(snap.connected);

    // Manual open posted at t0+0.9s reaches the SAC on its t0+1s cycle.
    s.run(t0 + 100, t0 + 800);
    let resp = api::handle(
        &ApiRequest::new(Method::Post, "/api/control?action=open", ""),
        &s.bc,
        t0 + 900,
    );
    assert_eq!(resp.status, 200);
    s.step(t0 + 900);
    s.step(t0 + 1_000);

    let st = s.sac.actuator_state();
    assert_eq!(st.motion, Motion::MovingToOpen);
    assert_eq!(st.position, Position::Open, "flips to the target at command time");
    assert_eq!(st.motion_start_ms, Some(t0 + 1_000));
    assert_eq!(s.sac.mode(), ControlMode::Manual);
    assert_eq!(s.hw.drives(), [0, 180, 0]);

    // The mirror catches up within a bridge cycle.
    s.step(t0 + 1_100);
    assert_eq!(s.bc.snapshot(t0 + 1_100).record.status, StatusLabel::Opening);

    // Manual move completes; rain is still there, so autonomy closes again.
    s.run(t0 + 1_200, t0 + 4_200);
    assert_eq!(s.sac.mode(), ControlMode::Autonomous);
    assert_eq!(s.hw.drives(), [0, 180, 0, 180]);
}

#[test]
fn uninterrupted_close_settles_after_rotation() {
    let mut s = System::boot();
    s.run(100, 4_900);
    let t0 = 5_000;
    s.hw.rain();
    s.step(t0);

    s.run(t0 + 100, t0 + 2_900);
    assert_eq!(s.sac.actuator_state().motion, Motion::MovingToClosed);
    s.step(t0 + 3_000);

    let st = s.sac.actuator_state();
    assert_eq!(st.motion, Motion::Idle);
    assert_eq!(st.position, Position::Closed);
    assert_eq!(s.sac.remaining_ms(t0 + 3_000), 0);

    s.step(t0 + 3_100);
    let snap = s.bc.snapshot(t0 + 3_100);
    assert_eq!(snap.record.status, StatusLabel::Closed);
    assert_eq!(snap.record.rotation, 0);
}

#[test]
fn bridge_goes_stale_when_sac_falls_silent() {
    let mut s = System::boot();
    s.run(100, 4_000);
    assert!(s.bc.snapshot(4_000).connected);
    let last = s.bc.snapshot(4_000).record;

    // SAC stops running; only the bridge keeps ticking.
    for t in (4_100..=12_000).step_by(100) {
        s.bc.tick(t, &mut s.bc_uart, &mut s.bc_sink);
    }
    let snap = s.bc.snapshot(12_000);
    assert!(!snap.connected);
    assert_eq!(snap.record, last);

    let resp = api::handle(&ApiRequest::new(Method::Get, "/api/data", ""), &s.bc, 12_000);
    assert_eq!(resp.status, 200);
    assert!(resp.body.contains(r#""connected":false"#));
}
