//! SacService: sensing → arbitration → motion → status reporting.

use clothesline::app::events::AppEvent;
use clothesline::app::service::SacService;
use clothesline::config::SystemConfig;
use clothesline::control::ControlMode;
use clothesline::link::record::{StatusLabel, StatusRecord, WeatherLabel};
use clothesline::link::transport::{LoopbackEnd, LoopbackPair, Transport};
use clothesline::motion::{Motion, Position};

use super::mock_hw::{ActuatorCall, LogSink, MockHardware, read_lines};

const OPEN: u8 = 0;
const CLOSED: u8 = 180;

struct Sac {
    svc: SacService,
    hw: MockHardware,
    link: LoopbackEnd,
    bc: LoopbackEnd,
    sink: LogSink,
}

impl Sac {
    /// Started at t=0 in clear weather and ticked for three seconds.
    fn booted() -> Self {
        let (link, bc) = LoopbackPair::new();
        let mut s = Self {
            svc: SacService::new(&SystemConfig::default(), 0),
            hw: MockHardware::new(),
            link,
            bc,
            sink: LogSink::new(),
        };
        s.svc.start(&mut s.hw, &mut s.sink);
        s.run(100, 3_000);
        assert_eq!(s.svc.position(), Position::Open);
        assert!(s.svc.actuator_state().is_idle());
        s
    }

    fn tick(&mut self, now: u64) {
        self.svc.tick(now, &mut self.hw, &mut self.link, &mut self.sink);
    }

    fn run(&mut self, from: u64, to: u64) {
        for t in (from..=to).step_by(100) {
            self.tick(t);
        }
    }

    fn records(&mut self) -> Vec<StatusRecord> {
        read_lines(&mut self.bc)
            .iter()
            .map(|l| StatusRecord::parse_line(l.as_bytes()).unwrap())
            .collect()
    }
}

#[test]
fn boots_parked_open() {
    let (mut link, _bc) = LoopbackPair::new();
    let mut svc = SacService::new(&SystemConfig::default(), 0);
    let mut hw = MockHardware::new();
    let mut sink = LogSink::new();

    svc.start(&mut hw, &mut sink);
    assert_eq!(hw.calls, [ActuatorCall::DriveTo(OPEN)]);
    assert_eq!(svc.status_record(0).status, StatusLabel::Open);
    assert_eq!(svc.status_record(0).rotation, 0);
    assert!(svc.actuator_state().is_idle());

    for t in (100..=3_000).step_by(100) {
        svc.tick(t, &mut hw, &mut link, &mut sink);
    }
    assert_eq!(hw.calls, [ActuatorCall::DriveTo(OPEN)], "clear weather never moves");
    assert_eq!(sink.count(|e| matches!(e, AppEvent::MoveCompleted(_))), 0);
    assert_eq!(svc.metrics(3_000).moves_started, 0);
}

#[test]
fn rain_closes_immediately() {
    let mut s = Sac::booted();
    s.records();
    s.hw.rain();
    s.tick(3_100);

    assert_eq!(s.hw.drives(), [OPEN, CLOSED]);
    let st = s.svc.actuator_state();
    assert_eq!(st.motion, Motion::MovingToClosed);
    assert_eq!(st.position, Position::Closed, "position is set optimistically");

    // The start is pushed out-of-band.
    let recs = s.records();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].status, StatusLabel::Closing);
    assert_eq!(recs[0].weather, WeatherLabel::Raining);
    assert_eq!(recs[0].rotation, 3);
}

#[test]
fn darkness_is_judged_on_the_smoothed_value() {
    let mut s = Sac::booted();
    s.hw.dark();
    // Window of 10 primed with bright readings: the mean crosses the
    // threshold on the fifth dark sample.
    s.run(3_100, 3_400);
    assert_eq!(s.hw.drives(), [OPEN]);
    s.tick(3_500);
    assert_eq!(s.hw.drives(), [OPEN, CLOSED]);
    assert!(s.svc.last_sample().is_dark);
}

#[test]
fn rain_at_boot_closes_on_the_first_cycle() {
    let (mut link, mut bc) = LoopbackPair::new();
    let mut svc = SacService::new(&SystemConfig::default(), 0);
    let mut hw = MockHardware::new();
    let mut sink = LogSink::new();
    hw.rain();
    svc.start(&mut hw, &mut sink);
    svc.tick(100, &mut hw, &mut link, &mut sink);

    assert_eq!(hw.drives(), [OPEN, CLOSED]);
    let lines = read_lines(&mut bc);
    assert_eq!(lines.len(), 1);
    let rec = StatusRecord::parse_line(lines[0].as_bytes()).unwrap();
    assert_eq!(rec.status, StatusLabel::Closing);
}

#[test]
fn autonomous_move_is_never_redirected() {
    let mut s = Sac::booted();
    s.hw.rain();
    s.tick(3_100);
    s.hw.dry();
    s.run(3_200, 6_000);
    assert_eq!(s.hw.drives(), [OPEN, CLOSED], "close runs to completion");

    s.tick(6_100);
    // Completed at 6_100 and, conditions being clear, reopens the same cycle.
    assert_eq!(s.hw.drives(), [OPEN, CLOSED, OPEN]);
}

#[test]
fn manual_command_preempts_and_then_hands_back() {
    let mut s = Sac::booted();
    s.hw.rain();
    s.tick(3_100);
    s.bc.write(b"O").unwrap();
    s.tick(4_100);

    assert_eq!(s.svc.mode(), ControlMode::Manual);
    assert_eq!(s.svc.position(), Position::Open);
    assert_eq!(s.hw.drives(), [OPEN, CLOSED, OPEN]);

    // Still raining, but the manual move is not interrupted.
    s.run(4_200, 7_000);
    assert_eq!(s.hw.drives(), [OPEN, CLOSED, OPEN]);
    assert_eq!(s.svc.mode(), ControlMode::Manual);

    // 7_100: the move settles and that idle cycle reverts to autonomous
    // without acting.
    s.tick(7_100);
    assert!(s.svc.actuator_state().is_idle());
    assert_eq!(s.svc.mode(), ControlMode::Autonomous);
    assert_eq!(s.hw.drives(), [OPEN, CLOSED, OPEN]);

    // Next cycle autonomous control closes again.
    s.tick(7_200);
    assert_eq!(s.hw.drives(), [OPEN, CLOSED, OPEN, CLOSED]);
    assert!(s.sink.events.contains(&AppEvent::ModeChanged {
        from: ControlMode::Autonomous,
        to: ControlMode::Manual,
    }));
}

#[test]
fn status_request_gets_a_reply() {
    let mut s = Sac::booted();
    s.records();
    s.bc.write(b"S\n").unwrap();
    s.tick(3_100);
    let recs = s.records();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].status, StatusLabel::Open);
    assert_eq!(recs[0].rotation, 0);
}

#[test]
fn unknown_bytes_do_not_hide_later_commands() {
    let mut s = Sac::booted();
    s.records();
    s.bc.write(b"xyz\n?\n").unwrap();
    s.tick(3_100);
    assert!(s.records().is_empty());
    assert_eq!(s.hw.drives(), [OPEN]);

    // Noise with no terminator right before a close.
    s.bc.write(&[0x00, b'C']).unwrap();
    s.tick(3_200);
    assert_eq!(s.svc.mode(), ControlMode::Manual);
    assert_eq!(s.hw.drives(), [OPEN, CLOSED]);
    assert_eq!(s.records().len(), 1, "one reply for the close");
    assert_eq!(s.svc.metrics(3_200).link.bytes_ignored, 5);
}

#[test]
fn commands_after_noise_on_the_same_line_all_count() {
    let mut s = Sac::booted();
    s.records();
    s.bc.write(b"xSO\nC\n").unwrap();
    s.tick(3_100);
    // Three commands, one combined reply; the last manual one wins.
    assert_eq!(s.records().len(), 1);
    assert_eq!(s.svc.mode(), ControlMode::Manual);
    assert_eq!(s.hw.drives(), [OPEN, CLOSED]);
}

#[test]
fn periodic_push_keeps_the_link_warm() {
    let mut s = Sac::booted();
    s.records();
    s.run(3_100, 9_000);
    let recs = s.records();
    assert!(
        (1..=3).contains(&recs.len()),
        "expected a push roughly every 3 s, got {}",
        recs.len()
    );
    assert!(recs.iter().all(|r| r.status == StatusLabel::Open));
}

#[test]
fn metrics_count_cycles_and_moves() {
    let mut s = Sac::booted();
    s.hw.rain();
    s.tick(3_100);
    let m = s.svc.metrics(3_100);
    assert_eq!(m.control_cycles, 31);
    assert_eq!(m.moves_started, 1);
    assert_eq!(m.uptime_ms, 3_100);
    assert!(m.link.records_sent >= 1);
}
