//! BridgeService: request cadence, mirror updates, liveness, relay.

use clothesline::app::bridge::BridgeService;
use clothesline::app::commands::ManualCommand;
use clothesline::app::events::AppEvent;
use clothesline::config::SystemConfig;
use clothesline::link::record::{StatusLabel, StatusRecord, WeatherLabel};
use clothesline::link::transport::{LoopbackEnd, LoopbackPair, Transport};

use super::mock_hw::{LogSink, read_all};

const RECORD: &[u8] =
    br#"{"ldr":640,"rain":310,"status":"MENUTUP...","weather":"HUJAN","rotation":2}"#;

struct Bc {
    svc: BridgeService,
    link: LoopbackEnd,
    sac: LoopbackEnd,
    sink: LogSink,
}

impl Bc {
    fn new() -> Self {
        let (link, sac) = LoopbackPair::new();
        Self {
            svc: BridgeService::new(&SystemConfig::default(), 0),
            link,
            sac,
            sink: LogSink::new(),
        }
    }

    fn tick(&mut self, now: u64) {
        self.svc.tick(now, &mut self.link, &mut self.sink);
    }

    fn send_line(&mut self, line: &[u8]) {
        self.sac.write(line).unwrap();
        self.sac.write(b"\n").unwrap();
    }
}

fn expected() -> StatusRecord {
    StatusRecord {
        ldr: 640,
        rain: 310,
        status: StatusLabel::Closing,
        weather: WeatherLabel::Raining,
        rotation: 2,
    }
}

#[test]
fn first_request_waits_for_settle_delay() {
    let mut bc = Bc::new();
    for t in (0..2_000).step_by(100) {
        bc.tick(t);
    }
    assert!(read_all(&mut bc.sac).is_empty());

    bc.tick(2_000);
    assert_eq!(read_all(&mut bc.sac), b"S\n");

    for t in (2_100..5_000).step_by(100) {
        bc.tick(t);
    }
    assert!(read_all(&mut bc.sac).is_empty());
    bc.tick(5_000);
    assert_eq!(read_all(&mut bc.sac), b"S\n");
}

#[test]
fn valid_record_replaces_mirror_and_brings_link_up() {
    let mut bc = Bc::new();
    bc.send_line(RECORD);
    bc.tick(1_000);

    let snap = bc.svc.snapshot(1_000);
    assert!(snap.connected);
    assert_eq!(snap.record, expected());
    assert_eq!(bc.sink.count(|e| *e == AppEvent::LinkUp), 1);
    assert_eq!(bc.svc.stats().records_received, 1);
}

#[test]
fn staleness_downgrades_connected_but_keeps_data() {
    let mut bc = Bc::new();
    bc.send_line(RECORD);
    bc.tick(1_000);

    bc.tick(5_900);
    assert!(bc.svc.snapshot(5_999).connected);
    bc.tick(6_000);
    let snap = bc.svc.snapshot(6_000);
    assert!(!snap.connected);
    assert_eq!(snap.record, expected(), "last known data keeps being served");
    assert_eq!(bc.sink.count(|e| *e == AppEvent::LinkDown), 1);

    // Recovery.
    bc.send_line(RECORD);
    bc.tick(7_000);
    assert!(bc.svc.snapshot(7_000).connected);
    assert_eq!(bc.sink.count(|e| *e == AppEvent::LinkUp), 2);
}

#[test]
fn partial_record_leaves_mirror_identical() {
    let mut bc = Bc::new();
    bc.send_line(RECORD);
    bc.tick(1_000);
    let before = serde_json::to_string(&bc.svc.snapshot(1_000).record).unwrap();

    bc.send_line(br#"{"ldr":1,"#);
    bc.send_line(br#""rain":2}"#);
    bc.send_line(b"garbage");
    bc.send_line(br#"{"ldr":"bright","rain":2,"status":"TERBUKA","weather":"CERAH","rotation":0}"#);
    bc.tick(1_100);

    let after = serde_json::to_string(&bc.svc.snapshot(1_100).record).unwrap();
    assert_eq!(before, after);
    assert_eq!(bc.svc.stats().lines_discarded, 4);
    assert_eq!(bc.svc.stats().records_received, 1);
}

#[test]
fn rejected_lines_do_not_refresh_liveness() {
    let mut bc = Bc::new();
    bc.send_line(RECORD);
    bc.tick(1_000);
    bc.send_line(br#"{"ldr":1,"#);
    bc.tick(4_000);
    assert!(!bc.svc.snapshot(6_000).connected);
}

#[test]
fn record_split_across_cycles_is_reassembled() {
    let mut bc = Bc::new();
    let (head, tail) = RECORD.split_at(30);
    bc.sac.write(head).unwrap();
    bc.tick(100);
    assert_eq!(bc.svc.snapshot(100).record, StatusRecord::UNKNOWN);
    bc.sac.write(tail).unwrap();
    bc.sac.write(b"\r\n").unwrap();
    bc.tick(200);
    assert_eq!(bc.svc.snapshot(200).record, expected());
}

#[test]
fn relayed_commands_go_out_on_next_tick() {
    let mut bc = Bc::new();
    bc.svc.relay(ManualCommand::Close).unwrap();
    assert!(read_all(&mut bc.sac).is_empty(), "nothing written before tick");
    bc.tick(100);
    assert_eq!(read_all(&mut bc.sac), b"C\n");
    assert_eq!(bc.svc.stats().commands_relayed, 1);
}
