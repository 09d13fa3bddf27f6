//! HTTP dispatch against a live BridgeService.

use clothesline::api::{self, ApiRequest, Method};
use clothesline::app::bridge::BridgeService;
use clothesline::config::SystemConfig;
use clothesline::link::transport::{LoopbackEnd, LoopbackPair, Transport};
use serde_json::Value;

use super::mock_hw::{LogSink, read_all};

fn setup() -> (BridgeService, LoopbackEnd, LoopbackEnd) {
    let (link, sac) = LoopbackPair::new();
    (BridgeService::new(&SystemConfig::default(), 0), link, sac)
}

fn body(resp: &api::ApiResponse) -> Value {
    serde_json::from_str(&resp.body).unwrap()
}

#[test]
fn data_before_first_record() {
    let (bc, _, _) = setup();
    let resp = api::handle(&ApiRequest::new(Method::Get, "/api/data", ""), &bc, 0);
    assert_eq!(resp.status, 200);
    assert_eq!(resp.content_type, "application/json");
    let v = body(&resp);
    assert_eq!(v["connected"], false);
    assert_eq!(v["status"], "MENDETEKSI...");
    assert_eq!(v["rotation"], 0);
}

#[test]
fn data_reflects_mirror() {
    let (mut bc, mut link, mut sac) = setup();
    sac.write(br#"{"ldr":700,"rain":900,"status":"TERTUTUP","weather":"CERAH","rotation":0}"#)
        .unwrap();
    sac.write(b"\n").unwrap();
    bc.tick(500, &mut link, &mut LogSink::new());

    let resp = api::handle(&ApiRequest::new(Method::Get, "/api/data", ""), &bc, 600);
    let v = body(&resp);
    assert_eq!(v["ldr"], 700);
    assert_eq!(v["rain"], 900);
    assert_eq!(v["status"], "TERTUTUP");
    assert_eq!(v["weather"], "CERAH");
    assert_eq!(v["connected"], true);
    assert!(
        resp.headers()
            .contains(&("Access-Control-Allow-Origin", "*"))
    );
}

#[test]
fn invalid_action_is_rejected_and_nothing_is_sent() {
    let (mut bc, mut link, mut sac) = setup();
    let resp = api::handle(
        &ApiRequest::new(Method::Post, "/api/control", "action=fly"),
        &bc,
        100,
    );
    assert_eq!(resp.status, 400);
    let v = body(&resp);
    assert_eq!(v["success"], false);
    assert!(!v["message"].as_str().unwrap().is_empty());

    bc.tick(100, &mut link, &mut LogSink::new());
    assert!(read_all(&mut sac).is_empty());
    assert_eq!(bc.stats().commands_rejected, 1);
    assert_eq!(bc.stats().commands_relayed, 0);
}

#[test]
fn action_is_case_sensitive() {
    let (bc, _, _) = setup();
    let resp = api::handle(
        &ApiRequest::new(Method::Post, "/api/control?action=OPEN", ""),
        &bc,
        0,
    );
    assert_eq!(body(&resp)["success"], false);
}

#[test]
fn missing_action_is_rejected() {
    let (bc, _, _) = setup();
    let resp = api::handle(&ApiRequest::new(Method::Post, "/api/control", ""), &bc, 0);
    assert_eq!(resp.status, 400);
    assert_eq!(body(&resp)["success"], false);
}

#[test]
fn open_is_relayed_over_the_link() {
    let (mut bc, mut link, mut sac) = setup();
    let resp = api::handle(
        &ApiRequest::new(Method::Post, "/api/control?action=open", ""),
        &bc,
        100,
    );
    assert_eq!(resp.status, 200);
    assert_eq!(body(&resp)["success"], true);

    bc.tick(100, &mut link, &mut LogSink::new());
    assert_eq!(read_all(&mut sac), b"O\n");
}

#[test]
fn json_body_is_accepted() {
    let (mut bc, mut link, mut sac) = setup();
    let resp = api::handle(
        &ApiRequest::new(Method::Post, "/api/control", r#"{"action":"close"}"#),
        &bc,
        100,
    );
    assert_eq!(resp.status, 200);
    bc.tick(100, &mut link, &mut LogSink::new());
    assert_eq!(read_all(&mut sac), b"C\n");
}

#[test]
fn unmatched_routes_are_404() {
    let (bc, _, _) = setup();
    for (method, target) in [
        (Method::Get, "/nope"),
        (Method::Get, "/api/control"),
        (Method::Post, "/api/data"),
        (Method::Other, "/api/data"),
    ] {
        let resp = api::handle(&ApiRequest::new(method, target, ""), &bc, 0);
        assert_eq!(resp.status, 404, "{:?} {}", method, target);
        assert_eq!(resp.body, r#"{"success":false,"message":"not found"}"#);
    }
}

#[test]
fn preflight_is_answered() {
    let (bc, _, _) = setup();
    let resp = api::handle(&ApiRequest::new(Method::Options, "/api/control", ""), &bc, 0);
    assert_eq!(resp.status, 204);
    assert!(resp.body.is_empty());
}

fn feed(bc: &mut BridgeService, link: &mut LoopbackEnd, sac: &mut LoopbackEnd, at: u64, rain: u16) {
    let line = format!(
        r#"{{"ldr":400,"rain":{rain},"status":"TERBUKA","weather":"CERAH","rotation":0}}"#
    );
    sac.write(line.as_bytes()).unwrap();
    sac.write(b"\n").unwrap();
    bc.tick(at, link, &mut LogSink::new());
}

#[test]
fn history_is_served_newest_first() {
    let (mut bc, mut link, mut sac) = setup();
    for (i, rain) in [900, 800, 700].into_iter().enumerate() {
        feed(&mut bc, &mut link, &mut sac, 1_000 * (i as u64 + 1), rain);
    }

    let resp = api::handle(&ApiRequest::new(Method::Get, "/view-data", ""), &bc, 3_000);
    assert_eq!(resp.status, 200);
    let rows = body(&resp);
    let rains: Vec<u64> = rows
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["rain"].as_u64().unwrap())
        .collect();
    assert_eq!(rains, [700, 800, 900]);
    assert_eq!(rows[0]["at_ms"], 3_000);
    assert_eq!(rows[0]["status"], "TERBUKA");

    let resp = api::handle(&ApiRequest::new(Method::Get, "/view-data?limit=1", ""), &bc, 3_000);
    assert_eq!(body(&resp).as_array().unwrap().len(), 1);

    let resp = api::handle(&ApiRequest::new(Method::Get, "/check-data-count", ""), &bc, 3_000);
    assert_eq!(body(&resp)["count"], 3);
}

#[test]
fn rejected_lines_stay_out_of_history() {
    let (mut bc, mut link, mut sac) = setup();
    sac.write(b"{\"ldr\":1,\n").unwrap();
    bc.tick(100, &mut link, &mut LogSink::new());
    let resp = api::handle(&ApiRequest::new(Method::Get, "/check-data-count", ""), &bc, 100);
    assert_eq!(body(&resp)["count"], 0);
}

#[test]
fn forecast_becomes_available_once_history_suffices() {
    let (mut bc, mut link, mut sac) = setup();
    let predict = ApiRequest::new(Method::Get, "/predict-weather", "");

    // Showers every ten records; the model trains itself once enough
    // history has arrived.
    let pattern = [950, 950, 950, 950, 950, 950, 700, 200, 200, 150];
    for i in 0..40u64 {
        feed(&mut bc, &mut link, &mut sac, i * 100, pattern[(i % 10) as usize]);
        if i == 0 {
            let v = body(&api::handle(&predict, &bc, 0));
            assert_eq!(v["error"], "model not trained yet");
            assert_eq!(v["will_rain"], false);
        }
    }

    let info = body(&api::handle(
        &ApiRequest::new(Method::Get, "/get-model-info", ""),
        &bc,
        4_000,
    ));
    assert_eq!(info["trained"], true);

    let v = body(&api::handle(&predict, &bc, 4_000));
    assert!(v.get("error").is_none());
    assert!(v["will_rain"].is_boolean());
    let p = v["probability"].as_f64().unwrap();
    assert!((0.6..=0.95 + 1e-6).contains(&p), "probability {p}");
}
