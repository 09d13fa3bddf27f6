//! HTTP boundary dispatch for the bridge controller.
//!
//! Transport-agnostic: the web server (whatever it is) turns a request into
//! an [`ApiRequest`], calls [`handle`], and writes the [`ApiResponse`] back
//! with [`ApiResponse::headers`]. Every response allows any origin.
//!
//! | Method    | Path                | Result                                   |
//! |-----------|---------------------|------------------------------------------|
//! | `GET`     | `/api/data`         | mirror + `connected`, always 200         |
//! | `POST`    | `/api/control`      | relay `action=open|close`                |
//! | `GET`     | `/view-data`        | sensor history, newest first (`?limit=`) |
//! | `GET`     | `/check-data-count` | history size                             |
//! | `GET`     | `/predict-weather`  | rain forecast, or an `error` field       |
//! | `GET`     | `/get-model-info`   | last training outcome                    |
//! | `OPTIONS` | any                 | 204 preflight                            |
//! | other     | other               | 404 `{"success":false,...}`              |

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::app::bridge::BridgeService;
use crate::app::commands::ManualCommand;
use crate::error::ApiError;
use crate::link::record::{StatusLabel, WeatherLabel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Options,
    Other,
}

impl Method {
    pub fn parse(s: &str) -> Self {
        match s {
            "GET" => Self::Get,
            "POST" => Self::Post,
            "OPTIONS" => Self::Options,
            _ => Self::Other,
        }
    }
}

/// One inbound request, borrowed from the server's buffers.
#[derive(Debug, Clone, Copy)]
pub struct ApiRequest<'a> {
    pub method: Method,
    pub path: &'a str,
    pub query: &'a str,
    pub body: &'a str,
}

impl<'a> ApiRequest<'a> {
    /// `target` is the request target as received, query string included.
    pub fn new(method: Method, target: &'a str, body: &'a str) -> Self {
        let (path, query) = target.split_once('?').unwrap_or((target, ""));
        Self {
            method,
            path,
            query,
            body,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

const CORS_HEADERS: &[(&str, &str)] = &[
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, POST, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type"),
];

impl ApiResponse {
    /// Headers to send alongside `content_type`.
    pub fn headers(&self) -> &'static [(&'static str, &'static str)] {
        CORS_HEADERS
    }

    fn json(status: u16, value: &impl Serialize) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: serde_json::to_string(value).unwrap_or_else(|_| String::from("{}")),
        }
    }

    fn no_content() -> Self {
        Self {
            status: 204,
            content_type: "text/plain",
            body: String::new(),
        }
    }
}

// ── Payloads ──────────────────────────────────────────────────

#[derive(Serialize)]
struct DataReply {
    ldr: u16,
    rain: u16,
    status: StatusLabel,
    weather: WeatherLabel,
    rotation: u32,
    connected: bool,
}

#[derive(Serialize)]
struct ControlReply<'a> {
    success: bool,
    message: Cow<'a, str>,
}

#[derive(Serialize)]
struct HistoryRow {
    at_ms: u64,
    ldr: u16,
    rain: u16,
    status: StatusLabel,
    weather: WeatherLabel,
    rotation: u32,
}

#[derive(Serialize)]
struct CountReply {
    /// Entries `/view-data` would return.
    count: usize,
    /// Records received since boot, evicted ones included.
    received: u64,
}

#[derive(Serialize)]
struct ForecastFailure {
    error: String,
    will_rain: bool,
    probability: f32,
}

#[derive(Deserialize)]
struct JsonControl {
    action: Option<String>,
}

// ── Dispatch ──────────────────────────────────────────────────

pub fn handle(req: &ApiRequest<'_>, bridge: &BridgeService, now_ms: u64) -> ApiResponse {
    match (req.method, req.path) {
        (Method::Options, _) => ApiResponse::no_content(),
        (Method::Get, "/api/data") => data(bridge, now_ms),
        (Method::Post, "/api/control") => control(req, bridge),
        (Method::Get, "/view-data") => view_data(req, bridge),
        (Method::Get, "/check-data-count") => ApiResponse::json(
            200,
            &CountReply {
                count: bridge.history().len(),
                received: bridge.history().total(),
            },
        ),
        (Method::Get, "/predict-weather") => predict(bridge),
        (Method::Get, "/get-model-info") => ApiResponse::json(200, &bridge.model_info()),
        _ => failure(ApiError::NotFound),
    }
}

fn data(bridge: &BridgeService, now_ms: u64) -> ApiResponse {
    let snap = bridge.snapshot(now_ms);
    ApiResponse::json(
        200,
        &DataReply {
            ldr: snap.record.ldr,
            rain: snap.record.rain,
            status: snap.record.status,
            weather: snap.record.weather,
            rotation: snap.record.rotation,
            connected: snap.connected,
        },
    )
}

fn view_data(req: &ApiRequest<'_>, bridge: &BridgeService) -> ApiResponse {
    let limit = form_value(req.query, "limit")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(usize::MAX);
    let rows: Vec<HistoryRow> = bridge
        .history()
        .recent(limit)
        .map(|e| HistoryRow {
            at_ms: e.at_ms,
            ldr: e.record.ldr,
            rain: e.record.rain,
            status: e.record.status,
            weather: e.record.weather,
            rotation: e.record.rotation,
        })
        .collect();
    ApiResponse::json(200, &rows)
}

/// Always 200; a missing model or short history is reported in-band.
fn predict(bridge: &BridgeService) -> ApiResponse {
    match bridge.forecast() {
        Ok(forecast) => ApiResponse::json(200, &forecast),
        Err(e) => ApiResponse::json(
            200,
            &ForecastFailure {
                error: alloc::format!("{e}"),
                will_rain: false,
                probability: 0.0,
            },
        ),
    }
}

fn control(req: &ApiRequest<'_>, bridge: &BridgeService) -> ApiResponse {
    let cmd = match parse_action(req) {
        Ok(cmd) => cmd,
        Err(e) => {
            warn!("Control request rejected: {}", e);
            bridge.note_rejected();
            return failure(e);
        }
    };
    match bridge.relay(cmd) {
        Ok(()) => ApiResponse::json(
            200,
            &ControlReply {
                success: true,
                message: Cow::Borrowed(match cmd {
                    ManualCommand::Open => "open command sent",
                    ManualCommand::Close => "close command sent",
                }),
            },
        ),
        Err(e) => failure(e),
    }
}

fn failure(e: ApiError) -> ApiResponse {
    let status = match e {
        ApiError::InvalidAction | ApiError::MissingAction => 400,
        ApiError::NotFound => 404,
        ApiError::QueueFull => 503,
    };
    ApiResponse::json(
        status,
        &ControlReply {
            success: false,
            message: Cow::Owned(alloc::format!("{e}")),
        },
    )
}

/// `action` from the query string, else from the body (urlencoded form or
/// a JSON object).
fn parse_action(req: &ApiRequest<'_>) -> Result<ManualCommand, ApiError> {
    let action = form_value(req.query, "action").or_else(|| body_action(req.body));
    let action = action.ok_or(ApiError::MissingAction)?;
    ManualCommand::from_action(&action).ok_or(ApiError::InvalidAction)
}

fn body_action(body: &str) -> Option<Cow<'_, str>> {
    let trimmed = body.trim_start();
    if trimmed.starts_with('{') {
        serde_json::from_str::<JsonControl>(trimmed)
            .ok()
            .and_then(|c| c.action)
            .map(Cow::Owned)
    } else {
        form_value(body, "action")
    }
}

/// First value for `key` in an `application/x-www-form-urlencoded` string.
fn form_value<'a>(input: &'a str, key: &str) -> Option<Cow<'a, str>> {
    url::form_urlencoded::parse(input.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v)
}
