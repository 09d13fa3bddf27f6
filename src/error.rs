//! Unified error types for the clothesline controllers.
//!
//! A single `Error` enum that every subsystem converts into. None of these
//! are fatal: callers drop the offending line or reject the request and the
//! control loops carry on with the last known good state.
//! All variants are `Copy` so they can be passed around without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The serial link delivered something unusable.
    Link(LinkError),
    /// An HTTP-boundary request was rejected.
    Api(ApiError),
    /// Configuration is inconsistent.
    Config(ConfigError),
    /// No forecast could be produced.
    Forecast(ForecastError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Link(e) => write!(f, "link: {e}"),
            Self::Api(e) => write!(f, "api: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Forecast(e) => write!(f, "forecast: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Link errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// Line is not enclosed in `{` … `}` (partial or garbled record).
    Unframed,
    /// Line is enclosed but its fields do not parse.
    Malformed,
    /// Line exceeded the framer capacity and was dropped.
    Overflow,
    /// The underlying transport reported a failure.
    Transport,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unframed => write!(f, "record not enclosed in braces"),
            Self::Malformed => write!(f, "record fields malformed"),
            Self::Overflow => write!(f, "line exceeds buffer"),
            Self::Transport => write!(f, "transport failure"),
        }
    }
}

impl From<LinkError> for Error {
    fn from(e: LinkError) -> Self {
        Self::Link(e)
    }
}

// ---------------------------------------------------------------------------
// API errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    /// `action` was present but not `open` / `close`.
    InvalidAction,
    /// `action` field missing from the request.
    MissingAction,
    /// No route matched.
    NotFound,
    /// The relay queue towards the SAC is full.
    QueueFull,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAction => write!(f, "invalid action, expected open or close"),
            Self::MissingAction => write!(f, "missing action parameter"),
            Self::NotFound => write!(f, "not found"),
            Self::QueueFull => write!(f, "command queue full, try again"),
        }
    }
}

impl From<ApiError> for Error {
    fn from(e: ApiError) -> Self {
        Self::Api(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A field failed range validation. Describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Forecast errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastError {
    /// No training run has succeeded yet.
    NotTrained,
    /// The history is too short for the requested operation.
    InsufficientData { needed: usize, have: usize },
}

impl fmt::Display for ForecastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotTrained => write!(f, "model not trained yet"),
            Self::InsufficientData { needed, have } => {
                write!(f, "not enough data, need {needed} records, have {have}")
            }
        }
    }
}

impl From<ForecastError> for Error {
    fn from(e: ForecastError) -> Self {
        Self::Forecast(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
