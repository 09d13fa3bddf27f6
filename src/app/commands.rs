//! Inbound commands to the application core.
//!
//! A manual command reaches the SAC over the serial link (relayed by the
//! bridge from its HTTP boundary) and pre-empts autonomous control for one
//! complete move.

use serde::{Deserialize, Serialize};

/// Operator-issued position request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManualCommand {
    Open,
    Close,
}

impl ManualCommand {
    /// Parse the HTTP `action` field. Case-sensitive.
    pub fn from_action(action: &str) -> Option<Self> {
        match action {
            "open" => Some(Self::Open),
            "close" => Some(Self::Close),
            _ => None,
        }
    }
}
