//! SAC ↔ BC serial link.
//!
//! ```text
//!  ┌──────────────┐        'S' 'O' 'C'          ┌──────────────┐
//!  │  SacLink     │ ◀────────────────────────── │  BridgeLink  │
//!  │  (decoder,   │                             │  (framer,    │
//!  │   push timer)│ ──────────────────────────▶ │   health)    │
//!  └──────────────┘   {"ldr":..,"status":..}\n  └──────┬───────┘
//!                                                      │ replace()
//!                                                ┌─────▼────────┐
//!                                                │ StatusMirror │ ◀── HTTP reads
//!                                                └──────────────┘
//! ```
//!
//! Layering:
//! - [`transport`]: non-blocking byte channel trait + in-memory pair
//! - [`codec`]: command bytes, line framing, [`LinkMessage`](codec::LinkMessage)
//! - [`record`]: the JSON status record and its labels
//! - [`health`]: BC liveness
//! - [`mirror`]: BC replicated read model
//! - [`sac`], [`bridge`]: the two endpoints

pub mod bridge;
pub mod codec;
pub mod health;
pub mod mirror;
pub mod record;
pub mod sac;
pub mod transport;
