//! Automated clothesline controller library.
//!
//! Two cooperating controllers share one serial link:
//!
//! - the **SAC** (sensor/actuator controller) reads the light and rain
//!   sensors and drives the line servo ([`app::service::SacService`]);
//! - the **BC** (bridge controller) mirrors the SAC's status and relays
//!   manual commands from its HTTP boundary ([`app::bridge::BridgeService`],
//!   [`api`]). It also keeps a short [`history`] of received records and
//!   trains a small rain [`forecast`] model on it.
//!
//! Everything outside `adapters` and `drivers` is pure logic reached
//! through the port traits in [`app::ports`].

#![deny(unused_must_use)]

extern crate alloc;

pub mod api;
pub mod app;
pub mod config;
pub mod control;
pub mod diagnostics;
pub mod error;
pub mod forecast;
pub mod history;
pub mod link;
pub mod motion;
pub mod scheduler;
pub mod sensors;

pub mod adapters;
pub mod drivers;
