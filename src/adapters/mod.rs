//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements   | Connects to                 |
//! |-------------|--------------|-----------------------------|
//! | `hardware`  | SensorPort   | simulated LDR / rain ADC    |
//! |             | ActuatorPort | `ServoDriver` over `SimPwm` |
//! | `log_sink`  | EventSink    | `log` facade                |
//! | `time`      | ClockPort    | `std::time::Instant`        |

pub mod hardware;
pub mod log_sink;
pub mod time;
