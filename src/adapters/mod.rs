//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements                  | Connects to                 |
//! |-------------|-----------------------------|-----------------------------|
//! | `hardware`  | AnalogSource, HeaterPort    | ESP32 oneshot ADC, GPIO     |
//! | `log_sink`  | TelemetrySink               | Serial log output           |
//! | `payload`   | TelemetrySink               | JSON characteristic values  |

pub mod hardware;
pub mod log_sink;
pub mod payload;
