//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`TelemetrySink`](super::ports::TelemetrySink) port.  Adapters on the
//! other side decide what to do with them: log to serial, update a BLE
//! characteristic, etc.

use crate::control::heating::HeatingState;
use crate::error::{OutOfRangeCommand, SensorFault};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Snapshot after every tick (and after an accepted command).
    Telemetry(TelemetryData),

    /// The heating decision changed.
    StateChanged { from: HeatingState, to: HeatingState },

    /// The thermistor started faulting (or the fault kind changed);
    /// heating is forced off while it lasts.
    SensorFault(SensorFault),

    /// A command was refused; nothing changed.
    CommandRejected(OutOfRangeCommand),

    /// The application service has started.
    Started { target_temperature_c: f32 },
}

/// A point-in-time telemetry snapshot suitable for logging or transmission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryData {
    pub battery_percentage: u8,
    pub battery_voltage: f32,
    /// Battery ADC count of the last tick (0 before the first tick).
    pub battery_raw: u16,
    /// `None` when the thermistor read faulted.
    pub temperature_c: Option<f32>,
    /// `None` when the thermistor read faulted.
    pub thermistor_resistance_ohms: Option<f32>,
    /// Thermistor ADC count of the last tick, faulted or not.
    pub thermistor_raw: u16,
    pub heating_state: HeatingState,
    pub target_temperature_c: f32,
    pub fault: Option<SensorFault>,
    pub uptime_secs: u64,
}
