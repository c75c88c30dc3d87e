//! Log-based telemetry sink adapter.
//!
//! Implements [`TelemetrySink`] by writing structured application events
//! to the logger (UART / USB-CDC in production).  Telemetry is rendered
//! as a one-line status view: temperature in both units with the
//! thermistor resistance and raw count, target, battery level, voltage
//! and raw count, heating state, uptime.

use core::fmt::Write as _;

use log::{info, warn};

use crate::app::events::{AppEvent, TelemetryData};
use crate::app::ports::TelemetrySink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogTelemetrySink;

impl LogTelemetrySink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogTelemetrySink {
    fn default() -> Self {
        Self::new()
    }
}

fn fahrenheit(celsius: f32) -> f32 {
    celsius * 9.0 / 5.0 + 32.0
}

fn status_line(t: &TelemetryData) -> String {
    let mut line = String::from("STATUS | ");
    // Writing into a String cannot fail.
    let _ = match (t.temperature_c, t.thermistor_resistance_ohms) {
        (Some(c), Some(r)) => write!(
            line,
            "T={:.1}\u{00b0}C/{:.1}\u{00b0}F R={:.2}\u{2126}",
            c,
            fahrenheit(c),
            r
        ),
        _ => write!(
            line,
            "T=fault({})",
            t.fault.map_or("unknown", |f| f.as_str())
        ),
    };
    let _ = write!(
        line,
        " adc={} | target={:.1}\u{00b0}C/{:.1}\u{00b0}F | batt={}% ({:.2}V) adc={} | heating={} | up={}s",
        t.thermistor_raw,
        t.target_temperature_c,
        fahrenheit(t.target_temperature_c),
        t.battery_percentage,
        t.battery_voltage,
        t.battery_raw,
        t.heating_state,
        t.uptime_secs,
    );
    line
}

impl TelemetrySink for LogTelemetrySink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => info!("{}", status_line(t)),
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {} -> {}", from, to);
            }
            AppEvent::SensorFault(fault) => {
                warn!("FAULT | {}", fault);
            }
            AppEvent::CommandRejected(e) => {
                warn!("CMD | rejected: {}", e);
            }
            AppEvent::Started {
                target_temperature_c,
            } => {
                info!("START | target={:.1}\u{00b0}C", target_temperature_c);
            }
        }
    }
}
