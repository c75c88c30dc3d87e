//! JSON payloads for the battery and heating characteristics.
//!
//! The wireless transport exposes three characteristics:
//!
//! | Characteristic | Access             | Document                                                    |
//! |----------------|--------------------|-------------------------------------------------------------|
//! | battery        | read, notify       | `{"batteryLevel", "batteryVoltage"}`                        |
//! | heating        | read, write, notify| `{"temperature", "heatingStatus", "targetTemperature", "fault"}` |
//! | power          | read, notify       | `{"powerStatus", "lastPoweredOn"}`                          |
//!
//! [`CharacteristicSink`] keeps the latest encoded value of each so the
//! transport can serve reads and send notifications.  Writes to the heating
//! characteristic are decoded by [`decode_heating_write`] and validated
//! here before they become an [`AppCommand`].

use core::fmt;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::app::commands::AppCommand;
use crate::app::events::{AppEvent, TelemetryData};
use crate::app::ports::TelemetrySink;
use crate::config::HeatingConfig;
use crate::control::heating::HeatingState;
use crate::error::OutOfRangeCommand;

/// Largest value a characteristic carries.
pub const MAX_PAYLOAD_LEN: usize = 256;

pub type Payload = heapless::Vec<u8, MAX_PAYLOAD_LEN>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PayloadError {
    /// Not valid JSON or missing the expected field.
    Malformed,
    /// Encoded document exceeds [`MAX_PAYLOAD_LEN`].
    TooLarge,
    /// Well-formed but outside the safety bound.
    OutOfRange(OutOfRangeCommand),
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed payload"),
            Self::TooLarge => write!(f, "payload exceeds {MAX_PAYLOAD_LEN} bytes"),
            Self::OutOfRange(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for PayloadError {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatteryDoc {
    pub battery_level: u8,
    pub battery_voltage: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatingDoc<'a> {
    /// Rounded to 0.01 °C; `null` on a thermistor fault.
    pub temperature: Option<f32>,
    pub heating_status: HeatingState,
    pub target_temperature: f32,
    pub fault: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerDoc<'a> {
    /// `"ON"` once the service has started, `"OFF"` before.
    pub power_status: &'a str,
    /// Wall-clock time of the last power-on; `null` until the transport
    /// supplies one (the board has no RTC).
    pub last_powered_on: Option<&'a str>,
}

/// Longest accepted last-powered-on timestamp, e.g. `2023-11-20T10:00:00Z`.
pub const MAX_TIMESTAMP_LEN: usize = 32;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HeatingWrite {
    target_temperature: f32,
}

fn round_centi(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

fn to_payload<T: Serialize>(doc: &T) -> Result<Payload, PayloadError> {
    let bytes = serde_json::to_vec(doc).map_err(|_| PayloadError::Malformed)?;
    Payload::from_slice(&bytes).map_err(|()| PayloadError::TooLarge)
}

pub fn encode_battery(t: &TelemetryData) -> Result<Payload, PayloadError> {
    to_payload(&BatteryDoc {
        battery_level: t.battery_percentage,
        battery_voltage: round_centi(t.battery_voltage),
    })
}

pub fn encode_heating(t: &TelemetryData) -> Result<Payload, PayloadError> {
    to_payload(&HeatingDoc {
        temperature: t.temperature_c.map(round_centi),
        heating_status: t.heating_state,
        target_temperature: t.target_temperature_c,
        fault: t.fault.map(|f| f.as_str()),
    })
}

pub fn encode_power(powered: bool, last_powered_on: Option<&str>) -> Result<Payload, PayloadError> {
    to_payload(&PowerDoc {
        power_status: if powered { "ON" } else { "OFF" },
        last_powered_on,
    })
}

/// Decode a heating-characteristic write into a command.
///
/// Out-of-range targets are refused at this boundary; the core checks
/// them again.
pub fn decode_heating_write(bytes: &[u8], bounds: &HeatingConfig) -> Result<AppCommand, PayloadError> {
    let write: HeatingWrite = serde_json::from_slice(bytes).map_err(|_| PayloadError::Malformed)?;
    let t = write.target_temperature;
    if !t.is_finite() || t < bounds.target_min_c || t > bounds.target_max_c {
        return Err(PayloadError::OutOfRange(OutOfRangeCommand {
            requested: t,
            min: bounds.target_min_c,
            max: bounds.target_max_c,
        }));
    }
    Ok(AppCommand::SetTargetTemperature(t))
}

/// Holds the latest value of each characteristic.
#[derive(Debug, Default)]
pub struct CharacteristicSink {
    battery: Payload,
    heating: Payload,
    power: Payload,
    powered: bool,
    last_powered_on: Option<heapless::String<MAX_TIMESTAMP_LEN>>,
    /// Incremented whenever any value changes.
    revision: u32,
}

impl CharacteristicSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn battery_value(&self) -> &[u8] {
        &self.battery
    }

    pub fn heating_value(&self) -> &[u8] {
        &self.heating
    }

    /// Empty until the service has started.
    pub fn power_value(&self) -> &[u8] {
        &self.power
    }

    /// Record the wall-clock power-on time once the transport knows it.
    pub fn set_last_powered_on(&mut self, timestamp: &str) -> Result<(), PayloadError> {
        let ts = heapless::String::try_from(timestamp).map_err(|_| PayloadError::TooLarge)?;
        self.last_powered_on = Some(ts);
        self.refresh_power()
    }

    fn refresh_power(&mut self) -> Result<(), PayloadError> {
        if !self.powered {
            return Ok(());
        }
        let power = encode_power(true, self.last_powered_on.as_deref())?;
        if power != self.power {
            self.power = power;
            self.revision = self.revision.wrapping_add(1);
        }
        Ok(())
    }

    /// Lets the transport notify only when something changed.
    pub fn revision(&self) -> u32 {
        self.revision
    }

    fn update(&mut self, t: &TelemetryData) -> Result<(), PayloadError> {
        let battery = encode_battery(t)?;
        let heating = encode_heating(t)?;
        if battery != self.battery || heating != self.heating {
            self.battery = battery;
            self.heating = heating;
            self.revision = self.revision.wrapping_add(1);
        }
        Ok(())
    }
}

impl TelemetrySink for CharacteristicSink {
    fn emit(&mut self, event: &AppEvent) {
        let result = match event {
            AppEvent::Telemetry(t) => self.update(t),
            AppEvent::Started { .. } => {
                self.powered = true;
                self.refresh_power()
            }
            _ => Ok(()),
        };
        if let Err(e) = result {
            warn!("characteristic update failed: {}", e);
        }
    }
}
