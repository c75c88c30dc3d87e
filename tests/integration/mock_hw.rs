//! Mock hardware adapter for integration tests.
//!
//! Serves scripted ADC samples and records every heater call so tests
//! can assert on the full command history without touching real GPIO.

use heatband::app::events::{AppEvent, TelemetryData};
use heatband::app::ports::{AdcChannel, AnalogSource, HeaterPort, TelemetrySink};
use heatband::config::{BatteryConfig, ThermistorConfig};

const KELVIN_OFFSET: f32 = 273.15;

// ── Heater call record ────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaterCall {
    Heater(bool),
    Indicator(bool),
    AllOff,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub battery_raw: u16,
    pub thermistor_raw: u16,
    pub calls: Vec<HeaterCall>,
    pub heater_on: bool,
    pub indicator_on: bool,
}

impl MockHardware {
    pub fn new() -> Self {
        Self {
            battery_raw: raw_for_volts(&BatteryConfig::default(), 8.0),
            thermistor_raw: raw_for_celsius(&ThermistorConfig::default(), 20.0),
            calls: Vec::new(),
            heater_on: false,
            indicator_on: false,
        }
    }

    pub fn set_pack_volts(&mut self, volts: f32) {
        self.battery_raw = raw_for_volts(&BatteryConfig::default(), volts);
    }

    pub fn set_celsius(&mut self, celsius: f32) {
        self.thermistor_raw = raw_for_celsius(&ThermistorConfig::default(), celsius);
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalogSource for MockHardware {
    fn sample(&mut self, channel: AdcChannel) -> u16 {
        match channel {
            AdcChannel::Battery => self.battery_raw,
            AdcChannel::Thermistor => self.thermistor_raw,
        }
    }
}

impl HeaterPort for MockHardware {
    fn set_heater(&mut self, on: bool) {
        self.heater_on = on;
        self.calls.push(HeaterCall::Heater(on));
    }

    fn set_heating_indicator(&mut self, on: bool) {
        self.indicator_on = on;
        self.calls.push(HeaterCall::Indicator(on));
    }

    fn all_off(&mut self) {
        self.heater_on = false;
        self.indicator_on = false;
        self.calls.push(HeaterCall::AllOff);
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_telemetry(&self) -> Option<TelemetryData> {
        self.events.iter().rev().find_map(|e| match e {
            AppEvent::Telemetry(t) => Some(*t),
            _ => None,
        })
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl TelemetrySink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Inverse conversions ───────────────────────────────────────

/// ADC count that the battery estimator reads as `volts`.
pub fn raw_for_volts(cfg: &BatteryConfig, volts: f32) -> u16 {
    let scale = cfg.calibration_gain * cfg.adc_vref * cfg.divider_ratio;
    let fraction = (volts - cfg.calibration_offset_v) / scale;
    (fraction * (cfg.adc_max - 1) as f32).round() as u16
}

/// ADC count that the thermistor converter (fixed supply) reads as `celsius`.
pub fn raw_for_celsius(cfg: &ThermistorConfig, celsius: f32) -> u16 {
    let t = celsius - cfg.calibration_offset_c + KELVIN_OFFSET;
    let t0 = cfg.reference_temp_c + KELVIN_OFFSET;
    let r = cfg.nominal_resistance_ohms * (cfg.beta * (1.0 / t - 1.0 / t0)).exp();
    let fraction = r / (cfg.series_resistor_ohms + r);
    (fraction * (cfg.adc_max - 1) as f32).round() as u16
}
