//! NTC thermistor temperature converter (10 kOhm @ 25 C, B = 3950).
//!
//! Wired low-side in a voltage divider with a 50 kOhm series resistor.
//! The divider reference is injected: either the regulated rail or the
//! live battery voltage.  The B-parameter (simplified Steinhart-Hart)
//! equation converts resistance to temperature, then the empirical
//! calibration offset is added.
//!
//! Any step that would produce a non-physical value returns a
//! [`SensorFault`] instead of letting NaN/Inf reach the controller.

use log::debug;

use crate::app::ports::{AdcChannel, AnalogSource};
use crate::config::ThermistorConfig;
use crate::error::{ConfigError, SensorFault};

use super::VoltageReference;

const KELVIN_OFFSET: f32 = 273.15;

/// One converted thermistor sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalReading {
    pub raw: u16,
    /// Voltage across the thermistor.
    pub voltage: f32,
    pub resistance_ohms: f32,
    pub celsius: f32,
}

pub struct ThermistorConverter<V> {
    cfg: ThermistorConfig,
    reference: V,
    /// Count of the most recent channel sample, kept even when it faulted.
    last_raw: u16,
}

impl<V: VoltageReference> ThermistorConverter<V> {
    /// Rejects non-physical constants (Beta ≤ 0, R0 ≤ 0, …).
    pub fn new(cfg: ThermistorConfig, reference: V) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            reference,
            last_raw: 0,
        })
    }

    pub fn config(&self) -> &ThermistorConfig {
        &self.cfg
    }

    /// Sample the thermistor channel and convert it.
    ///
    /// Faults are returned, not logged; the service reports them once.
    pub fn read_temperature(
        &mut self,
        adc: &mut impl AnalogSource,
    ) -> Result<ThermalReading, SensorFault> {
        let raw = adc.sample(AdcChannel::Thermistor);
        self.last_raw = raw;
        let reading = self.convert(raw);
        if let Err(fault) = reading {
            debug!("thermistor: raw={} rejected: {}", raw, fault);
        }
        reading
    }

    /// Count of the most recent [`read_temperature`](Self::read_temperature).
    pub fn last_raw(&self) -> u16 {
        self.last_raw
    }

    /// Full raw → temperature pipeline against the current reference.
    pub fn convert(&self, raw: u16) -> Result<ThermalReading, SensorFault> {
        let vref = self.reference.reference_voltage();
        if !(vref > 0.0) || !vref.is_finite() {
            return Err(SensorFault::ReferenceUnavailable);
        }
        let voltage = self.raw_to_voltage(raw, vref);
        let resistance_ohms = self.voltage_to_resistance(voltage, vref)?;
        let celsius = self.resistance_to_celsius(resistance_ohms)?;
        Ok(ThermalReading {
            raw,
            voltage,
            resistance_ohms,
            celsius,
        })
    }

    /// `raw / (ADC_MAX - 1) * vref`.
    pub fn raw_to_voltage(&self, raw: u16, vref: f32) -> f32 {
        raw as f32 / (self.cfg.adc_max - 1) as f32 * vref
    }

    /// Low-side divider: `R = Rs * V / (Vref - V)`.
    pub fn voltage_to_resistance(&self, voltage: f32, vref: f32) -> Result<f32, SensorFault> {
        if vref <= voltage {
            return Err(SensorFault::DividerSaturated);
        }
        let resistance = self.cfg.series_resistor_ohms * voltage / (vref - voltage);
        if !(resistance > 0.0) {
            return Err(SensorFault::ShortCircuit);
        }
        Ok(resistance)
    }

    /// B-parameter equation plus the calibration offset.
    pub fn resistance_to_celsius(&self, resistance_ohms: f32) -> Result<f32, SensorFault> {
        if !(resistance_ohms > 0.0) {
            return Err(SensorFault::ShortCircuit);
        }
        let c = &self.cfg;
        let inv_t =
            1.0 / c.reference_temp_k() + (resistance_ohms / c.nominal_resistance_ohms).ln() / c.beta;
        if !(inv_t > 0.0) || !inv_t.is_finite() {
            return Err(SensorFault::OutOfRange);
        }
        let celsius = 1.0 / inv_t - KELVIN_OFFSET + c.calibration_offset_c;
        if !celsius.is_finite() {
            return Err(SensorFault::OutOfRange);
        }
        Ok(celsius)
    }
}
