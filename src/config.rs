//! System configuration parameters
//!
//! All tunable parameters for the Heatband device.  The defaults are the
//! constants of the production board; `validate()` rejects anything that
//! would make the conversions non-physical.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Where the thermistor divider takes its reference voltage from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SupplyReference {
    /// A regulated rail of the configured supply voltage.
    Fixed,
    /// The live (averaged) battery voltage.
    BatteryRail,
}

/// Battery divider and calibration constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatteryConfig {
    /// ADC resolution in counts (4096 for 12-bit).
    pub adc_max: u16,
    /// ADC full-scale voltage.
    pub adc_vref: f32,
    /// Resistive divider ratio between the pack and the ADC pin.
    pub divider_ratio: f32,
    /// Empirical multiplicative correction applied to the ADC reading.
    pub calibration_gain: f32,
    /// Empirical additive correction (volts) applied after the divider.
    pub calibration_offset_v: f32,
    /// Pack voltage reported as 100 %.
    pub voltage_max: f32,
    /// Pack voltage reported as 0 %.
    pub voltage_min: f32,
    /// Percentage below which the pack is reported as low.
    pub low_percent: u8,
}

/// NTC thermistor and divider constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThermistorConfig {
    /// Resistance at the reference temperature (ohms).
    pub nominal_resistance_ohms: f32,
    /// Beta coefficient (kelvin).
    pub beta: f32,
    /// Fixed resistor on the supply side of the divider (ohms).
    pub series_resistor_ohms: f32,
    /// Temperature at which the thermistor reads its nominal resistance (°C).
    pub reference_temp_c: f32,
    /// Divider supply voltage when `supply` is [`SupplyReference::Fixed`].
    pub supply_voltage: f32,
    /// ADC resolution in counts.
    pub adc_max: u16,
    /// Empirical offset added to the computed temperature (°C).
    ///
    /// Carried over from field calibration of the first boards; pending
    /// review against a reference measurement.
    pub calibration_offset_c: f32,
    pub supply: SupplyReference,
}

/// Heating policy parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatingConfig {
    /// Target temperature at boot (°C).
    pub default_target_c: f32,
    /// Lowest accepted target (°C).
    pub target_min_c: f32,
    /// Highest accepted target (°C).
    pub target_max_c: f32,
    /// Half-width of the maintenance band around the target (°C).
    pub maintenance_threshold_c: f32,
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    pub battery: BatteryConfig,
    pub thermistor: ThermistorConfig,
    pub heating: HeatingConfig,
    /// Control loop interval (milliseconds)
    pub control_loop_interval_ms: u32,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            adc_max: 4096,
            adc_vref: 3.3,
            divider_ratio: 3.921,
            calibration_gain: 1.0263,
            calibration_offset_v: 0.53,
            voltage_max: 8.4, // 2S Li-ion, full
            voltage_min: 6.0, // 2S Li-ion, cut-off
            low_percent: 30,
        }
    }
}

impl Default for ThermistorConfig {
    fn default() -> Self {
        Self {
            nominal_resistance_ohms: 10_000.0,
            beta: 3950.0,
            series_resistor_ohms: 50_000.0,
            reference_temp_c: 25.0,
            supply_voltage: 3.3,
            adc_max: 4096,
            calibration_offset_c: 21.1,
            supply: SupplyReference::Fixed,
        }
    }
}

impl Default for HeatingConfig {
    fn default() -> Self {
        Self {
            default_target_c: 25.0,
            target_min_c: 0.0,
            target_max_c: 30.0,
            maintenance_threshold_c: 1.0,
        }
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            battery: BatteryConfig::default(),
            thermistor: ThermistorConfig::default(),
            heating: HeatingConfig::default(),
            control_loop_interval_ms: 1000, // 1 Hz
        }
    }
}

impl BatteryConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.adc_max < 2 {
            return Err(ConfigError::ValidationFailed("battery.adc_max must be >= 2"));
        }
        if !(self.adc_vref > 0.0) {
            return Err(ConfigError::ValidationFailed("battery.adc_vref must be > 0"));
        }
        if !(self.divider_ratio > 0.0) {
            return Err(ConfigError::ValidationFailed("battery.divider_ratio must be > 0"));
        }
        if !(self.calibration_gain > 0.0) {
            return Err(ConfigError::ValidationFailed("battery.calibration_gain must be > 0"));
        }
        if !self.calibration_offset_v.is_finite() {
            return Err(ConfigError::ValidationFailed("battery.calibration_offset_v must be finite"));
        }
        if !(self.voltage_min.is_finite() && self.voltage_max.is_finite())
            || self.voltage_min >= self.voltage_max
        {
            return Err(ConfigError::ValidationFailed(
                "battery.voltage_min must be below battery.voltage_max",
            ));
        }
        if self.low_percent > 100 {
            return Err(ConfigError::ValidationFailed("battery.low_percent must be <= 100"));
        }
        Ok(())
    }
}

impl ThermistorConfig {
    /// Reference temperature in kelvin.
    pub fn reference_temp_k(&self) -> f32 {
        self.reference_temp_c + 273.15
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.nominal_resistance_ohms > 0.0) {
            return Err(ConfigError::ValidationFailed(
                "thermistor.nominal_resistance_ohms must be > 0",
            ));
        }
        if !(self.beta > 0.0) {
            return Err(ConfigError::ValidationFailed("thermistor.beta must be > 0"));
        }
        if !(self.series_resistor_ohms > 0.0) {
            return Err(ConfigError::ValidationFailed(
                "thermistor.series_resistor_ohms must be > 0",
            ));
        }
        if !(self.reference_temp_k() > 0.0) {
            return Err(ConfigError::ValidationFailed(
                "thermistor.reference_temp_c must be above absolute zero",
            ));
        }
        if self.supply == SupplyReference::Fixed && !(self.supply_voltage > 0.0) {
            return Err(ConfigError::ValidationFailed("thermistor.supply_voltage must be > 0"));
        }
        if self.adc_max < 2 {
            return Err(ConfigError::ValidationFailed("thermistor.adc_max must be >= 2"));
        }
        if !self.calibration_offset_c.is_finite() {
            return Err(ConfigError::ValidationFailed(
                "thermistor.calibration_offset_c must be finite",
            ));
        }
        Ok(())
    }
}

impl HeatingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.target_min_c.is_finite() && self.target_max_c.is_finite())
            || self.target_min_c > self.target_max_c
        {
            return Err(ConfigError::ValidationFailed(
                "heating.target_min_c must not exceed heating.target_max_c",
            ));
        }
        if !(self.default_target_c >= self.target_min_c && self.default_target_c <= self.target_max_c) {
            return Err(ConfigError::ValidationFailed(
                "heating.default_target_c must lie within the target bounds",
            ));
        }
        if !(self.maintenance_threshold_c >= 0.0) || !self.maintenance_threshold_c.is_finite() {
            return Err(ConfigError::ValidationFailed(
                "heating.maintenance_threshold_c must be >= 0",
            ));
        }
        Ok(())
    }
}

impl SystemConfig {
    /// Check every section.  The first failing field is reported.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.battery.validate()?;
        self.thermistor.validate()?;
        self.heating.validate()?;
        if self.control_loop_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("control_loop_interval_ms must be > 0"));
        }
        Ok(())
    }
}
