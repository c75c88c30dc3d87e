//! Sensor subsystem — battery estimator, thermistor converter, and the
//! aggregating [`SensorHub`].
//!
//! The hub samples both analog channels once per tick, battery first so a
//! thermistor divider referenced to the battery rail sees this tick's
//! average, and returns a [`SensorSnapshot`].

pub mod battery;
pub mod thermistor;

use crate::app::ports::AnalogSource;
use crate::config::{SupplyReference, SystemConfig};
use crate::error::{ConfigError, SensorFault};
use battery::{BatteryEstimator, BatteryState, RailVoltage};
use thermistor::{ThermalReading, ThermistorConverter};

/// Anything that can report the voltage a divider is referenced to.
pub trait VoltageReference {
    fn reference_voltage(&self) -> f32;
}

/// A regulated rail of constant voltage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedSupply(pub f32);

impl VoltageReference for FixedSupply {
    fn reference_voltage(&self) -> f32 {
        self.0
    }
}

/// The reference selected by configuration.
#[derive(Debug, Clone)]
pub enum DividerReference {
    Fixed(FixedSupply),
    BatteryRail(RailVoltage),
}

impl VoltageReference for DividerReference {
    fn reference_voltage(&self) -> f32 {
        match self {
            Self::Fixed(supply) => supply.reference_voltage(),
            Self::BatteryRail(rail) => rail.reference_voltage(),
        }
    }
}

/// A point-in-time view of both analog channels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSnapshot {
    pub battery: BatteryState,
    /// Battery channel count behind this tick's sample.
    pub battery_raw: u16,
    /// Thermistor channel count, present even when `thermal` faulted.
    pub thermistor_raw: u16,
    /// `Err` when the thermistor conversion is physically invalid.
    pub thermal: Result<ThermalReading, SensorFault>,
}

impl SensorSnapshot {
    pub fn temperature_c(&self) -> Result<f32, SensorFault> {
        self.thermal.map(|r| r.celsius)
    }
}

/// Owns the battery estimator and the thermistor converter.
pub struct SensorHub {
    pub battery: BatteryEstimator,
    pub thermistor: ThermistorConverter<DividerReference>,
}

impl SensorHub {
    /// Build both converters, wiring the thermistor to the reference named
    /// in the configuration.
    pub fn new(config: &SystemConfig) -> Result<Self, ConfigError> {
        let battery = BatteryEstimator::new(config.battery.clone())?;
        let reference = match config.thermistor.supply {
            SupplyReference::Fixed => {
                DividerReference::Fixed(FixedSupply(config.thermistor.supply_voltage))
            }
            SupplyReference::BatteryRail => DividerReference::BatteryRail(battery.rail()),
        };
        let thermistor = ThermistorConverter::new(config.thermistor.clone(), reference)?;
        Ok(Self {
            battery,
            thermistor,
        })
    }

    /// Sample both channels.
    pub fn read_all(&mut self, adc: &mut impl AnalogSource) -> SensorSnapshot {
        let battery = self.battery.sample(adc);
        let thermal = self.thermistor.read_temperature(adc);
        SensorSnapshot {
            battery,
            battery_raw: self.battery.last_raw(),
            thermistor_raw: self.thermistor.last_raw(),
            thermal,
        }
    }
}
