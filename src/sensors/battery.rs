//! Battery pack voltage estimator (2S Li-ion through a resistive divider).
//!
//! Each read converts one ADC sample to pack volts with a linear
//! calibration, pushes it into a ten-slot ring buffer, and reports the
//! average of the plausible slots.  Implausible samples (≤ 0 V or ≥ 10 V)
//! stay in the ring until overwritten but never contribute to the average.

use core::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use heapless::HistoryBuffer;
use log::debug;

use crate::app::ports::{AdcChannel, AnalogSource};
use crate::config::BatteryConfig;
use crate::error::ConfigError;

use super::VoltageReference;

/// Ring capacity of the averaging buffer.
pub const VOLTAGE_BUFFER_LEN: usize = 10;

/// Samples at or above this are treated as glitches.
const PLAUSIBLE_MAX_V: f32 = 10.0;

/// Fixed-capacity ring of the most recent battery voltages.
#[derive(Debug, Clone)]
pub struct VoltageBuffer {
    ring: HistoryBuffer<f32, VOLTAGE_BUFFER_LEN>,
}

impl VoltageBuffer {
    pub const fn new() -> Self {
        Self {
            ring: HistoryBuffer::new(),
        }
    }

    /// Overwrite the oldest slot once the ring is full.
    pub fn push(&mut self, volts: f32) {
        self.ring.write(volts);
    }

    /// Number of slots written so far (saturates at capacity).
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.len() == 0
    }

    /// Number of written slots that hold a plausible voltage.
    pub fn plausible_count(&self) -> usize {
        self.ring.as_slice().iter().filter(|v| is_plausible(**v)).count()
    }

    /// Mean of the plausible slots, or `0.0` when there are none.
    pub fn average(&self) -> f32 {
        let (sum, count) = self
            .ring
            .as_slice()
            .iter()
            .copied()
            .filter(|v| is_plausible(*v))
            .fold((0.0_f32, 0_u32), |(sum, n), v| (sum + v, n + 1));
        if count == 0 { 0.0 } else { sum / count as f32 }
    }
}

impl Default for VoltageBuffer {
    fn default() -> Self {
        Self::new()
    }
}

fn is_plausible(volts: f32) -> bool {
    volts > 0.0 && volts < PLAUSIBLE_MAX_V
}

/// Derived battery status for one control tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryState {
    /// Averaged pack voltage.
    pub voltage: f32,
    /// 0–100.
    pub percentage: u8,
    pub is_low: bool,
    pub is_dead: bool,
}

/// Shared handle to the most recent averaged pack voltage.
///
/// The estimator publishes into it after every read; a thermistor divider
/// wired to the battery rail uses it as its reference.
#[derive(Debug, Clone, Default)]
pub struct RailVoltage {
    bits: Arc<AtomicU32>,
}

impl RailVoltage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Relaxed))
    }

    fn set(&self, volts: f32) {
        self.bits.store(volts.to_bits(), Ordering::Relaxed);
    }
}

impl VoltageReference for RailVoltage {
    fn reference_voltage(&self) -> f32 {
        self.get()
    }
}

/// Converts battery-channel samples into a smoothed voltage and charge level.
pub struct BatteryEstimator {
    cfg: BatteryConfig,
    buffer: VoltageBuffer,
    rail: RailVoltage,
    last_raw: u16,
}

impl BatteryEstimator {
    /// Rejects non-physical calibration constants.
    pub fn new(cfg: BatteryConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            buffer: VoltageBuffer::new(),
            rail: RailVoltage::new(),
            last_raw: 0,
        })
    }

    /// Handle that follows this estimator's averaged voltage.
    pub fn rail(&self) -> RailVoltage {
        self.rail.clone()
    }

    /// Sample the battery channel and return the updated average voltage.
    pub fn read_voltage(&mut self, adc: &mut impl AnalogSource) -> f32 {
        let raw = adc.sample(AdcChannel::Battery);
        self.last_raw = raw;
        let volts = self.raw_to_volts(raw);
        self.buffer.push(volts);
        let avg = self.buffer.average();
        self.rail.set(avg);
        debug!("battery: raw={} v={:.3} avg={:.3}", raw, volts, avg);
        avg
    }

    /// Sample once and map the new average onto 0–100 %.
    pub fn calculate_percentage(&mut self, adc: &mut impl AnalogSource) -> u8 {
        let volts = self.read_voltage(adc);
        self.percentage_for(volts)
    }

    /// Sample once and derive the full battery state from the new average.
    pub fn sample(&mut self, adc: &mut impl AnalogSource) -> BatteryState {
        let voltage = self.read_voltage(adc);
        self.state_for(voltage)
    }

    /// Average of the buffer as it stands.  No sampling.
    pub fn average_voltage(&self) -> f32 {
        self.buffer.average()
    }

    /// Percentage of the current average.  No sampling.
    pub fn percentage(&self) -> u8 {
        self.percentage_for(self.buffer.average())
    }

    pub fn is_low(&self) -> bool {
        self.percentage() < self.cfg.low_percent
    }

    pub fn is_dead(&self) -> bool {
        self.percentage() == 0
    }

    /// State of the current average.  No sampling.
    pub fn state(&self) -> BatteryState {
        self.state_for(self.buffer.average())
    }

    /// Count of the most recent sample, plausible or not.
    pub fn last_raw(&self) -> u16 {
        self.last_raw
    }

    pub fn buffer(&self) -> &VoltageBuffer {
        &self.buffer
    }

    /// Linear-with-offset conversion from ADC counts to pack volts.
    pub fn raw_to_volts(&self, raw: u16) -> f32 {
        let c = &self.cfg;
        let fraction = raw as f32 / (c.adc_max - 1) as f32;
        fraction * c.calibration_gain * c.adc_vref * c.divider_ratio + c.calibration_offset_v
    }

    /// Linear map of `[voltage_min, voltage_max]` onto 0–100, truncated and clamped.
    pub fn percentage_for(&self, volts: f32) -> u8 {
        let span = self.cfg.voltage_max - self.cfg.voltage_min;
        let pct = ((volts - self.cfg.voltage_min) / span * 100.0) as i32;
        pct.clamp(0, 100) as u8
    }

    fn state_for(&self, voltage: f32) -> BatteryState {
        let percentage = self.percentage_for(voltage);
        BatteryState {
            voltage,
            percentage,
            is_low: percentage < self.cfg.low_percent,
            is_dead: percentage == 0,
        }
    }
}
