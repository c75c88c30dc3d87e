//! Heating decision state machine.
//!
//! Three states, evaluated fresh every tick from the current inputs.  The
//! rules are applied in priority order, first match wins:
//!
//! | # | Condition                              | State         | Heater | Indicator |
//! |---|----------------------------------------|---------------|--------|-----------|
//! | 0 | thermistor fault                       | `Off`         | off    | off       |
//! | 1 | battery dead                           | `Off`         | off    | off       |
//! | 2 | `|current - target| <= threshold`      | `Maintenance` | off    | flashing  |
//! | 3 | `current < target`                     | `On`          | on     | on        |
//! | 4 | otherwise                              | `Off`         | off    | off       |
//!
//! The maintenance band is the only hysteresis.  In `Maintenance` the
//! element is held off; the indicator toggles once per tick.

use core::fmt;

use log::info;
use serde::{Deserialize, Serialize};

use crate::config::HeatingConfig;
use crate::error::{ConfigError, OutOfRangeCommand, SensorFault};
use crate::sensors::battery::BatteryState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeatingState {
    #[serde(rename = "OFF")]
    Off,
    #[serde(rename = "ON")]
    On,
    #[serde(rename = "MTN")]
    Maintenance,
}

impl HeatingState {
    /// Status string reported on the heating characteristic.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::On => "ON",
            Self::Maintenance => "MTN",
        }
    }
}

impl fmt::Display for HeatingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical outputs for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeaterCommand {
    /// Heating element fully driven.
    pub heater_on: bool,
    /// Heating indicator LED level.
    pub indicator_on: bool,
}

impl HeaterCommand {
    pub fn all_off() -> Self {
        Self::default()
    }
}

/// Result of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatingDecision {
    pub state: HeatingState,
    pub command: HeaterCommand,
}

/// The pure decision rule.
pub fn decide(
    temperature_c: Result<f32, SensorFault>,
    battery: &BatteryState,
    target_c: f32,
    maintenance_threshold_c: f32,
) -> HeatingState {
    let Ok(current) = temperature_c else {
        return HeatingState::Off;
    };
    if battery.is_dead {
        return HeatingState::Off;
    }
    if (current - target_c).abs() <= maintenance_threshold_c {
        HeatingState::Maintenance
    } else if current < target_c {
        HeatingState::On
    } else {
        HeatingState::Off
    }
}

/// Owns the target temperature and the indicator flash phase.
pub struct HeatingController {
    cfg: HeatingConfig,
    target_c: f32,
    state: HeatingState,
    flash_phase: bool,
}

impl HeatingController {
    pub fn new(cfg: HeatingConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self {
            target_c: cfg.default_target_c,
            cfg,
            state: HeatingState::Off,
            flash_phase: false,
        })
    }

    pub fn target_temperature(&self) -> f32 {
        self.target_c
    }

    pub fn state(&self) -> HeatingState {
        self.state
    }

    /// Accept a target inside the safety bound.  A rejected value leaves
    /// both the target and the state untouched.
    pub fn set_target_temperature(&mut self, target_c: f32) -> Result<(), OutOfRangeCommand> {
        let (min, max) = (self.cfg.target_min_c, self.cfg.target_max_c);
        if !target_c.is_finite() || target_c < min || target_c > max {
            return Err(OutOfRangeCommand {
                requested: target_c,
                min,
                max,
            });
        }
        if target_c != self.target_c {
            info!("heating: target {:.1} -> {:.1} \u{00b0}C", self.target_c, target_c);
        }
        self.target_c = target_c;
        Ok(())
    }

    /// Periodic evaluation.  Advances the maintenance flash phase.
    pub fn tick(
        &mut self,
        temperature_c: Result<f32, SensorFault>,
        battery: &BatteryState,
    ) -> HeatingDecision {
        self.flash_phase = !self.flash_phase;
        self.evaluate(temperature_c, battery)
    }

    /// Evaluation outside the tick (e.g. right after a target change).
    /// The flash phase is kept.
    pub fn evaluate(
        &mut self,
        temperature_c: Result<f32, SensorFault>,
        battery: &BatteryState,
    ) -> HeatingDecision {
        let state = decide(
            temperature_c,
            battery,
            self.target_c,
            self.cfg.maintenance_threshold_c,
        );
        if state != self.state {
            info!("heating: {} -> {}", self.state, state);
        }
        self.state = state;
        HeatingDecision {
            state,
            command: self.command_for(state),
        }
    }

    fn command_for(&self, state: HeatingState) -> HeaterCommand {
        match state {
            HeatingState::Off => HeaterCommand::all_off(),
            HeatingState::On => HeaterCommand {
                heater_on: true,
                indicator_on: true,
            },
            HeatingState::Maintenance => HeaterCommand {
                heater_on: false,
                indicator_on: self.flash_phase,
            },
        }
    }
}
