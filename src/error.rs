//! Error types for the Heatband firmware.
//!
//! One type per failure domain, each returned directly by the operation
//! that can fail.  All are `Copy` so
//! they can travel through telemetry and the controller without
//! allocation, and all implement `std::error::Error` so the device binary
//! can propagate them through `anyhow`.

use core::fmt;

// ---------------------------------------------------------------------------
// Sensor faults
// ---------------------------------------------------------------------------

/// A thermistor read that cannot be turned into a temperature.
///
/// The controller maps every variant to `HeatingState::Off`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorFault {
    /// Divider voltage is zero: thermistor shorted or resistance ≤ 0.
    ShortCircuit,
    /// Divider voltage reached the reference: thermistor open circuit.
    DividerSaturated,
    /// The divider reference voltage is zero or negative (battery rail not yet sampled).
    ReferenceUnavailable,
    /// The B-parameter equation produced a non-finite or non-physical value.
    OutOfRange,
}

impl SensorFault {
    /// Short tag used in telemetry payloads.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ShortCircuit => "short",
            Self::DividerSaturated => "open",
            Self::ReferenceUnavailable => "no_reference",
            Self::OutOfRange => "out_of_range",
        }
    }
}

impl fmt::Display for SensorFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShortCircuit => write!(f, "thermistor short circuit"),
            Self::DividerSaturated => write!(f, "thermistor open circuit"),
            Self::ReferenceUnavailable => write!(f, "divider reference unavailable"),
            Self::OutOfRange => write!(f, "temperature out of range"),
        }
    }
}

impl std::error::Error for SensorFault {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Rejected at construction; the firmware cannot run safely with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A field failed range validation.  The message names the field.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Command errors
// ---------------------------------------------------------------------------

/// A target temperature outside the safety bound.  The prior value is kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutOfRangeCommand {
    pub requested: f32,
    pub min: f32,
    pub max: f32,
}

impl fmt::Display for OutOfRangeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "target {} \u{00b0}C outside [{}, {}]",
            self.requested, self.min, self.max
        )
    }
}

impl std::error::Error for OutOfRangeCommand {}
