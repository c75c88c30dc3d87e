//! GPIO / peripheral pin assignments for the Heatband board (ESP32).
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Heater
// ---------------------------------------------------------------------------

/// Digital output: MOSFET gate of the heating element (active HIGH).
pub const HEATER_GPIO: i32 = 15;

// ---------------------------------------------------------------------------
// Indicator LEDs
// ---------------------------------------------------------------------------

/// Heating indicator: solid while heating, flashing in maintenance.
pub const LED_HEATING_GPIO: i32 = 25;
/// Shared LED return, held LOW.
pub const LED_GROUND_GPIO: i32 = 13;

// ---------------------------------------------------------------------------
// Sensors — Analog
// ---------------------------------------------------------------------------

/// Battery pack divider (GPIO 32 = ADC1 channel 4).
pub const BATTERY_ADC_GPIO: i32 = 32;
pub const BATTERY_ADC_UNIT: u32 = 1;
pub const BATTERY_ADC_CHANNEL: u32 = 4;

/// NTC thermistor divider (GPIO 4 = ADC2 channel 0).
pub const THERMISTOR_ADC_GPIO: i32 = 4;
pub const THERMISTOR_ADC_UNIT: u32 = 2;
pub const THERMISTOR_ADC_CHANNEL: u32 = 0;
