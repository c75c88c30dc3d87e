//! Peripheral drivers: analog inputs and switched outputs.

pub mod adc;
pub mod output;
