//! Hardware adapter — bridges the board's peripherals to the domain ports.
//!
//! Owns the ADC and both switched outputs, exposing them through
//! [`AnalogSource`] and [`HeaterPort`].  This is the only module in the
//! system that touches actual hardware.  On non-espidf targets the ADC
//! reads injected samples and the outputs take any `OutputPin` mock.

use embedded_hal::digital::OutputPin;

use crate::app::ports::{AdcChannel, AnalogSource, HeaterPort};
use crate::drivers::adc::OneshotAdc;
use crate::drivers::output::SwitchedOutput;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<H, L> {
    adc: OneshotAdc,
    heater: SwitchedOutput<H>,
    indicator: SwitchedOutput<L>,
}

impl<H: OutputPin, L: OutputPin> HardwareAdapter<H, L> {
    pub fn new(adc: OneshotAdc, heater_pin: H, indicator_pin: L) -> Self {
        Self {
            adc,
            heater: SwitchedOutput::new("heater", heater_pin),
            indicator: SwitchedOutput::new("led_heating", indicator_pin),
        }
    }

    pub fn is_heater_on(&self) -> bool {
        self.heater.is_on()
    }

    pub fn is_indicator_on(&self) -> bool {
        self.indicator.is_on()
    }

    /// Direct ADC access, e.g. for injecting samples in simulation.
    pub fn adc_mut(&mut self) -> &mut OneshotAdc {
        &mut self.adc
    }
}

// ── AnalogSource implementation ───────────────────────────────

impl<H, L> AnalogSource for HardwareAdapter<H, L> {
    fn sample(&mut self, channel: AdcChannel) -> u16 {
        self.adc.read(channel)
    }
}

// ── HeaterPort implementation ─────────────────────────────────

impl<H: OutputPin, L: OutputPin> HeaterPort for HardwareAdapter<H, L> {
    fn set_heater(&mut self, on: bool) {
        if self.heater.is_on() != on {
            log::debug!("heater -> {}", if on { "on" } else { "off" });
        }
        self.heater.set(on);
    }

    fn set_heating_indicator(&mut self, on: bool) {
        self.indicator.set(on);
    }

    fn all_off(&mut self) {
        self.heater.set(false);
        self.indicator.set(false);
    }
}
