//! On/off output driver for the heating element and the heating indicator.
//!
//! Generic over `embedded_hal::digital::OutputPin`, so the same driver runs
//! on an ESP-IDF `PinDriver` and on a host-side mock pin.  The last
//! commanded level is tracked; a pin write error is logged and the level
//! is recorded as unknown-off so the next command retries the write.

use embedded_hal::digital::{Error as _, OutputPin};
use log::warn;

pub struct SwitchedOutput<P> {
    name: &'static str,
    pin: P,
    on: bool,
}

impl<P: OutputPin> SwitchedOutput<P> {
    /// Take ownership of `pin` and drive it low.
    pub fn new(name: &'static str, pin: P) -> Self {
        let mut out = Self {
            name,
            pin,
            on: true,
        };
        out.set(false);
        out
    }

    pub fn set(&mut self, on: bool) {
        let result = if on {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        match result {
            Ok(()) => self.on = on,
            Err(e) => {
                warn!("{}: pin write failed ({:?})", self.name, e.kind());
                self.on = false;
            }
        }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn pin(&self) -> &P {
        &self.pin
    }
}
