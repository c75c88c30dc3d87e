//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (ADC, heater element, telemetry transport) implement
//! these traits.  The [`AppService`](super::service::AppService) consumes
//! them via generics, so the domain core never touches hardware directly.

// ───────────────────────────────────────────────────────────────
// Analog port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// The two analog inputs of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdcChannel {
    /// Battery pack through the resistive divider.
    Battery,
    /// NTC thermistor divider.
    Thermistor,
}

/// Read-side port: one raw sample in `[0, ADC_MAX)`.
///
/// Sampling is synchronous and must not fail; a bad conversion shows up
/// as an implausible value downstream.
pub trait AnalogSource {
    fn sample(&mut self, channel: AdcChannel) -> u16;
}

// ───────────────────────────────────────────────────────────────
// Heater port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command outputs.
pub trait HeaterPort {
    /// Drive the heating element fully on or off.
    fn set_heater(&mut self, on: bool);

    /// Set the heating indicator LED.
    fn set_heating_indicator(&mut self, on: bool);

    /// Heater and indicator off (safe shutdown).
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Telemetry port (driven adapter: domain → logging / wireless)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log, BLE
/// characteristic, ...).  Fire-and-forget: no acknowledgement.
pub trait TelemetrySink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

/// Fan-out: every event goes to both sinks, left first.
impl<A: TelemetrySink, B: TelemetrySink> TelemetrySink for (A, B) {
    fn emit(&mut self, event: &super::events::AppEvent) {
        self.0.emit(event);
        self.1.emit(event);
    }
}
