//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (the heating
//! characteristic write path, serial console) that the
//! [`AppService`](super::service::AppService) interprets and acts upon.

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppCommand {
    /// Change the target temperature (°C).  Re-validated by the core.
    SetTargetTemperature(f32),

    /// Emit a telemetry snapshot now instead of waiting for the next tick.
    ReportStatus,
}
