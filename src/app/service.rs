//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the sensor hub, the heating controller, and the
//! last snapshot.  It is the explicit context the main loop passes into
//! every tick; there are no module-level singletons.  All I/O flows
//! through port traits injected at call sites, making the entire service
//! testable with mock adapters.
//!
//! ```text
//!  AnalogSource ──▶ ┌────────────────────────┐ ──▶ TelemetrySink
//!                   │       AppService        │
//!    HeaterPort ◀───│ Battery · NTC · Heating │
//!                   └────────────────────────┘
//! ```

use log::{info, warn};

use crate::config::SystemConfig;
use crate::control::heating::{HeaterCommand, HeatingController, HeatingDecision, HeatingState};
use crate::error::{ConfigError, OutOfRangeCommand};
use crate::sensors::{SensorHub, SensorSnapshot};

use super::commands::AppCommand;
use super::events::{AppEvent, TelemetryData};
use super::ports::{AnalogSource, HeaterPort, TelemetrySink};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    sensors: SensorHub,
    controller: HeatingController,
    /// Snapshot of the most recent tick; `None` before the first tick.
    last: Option<SensorSnapshot>,
    command: HeaterCommand,
    tick_count: u64,
    tick_period_ms: u32,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Non-physical constants are rejected here; the firmware must not run
    /// with them.
    pub fn new(config: &SystemConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            sensors: SensorHub::new(config)?,
            controller: HeatingController::new(config.heating.clone())?,
            last: None,
            command: HeaterCommand::all_off(),
            tick_count: 0,
            tick_period_ms: config.control_loop_interval_ms,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Force every output off and announce the initial target.
    pub fn start(&mut self, hw: &mut impl HeaterPort, sink: &mut impl TelemetrySink) {
        hw.all_off();
        self.command = HeaterCommand::all_off();
        let target = self.controller.target_temperature();
        sink.emit(&AppEvent::Started {
            target_temperature_c: target,
        });
        info!("AppService started, target {:.1} \u{00b0}C", target);
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control cycle: sample → decide → actuate → report.
    ///
    /// The `hw` parameter satisfies **both** [`AnalogSource`] and
    /// [`HeaterPort`], so one adapter serves sampling and actuation.
    pub fn tick(&mut self, hw: &mut (impl AnalogSource + HeaterPort), sink: &mut impl TelemetrySink) {
        self.tick_count += 1;

        // 1. Sample battery, then thermistor (may reference the battery rail)
        let snapshot = self.sensors.read_all(hw);
        let prev_fault = self.last.and_then(|s| s.thermal.err());
        self.last = Some(snapshot);

        // Faults are reported when they appear or change, not every tick.
        match (prev_fault, snapshot.thermal.err()) {
            (prev, Some(fault)) if prev != Some(fault) => {
                sink.emit(&AppEvent::SensorFault(fault));
            }
            (Some(_), None) => info!("thermistor recovered"),
            _ => {}
        }

        // 2. Decide
        let prev = self.controller.state();
        let decision = self
            .controller
            .tick(snapshot.temperature_c(), &snapshot.battery);

        // 3. Actuate and report
        self.apply(decision, prev, hw, sink);
        sink.emit(&AppEvent::Telemetry(self.build_telemetry()));
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command.
    ///
    /// An accepted target change is evaluated immediately against the last
    /// snapshot (no fresh sampling) and reported, rather than waiting for
    /// the next tick.  A rejected one changes nothing.
    pub fn apply_command(
        &mut self,
        cmd: AppCommand,
        hw: &mut impl HeaterPort,
        sink: &mut impl TelemetrySink,
    ) -> Result<(), OutOfRangeCommand> {
        match cmd {
            AppCommand::SetTargetTemperature(target) => {
                if let Err(e) = self.controller.set_target_temperature(target) {
                    warn!("Command rejected: {}", e);
                    sink.emit(&AppEvent::CommandRejected(e));
                    return Err(e);
                }
                if let Some(snapshot) = self.last {
                    let prev = self.controller.state();
                    let decision = self
                        .controller
                        .evaluate(snapshot.temperature_c(), &snapshot.battery);
                    self.apply(decision, prev, hw, sink);
                }
                sink.emit(&AppEvent::Telemetry(self.build_telemetry()));
            }
            AppCommand::ReportStatus => {
                sink.emit(&AppEvent::Telemetry(self.build_telemetry()));
            }
        }
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build a telemetry snapshot from the last tick.
    pub fn build_telemetry(&self) -> TelemetryData {
        let battery = self
            .last
            .map_or_else(|| self.sensors.battery.state(), |s| s.battery);
        let thermal = self.last.map(|s| s.thermal);
        let reading = thermal.and_then(Result::ok);
        TelemetryData {
            battery_percentage: battery.percentage,
            battery_voltage: battery.voltage,
            battery_raw: self.last.map_or(0, |s| s.battery_raw),
            temperature_c: reading.map(|r| r.celsius),
            thermistor_resistance_ohms: reading.map(|r| r.resistance_ohms),
            thermistor_raw: self.last.map_or(0, |s| s.thermistor_raw),
            heating_state: self.controller.state(),
            target_temperature_c: self.controller.target_temperature(),
            fault: thermal.and_then(Result::err),
            uptime_secs: self.uptime_secs(),
        }
    }

    /// Current heating state.
    pub fn state(&self) -> HeatingState {
        self.controller.state()
    }

    pub fn target_temperature(&self) -> f32 {
        self.controller.target_temperature()
    }

    /// Outputs applied on the last tick or command.
    pub fn heater_command(&self) -> HeaterCommand {
        self.command
    }

    /// Snapshot of the most recent tick.
    pub fn last_snapshot(&self) -> Option<SensorSnapshot> {
        self.last
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Whole seconds of control-loop time (ticks × period).
    pub fn uptime_secs(&self) -> u64 {
        self.tick_count * u64::from(self.tick_period_ms) / 1000
    }

    // ── Internal ──────────────────────────────────────────────

    /// Translate a decision into port calls and report a state change.
    fn apply(
        &mut self,
        decision: HeatingDecision,
        prev: HeatingState,
        hw: &mut impl HeaterPort,
        sink: &mut impl TelemetrySink,
    ) {
        let cmd = decision.command;
        hw.set_heater(cmd.heater_on);
        hw.set_heating_indicator(cmd.indicator_on);
        self.command = cmd;

        if decision.state != prev {
            sink.emit(&AppEvent::StateChanged {
                from: prev,
                to: decision.state,
            });
        }
    }
}
