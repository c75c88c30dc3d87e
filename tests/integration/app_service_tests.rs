//! Integration tests for the sensors → controller → heater pipeline.
//!
//! These run on the host (x86_64) and drive [`AppService`] through mock
//! adapters: scripted ADC samples in, recorded heater calls and events out.

use super::mock_hw::{HeaterCall, MockHardware, RecordingSink};

use heatband::app::commands::AppCommand;
use heatband::app::events::AppEvent;
use heatband::app::service::AppService;
use heatband::config::SystemConfig;
use heatband::control::heating::HeatingState;
use heatband::error::SensorFault;

fn make_app() -> (AppService, MockHardware, RecordingSink) {
    let mut app = AppService::new(&SystemConfig::default()).unwrap();
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    app.start(&mut hw, &mut sink);
    (app, hw, sink)
}

// ── Lifecycle ─────────────────────────────────────────────────

#[test]
fn start_forces_outputs_off_and_announces_target() {
    let (app, hw, sink) = make_app();
    assert_eq!(hw.calls, vec![HeaterCall::AllOff]);
    assert_eq!(
        sink.events,
        vec![AppEvent::Started {
            target_temperature_c: 25.0
        }]
    );
    assert_eq!(app.state(), HeatingState::Off);
    assert_eq!(app.tick_count(), 0);
    assert!(app.last_snapshot().is_none());
}

#[test]
fn rejects_invalid_config() {
    let mut cfg = SystemConfig::default();
    cfg.thermistor.beta = 0.0;
    assert!(AppService::new(&cfg).is_err());
}

// ── Heating decisions ─────────────────────────────────────────

#[test]
fn cold_reading_turns_heater_on() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.set_celsius(20.0);
    app.tick(&mut hw, &mut sink);

    assert_eq!(app.state(), HeatingState::On);
    assert!(hw.heater_on);
    assert!(hw.indicator_on);
    assert!(sink.events.contains(&AppEvent::StateChanged {
        from: HeatingState::Off,
        to: HeatingState::On,
    }));

    let t = sink.last_telemetry().unwrap();
    assert_eq!(t.heating_state, HeatingState::On);
    assert!((t.temperature_c.unwrap() - 20.0).abs() < 0.1);
    assert_eq!(t.fault, None);
}

#[test]
fn near_target_holds_heater_off_and_flashes_indicator() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.set_celsius(24.5);

    let mut indicator = Vec::new();
    for _ in 0..4 {
        app.tick(&mut hw, &mut sink);
        assert_eq!(app.state(), HeatingState::Maintenance);
        assert!(!hw.heater_on, "heater must stay off in maintenance");
        indicator.push(hw.indicator_on);
    }
    assert_eq!(indicator, vec![true, false, true, false]);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::StateChanged { .. })),
        1,
        "flashing is not a state change"
    );
}

#[test]
fn above_band_turns_heater_off() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.set_celsius(20.0);
    app.tick(&mut hw, &mut sink);
    assert!(hw.heater_on);

    hw.set_celsius(27.0);
    app.tick(&mut hw, &mut sink);
    assert_eq!(app.state(), HeatingState::Off);
    assert!(!hw.heater_on);
    assert!(!hw.indicator_on);
}

#[test]
fn open_thermistor_forces_off_and_reports_fault() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.set_celsius(20.0);
    app.tick(&mut hw, &mut sink);
    assert!(hw.heater_on);

    hw.thermistor_raw = 4095;
    app.tick(&mut hw, &mut sink);

    assert_eq!(app.state(), HeatingState::Off);
    assert!(!hw.heater_on);
    assert!(sink
        .events
        .contains(&AppEvent::SensorFault(SensorFault::DividerSaturated)));
    let t = sink.last_telemetry().unwrap();
    assert_eq!(t.temperature_c, None);
    assert_eq!(t.fault, Some(SensorFault::DividerSaturated));
}

#[test]
fn persistent_fault_is_reported_once_per_change() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.thermistor_raw = 4095;
    for _ in 0..3 {
        app.tick(&mut hw, &mut sink);
    }
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::SensorFault(_))),
        1,
        "an unchanged fault is reported once"
    );
    assert_eq!(sink.count(|e| matches!(e, AppEvent::Telemetry(_))), 3);

    // A different fault kind is reported again.
    hw.thermistor_raw = 0;
    app.tick(&mut hw, &mut sink);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::SensorFault(_))), 2);

    // Recovery and a later fault of the first kind: reported again.
    hw.set_celsius(20.0);
    app.tick(&mut hw, &mut sink);
    hw.thermistor_raw = 4095;
    app.tick(&mut hw, &mut sink);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::SensorFault(_))), 3);
}

#[test]
fn shorted_thermistor_forces_off() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.thermistor_raw = 0;
    app.tick(&mut hw, &mut sink);
    assert_eq!(app.state(), HeatingState::Off);
    assert!(sink
        .events
        .contains(&AppEvent::SensorFault(SensorFault::ShortCircuit)));
}

#[test]
fn dead_battery_blocks_heating_when_cold() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.set_pack_volts(5.5);
    hw.set_celsius(15.0);
    app.tick(&mut hw, &mut sink);

    assert_eq!(app.state(), HeatingState::Off);
    assert!(!hw.heater_on);
    let t = sink.last_telemetry().unwrap();
    assert_eq!(t.battery_percentage, 0);
}

#[test]
fn implausible_battery_sample_does_not_move_average() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.set_pack_volts(8.0);
    for _ in 0..3 {
        app.tick(&mut hw, &mut sink);
    }
    let before = sink.last_telemetry().unwrap().battery_voltage;

    // Full-scale count maps above 10 V and is ignored by the average.
    hw.battery_raw = 4095;
    app.tick(&mut hw, &mut sink);
    let after = sink.last_telemetry().unwrap().battery_voltage;
    assert!((before - after).abs() < 1e-4);
}

#[test]
fn telemetry_carries_raw_counts_resistance_and_uptime() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.set_celsius(20.0);
    for _ in 0..3 {
        app.tick(&mut hw, &mut sink);
    }
    let t = sink.last_telemetry().unwrap();
    assert_eq!(t.battery_raw, hw.battery_raw);
    assert_eq!(t.thermistor_raw, hw.thermistor_raw);
    let r = t.thermistor_resistance_ohms.unwrap();
    let expected = 50_000.0 * f32::from(hw.thermistor_raw) / f32::from(4095 - hw.thermistor_raw);
    assert!((r - expected).abs() / expected < 1e-3, "r={r} expected={expected}");
    // Default period is 1000 ms.
    assert_eq!(t.uptime_secs, 3);
    assert_eq!(app.uptime_secs(), 3);

    hw.thermistor_raw = 4095;
    app.tick(&mut hw, &mut sink);
    let t = sink.last_telemetry().unwrap();
    assert_eq!(t.thermistor_raw, 4095);
    assert!(t.thermistor_resistance_ohms.is_none());
    assert_eq!(t.uptime_secs, 4);
}

#[test]
fn uptime_follows_configured_period() {
    let config = SystemConfig {
        control_loop_interval_ms: 250,
        ..SystemConfig::default()
    };
    let mut app = AppService::new(&config).unwrap();
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    app.start(&mut hw, &mut sink);
    for _ in 0..7 {
        app.tick(&mut hw, &mut sink);
    }
    assert_eq!(app.uptime_secs(), 1);
    app.tick(&mut hw, &mut sink);
    assert_eq!(app.uptime_secs(), 2);
}

#[test]
fn every_tick_emits_telemetry() {
    let (mut app, mut hw, mut sink) = make_app();
    sink.clear();
    for _ in 0..5 {
        app.tick(&mut hw, &mut sink);
    }
    assert_eq!(sink.count(|e| matches!(e, AppEvent::Telemetry(_))), 5);
    assert_eq!(app.tick_count(), 5);
}

// ── Commands ──────────────────────────────────────────────────

#[test]
fn out_of_range_target_is_rejected_without_side_effects() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.set_celsius(24.5);
    app.tick(&mut hw, &mut sink);
    let calls_before = hw.calls.len();
    sink.clear();

    let err = app
        .apply_command(AppCommand::SetTargetTemperature(35.0), &mut hw, &mut sink)
        .unwrap_err();

    assert_eq!(err.requested, 35.0);
    assert_eq!(app.target_temperature(), 25.0);
    assert_eq!(app.state(), HeatingState::Maintenance);
    assert_eq!(hw.calls.len(), calls_before, "no outputs touched");
    assert_eq!(sink.events, vec![AppEvent::CommandRejected(err)]);
}

#[test]
fn accepted_target_is_applied_immediately() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.set_celsius(24.5);
    app.tick(&mut hw, &mut sink);
    assert_eq!(app.state(), HeatingState::Maintenance);
    assert!(!hw.heater_on);

    app.apply_command(AppCommand::SetTargetTemperature(28.0), &mut hw, &mut sink)
        .unwrap();

    assert_eq!(app.target_temperature(), 28.0);
    assert_eq!(app.state(), HeatingState::On);
    assert!(hw.heater_on, "re-evaluated without waiting for a tick");
    let t = sink.last_telemetry().unwrap();
    assert_eq!(t.target_temperature_c, 28.0);
    assert_eq!(t.heating_state, HeatingState::On);
}

#[test]
fn target_before_first_tick_only_updates_setpoint() {
    let (mut app, mut hw, mut sink) = make_app();
    app.apply_command(AppCommand::SetTargetTemperature(22.0), &mut hw, &mut sink)
        .unwrap();
    assert_eq!(app.target_temperature(), 22.0);
    assert_eq!(app.state(), HeatingState::Off);
    assert_eq!(hw.calls, vec![HeaterCall::AllOff]);
}

#[test]
fn report_status_emits_telemetry_only() {
    let (mut app, mut hw, mut sink) = make_app();
    app.tick(&mut hw, &mut sink);
    let calls_before = hw.calls.len();
    sink.clear();

    app.apply_command(AppCommand::ReportStatus, &mut hw, &mut sink)
        .unwrap();

    assert_eq!(hw.calls.len(), calls_before);
    assert_eq!(sink.events.len(), 1);
    assert!(matches!(sink.events[0], AppEvent::Telemetry(_)));
}
