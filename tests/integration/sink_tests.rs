//! Telemetry fan-out: the same events reach the log and the characteristic
//! values.

use super::mock_hw::{MockHardware, RecordingSink};

use heatband::adapters::payload::{CharacteristicSink, decode_heating_write};
use heatband::app::service::AppService;
use heatband::config::SystemConfig;

#[test]
fn tuple_sink_feeds_both_adapters() {
    let config = SystemConfig::default();
    let mut app = AppService::new(&config).unwrap();
    let mut hw = MockHardware::new();
    let mut sink = (RecordingSink::new(), CharacteristicSink::new());

    app.start(&mut hw, &mut sink);
    hw.set_celsius(20.0);
    app.tick(&mut hw, &mut sink);

    let (recorded, chars) = &sink;
    assert!(recorded.last_telemetry().is_some());
    // Power-on, then the first telemetry.
    assert_eq!(chars.revision(), 2);

    let power: serde_json::Value = serde_json::from_slice(chars.power_value()).unwrap();
    assert_eq!(power["powerStatus"], "ON");

    let heating: serde_json::Value = serde_json::from_slice(chars.heating_value()).unwrap();
    assert_eq!(heating["heatingStatus"], "ON");
    assert_eq!(heating["targetTemperature"], 25.0);
    let battery: serde_json::Value = serde_json::from_slice(chars.battery_value()).unwrap();
    assert_eq!(battery["batteryLevel"], 83);
}

#[test]
fn characteristic_write_drives_the_service() {
    let config = SystemConfig::default();
    let mut app = AppService::new(&config).unwrap();
    let mut hw = MockHardware::new();
    let mut sink = (RecordingSink::new(), CharacteristicSink::new());
    app.start(&mut hw, &mut sink);
    hw.set_celsius(24.5);
    app.tick(&mut hw, &mut sink);

    let cmd = decode_heating_write(br#"{"targetTemperature": 29}"#, &config.heating).unwrap();
    app.apply_command(cmd, &mut hw, &mut sink).unwrap();

    let heating: serde_json::Value = serde_json::from_slice(sink.1.heating_value()).unwrap();
    assert_eq!(heating["targetTemperature"], 29.0);
    assert_eq!(heating["heatingStatus"], "ON");
}
