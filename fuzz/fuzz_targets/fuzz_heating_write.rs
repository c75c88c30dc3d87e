//! Fuzz target: `decode_heating_write`
//!
//! Drives arbitrary bytes through the heating-characteristic write path
//! and asserts that anything it accepts is a finite target inside the
//! configured bound, and that the service agrees to apply it.
//!
//! cargo fuzz run fuzz_heating_write

#![no_main]

use heatband::adapters::payload::decode_heating_write;
use heatband::app::commands::AppCommand;
use heatband::config::HeatingConfig;
use heatband::control::heating::HeatingController;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let bounds = HeatingConfig::default();
    if let Ok(AppCommand::SetTargetTemperature(t)) = decode_heating_write(data, &bounds) {
        assert!(t.is_finite());
        assert!(t >= bounds.target_min_c && t <= bounds.target_max_c);

        let mut controller = HeatingController::new(bounds).unwrap();
        assert!(controller.set_target_temperature(t).is_ok());
        assert_eq!(controller.target_temperature(), t);
    }
});
