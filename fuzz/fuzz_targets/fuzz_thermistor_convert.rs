//! Fuzz target: `ThermistorConverter::convert`
//!
//! Arbitrary raw counts and divider references must yield either a finite
//! temperature or a fault, never a panic or NaN.
//!
//! cargo fuzz run fuzz_thermistor_convert

#![no_main]

use heatband::config::ThermistorConfig;
use heatband::sensors::FixedSupply;
use heatband::sensors::thermistor::ThermistorConverter;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (u16, f32)| {
    let (raw, vref) = data;
    let conv = ThermistorConverter::new(ThermistorConfig::default(), FixedSupply(vref)).unwrap();
    if let Ok(reading) = conv.convert(raw) {
        assert!(reading.celsius.is_finite());
        assert!(reading.resistance_ohms > 0.0);
    }
});
