//! Heatband Firmware — Main Entry Point
//!
//! Hexagonal architecture with a fixed-period synchronous control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter         LogTelemetrySink   CharacteristicSink │
//! │  (AnalogSource+Heater)   (TelemetrySink)    (TelemetrySink)    │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Battery estimator · Thermistor · Heating controller   │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Command inbox (embassy-sync channel) ──▶ apply_command        │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::time::{Duration, Instant};

use anyhow::Result;
use esp_idf_svc::hal::gpio::PinDriver;
use esp_idf_svc::hal::peripherals::Peripherals;
use log::info;

use heatband::adapters::hardware::HardwareAdapter;
use heatband::adapters::log_sink::LogTelemetrySink;
use heatband::adapters::payload::CharacteristicSink;
use heatband::app::inbox;
use heatband::app::service::AppService;
use heatband::config::SystemConfig;
use heatband::drivers::adc::OneshotAdc;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Heatband v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration (fatal if non-physical) ──────────────
    let config = SystemConfig::default();
    let mut app = AppService::new(&config)?;

    // ── 3. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let heater_pin = PinDriver::output(peripherals.pins.gpio15)?;
    let indicator_pin = PinDriver::output(peripherals.pins.gpio25)?;
    let mut led_ground = PinDriver::output(peripherals.pins.gpio13)?;
    led_ground.set_low()?;

    let adc = OneshotAdc::new()?;
    let mut hw = HardwareAdapter::new(adc, heater_pin, indicator_pin);
    let mut sink = (LogTelemetrySink::new(), CharacteristicSink::new());

    app.start(&mut hw, &mut sink);

    // ── 4. Control loop ───────────────────────────────────────
    let period = Duration::from_millis(u64::from(config.control_loop_interval_ms));
    info!("Control loop running every {} ms", config.control_loop_interval_ms);

    loop {
        let started = Instant::now();

        // Rejections are logged and reported by the service.
        inbox::drain(|cmd| {
            let _ = app.apply_command(cmd, &mut hw, &mut sink);
        });

        app.tick(&mut hw, &mut sink);

        if let Some(rest) = period.checked_sub(started.elapsed()) {
            std::thread::sleep(rest);
        }
    }
}
