//! Application core — pure domain logic, zero I/O.
//!
//! This module wires the sensor converters and the heating policy into a
//! single per-tick service.  All interaction with hardware happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod commands;
pub mod events;
pub mod inbox;
pub mod ports;
pub mod service;
