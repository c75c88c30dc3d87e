//! Control policy.

pub mod heating;
