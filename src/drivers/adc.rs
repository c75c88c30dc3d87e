//! Oneshot ADC reader for the battery and thermistor inputs.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: one oneshot handle per ADC unit, 12-bit, 12 dB attenuation,
//! configured via raw sys calls.
//! On host/test: returns per-channel values injected with [`OneshotAdc::sim_set`].

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;
#[cfg(target_os = "espidf")]
use log::{info, warn};

use crate::app::ports::{AdcChannel, AnalogSource};
#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdcError {
    UnitInitFailed(i32),
    ChannelConfigFailed(i32),
}

impl core::fmt::Display for AdcError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnitInitFailed(rc) => write!(f, "ADC unit init failed (rc={})", rc),
            Self::ChannelConfigFailed(rc) => write!(f, "ADC channel config failed (rc={})", rc),
        }
    }
}

impl std::error::Error for AdcError {}

// ── Driver ────────────────────────────────────────────────────

pub struct OneshotAdc {
    #[cfg(target_os = "espidf")]
    unit1: adc_oneshot_unit_handle_t,
    #[cfg(target_os = "espidf")]
    unit2: adc_oneshot_unit_handle_t,
    #[cfg(not(target_os = "espidf"))]
    sim: [u16; 2],
}

#[cfg(target_os = "espidf")]
impl OneshotAdc {
    /// Bring up ADC1 (battery) and ADC2 (thermistor).
    pub fn new() -> Result<Self, AdcError> {
        let mut adc = Self {
            unit1: core::ptr::null_mut(),
            unit2: core::ptr::null_mut(),
        };
        // SAFETY: called once from main() before the control loop; the
        // handles are owned by this value and released in Drop.
        unsafe {
            adc.unit1 = new_unit(adc_unit_t_ADC_UNIT_1)?;
            adc.unit2 = new_unit(adc_unit_t_ADC_UNIT_2)?;
            config_channel(adc.unit1, pins::BATTERY_ADC_CHANNEL)?;
            config_channel(adc.unit2, pins::THERMISTOR_ADC_CHANNEL)?;
        }
        info!(
            "adc: battery=ADC{}_CH{} (GPIO{}), thermistor=ADC{}_CH{} (GPIO{})",
            pins::BATTERY_ADC_UNIT,
            pins::BATTERY_ADC_CHANNEL,
            pins::BATTERY_ADC_GPIO,
            pins::THERMISTOR_ADC_UNIT,
            pins::THERMISTOR_ADC_CHANNEL,
            pins::THERMISTOR_ADC_GPIO,
        );
        Ok(adc)
    }

    /// A failed conversion reads as 0, which downstream treats as a dead
    /// battery or a shorted thermistor, and heating stays off.
    pub fn read(&mut self, channel: AdcChannel) -> u16 {
        let (handle, chan) = match channel {
            AdcChannel::Battery => (self.unit1, pins::BATTERY_ADC_CHANNEL),
            AdcChannel::Thermistor => (self.unit2, pins::THERMISTOR_ADC_CHANNEL),
        };
        let mut raw: i32 = 0;
        // SAFETY: handle was created in new() and lives as long as self.
        let ret = unsafe { adc_oneshot_read(handle, chan, &mut raw) };
        if ret != ESP_OK as i32 {
            warn!("adc: read {:?} failed (rc={})", channel, ret);
            return 0;
        }
        raw.max(0) as u16
    }
}

#[cfg(target_os = "espidf")]
unsafe fn new_unit(unit_id: adc_unit_t) -> Result<adc_oneshot_unit_handle_t, AdcError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    let mut handle: adc_oneshot_unit_handle_t = core::ptr::null_mut();
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &mut handle) };
    if ret != ESP_OK as i32 {
        return Err(AdcError::UnitInitFailed(ret));
    }
    Ok(handle)
}

#[cfg(target_os = "espidf")]
unsafe fn config_channel(handle: adc_oneshot_unit_handle_t, channel: u32) -> Result<(), AdcError> {
    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    let ret = unsafe { adc_oneshot_config_channel(handle, channel, &chan_cfg) };
    if ret != ESP_OK as i32 {
        return Err(AdcError::ChannelConfigFailed(ret));
    }
    Ok(())
}

#[cfg(target_os = "espidf")]
impl Drop for OneshotAdc {
    fn drop(&mut self) {
        // SAFETY: both handles came from adc_oneshot_new_unit and are not used after this.
        unsafe {
            adc_oneshot_del_unit(self.unit1);
            adc_oneshot_del_unit(self.unit2);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
impl OneshotAdc {
    pub fn new() -> Result<Self, AdcError> {
        log::info!("adc(sim): using injected samples");
        Ok(Self { sim: [0, 2048] })
    }

    pub fn sim_set(&mut self, channel: AdcChannel, raw: u16) {
        self.sim[sim_index(channel)] = raw;
    }

    pub fn read(&mut self, channel: AdcChannel) -> u16 {
        self.sim[sim_index(channel)]
    }
}

#[cfg(not(target_os = "espidf"))]
fn sim_index(channel: AdcChannel) -> usize {
    match channel {
        AdcChannel::Battery => 0,
        AdcChannel::Thermistor => 1,
    }
}

impl AnalogSource for OneshotAdc {
    fn sample(&mut self, channel: AdcChannel) -> u16 {
        self.read(channel)
    }
}
