//! One-shot ADC initialisation for the analog temperature path.
//!
//! Configures ADC1 in oneshot mode using raw ESP-IDF sys calls.  Called once
//! from `main()` before the sampling loop starts.  GPIO for the LEDs, button
//! and DHT11 line is owned through `esp-idf-hal` `PinDriver`s instead.
//!
//! On host builds the ADC is replaced by an injectable atomic.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, Ordering};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;
#[cfg(target_os = "espidf")]
use log::{info, warn};

/// ADC1 channel wired to the LM45 output (GPIO4 on ESP32-S3).
pub const ADC1_CH_ANALOG_TEMP: u32 = 3;

// ── Error type ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={})", rc),
        }
    }
}

impl std::error::Error for HwInitError {}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// main-loop read path.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
pub fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    // 12 dB attenuation covers the full 0 – 3.3 V range.
    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    // SAFETY: handle initialised above; single-threaded boot path.
    let ret =
        unsafe { adc_oneshot_config_channel(adc1_handle(), ADC1_CH_ANALOG_TEMP, &chan_cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    info!("hw_init: ADC1 configured (CH{}=LM45)", ADC1_CH_ANALOG_TEMP);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_adc() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ADC init skipped");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> u16 {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract, single-threaded main-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        warn!("ADC1 CH{} read failed (rc={})", channel, ret);
        return 0;
    }
    raw.max(0) as u16
}

#[cfg(not(target_os = "espidf"))]
static SIM_ANALOG_RAW: AtomicU16 = AtomicU16::new(0);

/// Inject the raw code returned by the simulated ADC.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_analog_raw(raw: u16) {
    SIM_ANALOG_RAW.store(raw, Ordering::Relaxed);
}

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(_channel: u32) -> u16 {
    SIM_ANALOG_RAW.load(Ordering::Relaxed)
}
