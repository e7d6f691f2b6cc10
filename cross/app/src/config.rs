use common::AdcConfig;
use math::calibration::{Calibration, CalibrationError};
use thermal_sensor::sampler::SamplerOptions;
use thermal_sensor::sensor::{SensorConfig, TEMPERATURE_SENSOR_RANK, TICK_FREQUENCY_HZ};

// generated by build.rs from config/config.toml
include!(concat!(env!("OUT_DIR"), "/_config.rs"));

pub fn calibration() -> Result<Calibration, CalibrationError> {
    Calibration::new(VDD_SCALE, VREF_SCALE, TS_CAL1, TS_CAL2)
}

pub fn sensor_config() -> SensorConfig {
    SensorConfig {
        adc: AdcConfig::default(),
        rank: TEMPERATURE_SENSOR_RANK,
        sample_time: SAMPLE_TIME,
        adc_clock_hz: ADC_CLOCK_HZ,
        min_sampling_ns: MIN_SAMPLING_NS,
        tick_frequency_hz: TICK_FREQUENCY_HZ,
    }
}

pub fn sampler_options() -> SamplerOptions {
    SamplerOptions {
        period_ms: PERIOD_MS,
        ..Default::default()
    }
}
