use common::{AdcConfig, PollBudget, SampleTime, TemperatureAdc, TickSource};

use crate::SamplerError;

// rank 1 does not matter in single channel mode, but it is the only one converted
pub const TEMPERATURE_SENSOR_RANK: u8 = 1;
pub const TICK_FREQUENCY_HZ: u32 = 1000;
// HSI feeds the converter on STM32L1
pub const DEFAULT_ADC_CLOCK_HZ: u32 = 16_000_000;
// minimum sampling time of the internal sensor
pub const DEFAULT_MIN_SAMPLING_NS: u32 = 4_000;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SensorConfig {
    pub adc: AdcConfig,
    pub rank: u8,
    pub sample_time: SampleTime,
    pub adc_clock_hz: u32,
    pub min_sampling_ns: u32,
    pub tick_frequency_hz: u32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            adc: AdcConfig::default(),
            rank: TEMPERATURE_SENSOR_RANK,
            // 384 cycles is far above the minimum, fewer should work too
            sample_time: SampleTime::longest(),
            adc_clock_hz: DEFAULT_ADC_CLOCK_HZ,
            min_sampling_ns: DEFAULT_MIN_SAMPLING_NS,
            tick_frequency_hz: TICK_FREQUENCY_HZ,
        }
    }
}

impl SensorConfig {
    pub fn check_sample_time(&self) -> Result<(), SamplerError> {
        if self
            .sample_time
            .covers(self.min_sampling_ns, self.adc_clock_hz)
        {
            Ok(())
        } else {
            Err(SamplerError::SampleTimeTooShort {
                window_ns: self.sample_time.duration_ns(self.adc_clock_hz),
                required_ns: self.min_sampling_ns,
            })
        }
    }
}

/// Bring up the tick source and the converter, then start converting.
///
/// Nothing is touched if the sample time is rejected. On success the ADC is
/// free running and the first end of conversion is pending.
pub fn initialize<A: TemperatureAdc, T: TickSource>(
    adc: &mut A,
    ticks: &mut T,
    config: &SensorConfig,
    budget: PollBudget,
) -> Result<(), SamplerError> {
    config.check_sample_time()?;

    ticks.start_periodic(config.tick_frequency_hz);

    adc.enable_clock();
    adc.configure(&config.adc);
    adc.enable();
    adc.enable_temperature_sensor();
    adc.configure_temperature_channel(config.rank, config.sample_time);

    if !budget.spin_until(|| adc.is_ready()) {
        return Err(SamplerError::NotReady);
    }

    adc.start_conversion();
    Ok(())
}
