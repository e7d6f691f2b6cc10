#![no_std]
#![no_main]

use app::adc::L1Adc;
use app::config;
use app::systick::{SysTickSource, COUNTER};
use common::{PollBudget, SampleTime};
use cortex_m_rt::entry;
use defmt::{error, info};
use heapless::String;
use math::calibration::Calibration;
use thermal_sensor::sampler::{Sampler, SamplerOptions};
use thermal_sensor::sensor::{initialize, SensorConfig};
use {defmt_rtt as _, panic_probe as _};

// Take a few readings with the factory defaults and print them over RTT only.
#[entry]
fn main() -> ! {
    let mut stm32_config = embassy_stm32::Config::default();
    {
        use embassy_stm32::rcc::*;
        stm32_config.rcc.hsi = true;
        stm32_config.rcc.sys = Sysclk::HSI;
    }
    let _p = embassy_stm32::init(stm32_config);
    let core = cortex_m::Peripherals::take().unwrap();

    let mut adc = L1Adc::new();
    let mut ticks = SysTickSource::new(core.SYST, config::HCLK_HZ);
    let sensor_config = SensorConfig {
        sample_time: SampleTime::Cycles192,
        ..Default::default()
    };
    initialize(&mut adc, &mut ticks, &sensor_config, PollBudget::Polls(100_000)).unwrap();

    let options = SamplerOptions {
        period_ms: 250,
        conversion_budget: PollBudget::Polls(100_000),
        delay_budget: PollBudget::Unbounded,
    };
    let mut sampler = Sampler::new(adc, &COUNTER, Calibration::default(), options);

    for _ in 0..8 {
        let mut line: String<32> = String::new();
        match sampler.step(&mut line) {
            Ok(reading) => info!("raw {} -> {}", reading.raw, reading),
            Err(e) => error!("{}", e),
        }
    }
    info!("done after {} cycles", sampler.cycles());

    loop {
        cortex_m::asm::wfi();
    }
}
