#![no_std]
#![no_main]

use app::adc::L1Adc;
use app::config;
use app::debug::halt;
use app::serial::LineWriter;
use app::systick::{SysTickSource, COUNTER};
use common::PollBudget;
use cortex_m_rt::entry;
use defmt::{error, info};
use embassy_stm32::usart::UartTx;
use thermal_sensor::sampler::Sampler;
use thermal_sensor::sensor::initialize;
use {defmt_rtt as _, panic_probe as _};

#[entry]
fn main() -> ! {
    let mut stm32_config = embassy_stm32::Config::default();
    {
        use embassy_stm32::rcc::*;
        // 16 MHz HSI for both the core and the ADC
        stm32_config.rcc.hsi = true;
        stm32_config.rcc.sys = Sysclk::HSI;
    }
    let p = embassy_stm32::init(stm32_config);

    let calibration = match config::calibration() {
        Ok(calibration) => calibration,
        Err(e) => {
            error!("Invalid calibration: {}", e);
            halt()
        }
    };

    let Some(core) = cortex_m::Peripherals::take() else {
        error!("Core peripherals already taken");
        halt()
    };

    let mut uart_config = embassy_stm32::usart::Config::default();
    uart_config.baudrate = config::UART_BAUDRATE;
    let tx = match UartTx::new_blocking(p.USART2, p.PA2, uart_config) {
        Ok(tx) => tx,
        Err(e) => {
            error!("Cannot initialize USART: {}", e);
            halt()
        }
    };
    let mut out = LineWriter::new(tx);

    let mut adc = L1Adc::new();
    let mut ticks = SysTickSource::new(core.SYST, config::HCLK_HZ);
    if let Err(e) = initialize(
        &mut adc,
        &mut ticks,
        &config::sensor_config(),
        PollBudget::Unbounded,
    ) {
        error!("Sensor setup failed: {}", e);
        halt()
    }

    info!(
        "Sampling every {}ms (TS_CAL1 {}, TS_CAL2 {})",
        config::PERIOD_MS,
        calibration.get_ts_cal1(),
        calibration.get_ts_cal2()
    );

    let mut sampler = Sampler::new(adc, &COUNTER, calibration, config::sampler_options());
    loop {
        // with unbounded budgets only a failed UART write ends a run
        if let Err(e) = sampler.run(&mut out, None) {
            error!("Sampling interrupted: {}", e);
            if let Err(e) = sampler.skip_period() {
                error!("Delay failed: {}", e);
            }
        }
    }
}
