use std::{
    env,
    fs,
    path::{Path, PathBuf},
};

use math::calibration::Calibration;

mod external {
    use serde_derive::{Deserialize, Serialize};

    // [calibration]
    // vdd_scale = 33
    // vref_scale = 30
    // ts_cal1 = 674
    // ts_cal2 = 857
    #[derive(Debug, Serialize, Deserialize, Clone, Copy)]
    pub struct CalibrationConfig {
        vdd_scale: u16,
        vref_scale: u16,
        ts_cal1: u16,
        ts_cal2: u16,
    }

    impl Default for CalibrationConfig {
        fn default() -> Self {
            Self {
                vdd_scale: 33,
                vref_scale: 30,
                ts_cal1: 674,
                ts_cal2: 857,
            }
        }
    }

    impl CalibrationConfig {
        pub fn get_vdd_scale(&self) -> u16 {
            self.vdd_scale
        }

        pub fn get_vref_scale(&self) -> u16 {
            self.vref_scale
        }

        pub fn get_ts_cal1(&self) -> u16 {
            self.ts_cal1
        }

        pub fn get_ts_cal2(&self) -> u16 {
            self.ts_cal2
        }
    }

    // [adc]
    // clock = 16000000
    // sample_cycles = 384
    // min_sampling_ns = 4000
    #[derive(Debug, Serialize, Deserialize, Clone, Copy)]
    pub struct AdcConfig {
        clock: u32,
        sample_cycles: u32,
        min_sampling_ns: u32,
    }

    impl Default for AdcConfig {
        fn default() -> Self {
            Self {
                clock: 16_000_000,
                sample_cycles: 384,
                min_sampling_ns: 4_000,
            }
        }
    }

    impl AdcConfig {
        pub fn get_clock(&self) -> u32 {
            self.clock
        }

        pub fn get_sample_cycles(&self) -> u32 {
            self.sample_cycles
        }

        pub fn get_min_sampling_ns(&self) -> u32 {
            self.min_sampling_ns
        }
    }

    // [sampler]
    // period_ms = 1000
    // hclk = 16000000
    #[derive(Debug, Serialize, Deserialize, Clone, Copy)]
    pub struct SamplerConfig {
        period_ms: u32,
        hclk: u32,
    }

    impl Default for SamplerConfig {
        fn default() -> Self {
            Self {
                period_ms: 1000,
                hclk: 16_000_000,
            }
        }
    }

    impl SamplerConfig {
        pub fn get_period_ms(&self) -> u32 {
            self.period_ms
        }

        pub fn get_hclk(&self) -> u32 {
            self.hclk
        }
    }

    // [uart]
    // baudrate = 115200
    #[derive(Debug, Serialize, Deserialize, Clone, Copy)]
    pub struct UartConfig {
        baudrate: u32,
    }

    impl Default for UartConfig {
        fn default() -> Self {
            Self { baudrate: 115_200 }
        }
    }

    impl UartConfig {
        pub fn get_baudrate(&self) -> u32 {
            self.baudrate
        }
    }

    #[derive(Default, Debug, Serialize, Deserialize, Clone)]
    pub struct MyConfig {
        pub calibration: CalibrationConfig,
        pub adc: AdcConfig,
        pub sampler: SamplerConfig,
        pub uart: UartConfig,
    }
}

fn sample_time_variant(cycles: u32) -> Option<&'static str> {
    match cycles {
        4 => Some("Cycles4"),
        9 => Some("Cycles9"),
        16 => Some("Cycles16"),
        24 => Some("Cycles24"),
        48 => Some("Cycles48"),
        96 => Some("Cycles96"),
        192 => Some("Cycles192"),
        384 => Some("Cycles384"),
        _ => None,
    }
}

fn main() {
    println!("cargo::rerun-if-changed=config/config.toml");
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    let path = Path::new("config/config.toml");
    let conf = confy::load_path::<external::MyConfig>(path).expect("Error reading config file");

    let vdd_scale = conf.calibration.get_vdd_scale();
    let vref_scale = conf.calibration.get_vref_scale();
    let ts_cal1 = conf.calibration.get_ts_cal1();
    let ts_cal2 = conf.calibration.get_ts_cal2();
    if let Err(e) = Calibration::new(vdd_scale, vref_scale, ts_cal1, ts_cal2) {
        panic!("Invalid calibration: {}", e);
    }

    let adc_clock = conf.adc.get_clock();
    if adc_clock == 0 {
        panic!("ADC clock must be greater than zero");
    }
    let sample_cycles = conf.adc.get_sample_cycles();
    let sample_time = sample_time_variant(sample_cycles)
        .unwrap_or_else(|| panic!("ADC sample time of {} cycles is not available", sample_cycles));
    let min_sampling_ns = conf.adc.get_min_sampling_ns();

    let period_ms = conf.sampler.get_period_ms();
    let hclk = conf.sampler.get_hclk();
    if hclk < 1000 {
        panic!("HCLK must be at least 1kHz to produce a millisecond tick");
    }

    let uart_baudrate = conf.uart.get_baudrate();

    let string = format!(
        "
use common::SampleTime;

pub const VDD_SCALE: u16 = {};
pub const VREF_SCALE: u16 = {};
pub const TS_CAL1: u16 = {};
pub const TS_CAL2: u16 = {};
pub const ADC_CLOCK_HZ: u32 = {};
pub const SAMPLE_TIME: SampleTime = SampleTime::{};
pub const MIN_SAMPLING_NS: u32 = {};
pub const PERIOD_MS: u32 = {};
pub const HCLK_HZ: u32 = {};
pub const UART_BAUDRATE: u32 = {};
",
        vdd_scale,
        vref_scale,
        ts_cal1,
        ts_cal2,
        adc_clock,
        sample_time,
        min_sampling_ns,
        period_ms,
        hclk,
        uart_baudrate,
    );
    let out_dir = &PathBuf::from(env::var_os("OUT_DIR").unwrap());
    let out_file = out_dir.join("_config.rs").to_string_lossy().to_string();
    fs::write(&out_file, string.as_str()).unwrap();
}
