use common::{AdcConfig, Alignment, ExternalTrigger, SampleTime, TemperatureAdc};
use embassy_stm32::pac;
use embassy_stm32::pac::adc::vals;
use math::Resolution;

use crate::assert_param;

/// ADC1 input wired to the internal temperature sensor
pub const TEMPERATURE_CHANNEL: u8 = 16;

fn resolution_bits(resolution: Resolution) -> u8 {
    match resolution {
        Resolution::BITS12 => 0b00,
        Resolution::BITS10 => 0b01,
        Resolution::BITS8 => 0b10,
        Resolution::BITS6 => 0b11,
    }
}

fn trigger_bits(trigger: ExternalTrigger) -> u8 {
    match trigger {
        ExternalTrigger::None => 0b00,
        ExternalTrigger::RisingEdge => 0b01,
        ExternalTrigger::FallingEdge => 0b10,
        ExternalTrigger::BothEdges => 0b11,
    }
}

/// Register level ADC1 driver for STM32L1.
pub struct L1Adc {
    regs: pac::adc::Adc,
}

impl L1Adc {
    pub fn new() -> Self {
        Self { regs: pac::ADC1 }
    }
}

impl Default for L1Adc {
    fn default() -> Self {
        Self::new()
    }
}

impl TemperatureAdc for L1Adc {
    fn enable_clock(&mut self) {
        // the converter core always runs on HSI, whatever SYSCLK is
        pac::RCC.cr().modify(|w| w.set_hsion(true));
        while !pac::RCC.cr().read().hsirdy() {}
        pac::RCC.apb2enr().modify(|w| w.set_adc1en(true));
    }

    fn configure(&mut self, config: &AdcConfig) {
        assert_param!((1..=28).contains(&config.conversions));
        self.regs.cr1().modify(|w| {
            w.set_res(vals::Res::from_bits(resolution_bits(config.resolution)));
            w.set_scan(config.scan);
        });
        self.regs.cr2().modify(|w| {
            w.set_cont(config.continuous);
            w.set_exten(vals::Exten::from_bits(trigger_bits(config.external_trigger)));
            w.set_align(config.alignment == Alignment::Left);
        });
        self.regs
            .sqr1()
            .modify(|w| w.set_l(config.conversions.saturating_sub(1)));
    }

    fn enable(&mut self) {
        self.regs.cr2().modify(|w| w.set_adon(true));
    }

    fn enable_temperature_sensor(&mut self) {
        // shared with VREFINT, CCR sits in the ADC1 block on L1
        self.regs.ccr().modify(|w| w.set_tsvrefe(true));
    }

    fn configure_temperature_channel(&mut self, rank: u8, sample_time: SampleTime) {
        assert_param!((1..=28).contains(&rank));

        // channels 10 to 19 live in SMPR2
        self.regs.smpr2().modify(|w| {
            w.set_smp(
                (TEMPERATURE_CHANNEL - 10) as usize,
                vals::SampleTime::from_bits(sample_time.bits()),
            )
        });

        // SQR5 holds ranks 1-6, SQR1 the last ones
        let slot = ((rank - 1) % 6) as usize;
        match rank {
            1..=6 => self
                .regs
                .sqr5()
                .modify(|w| w.set_sq(slot, TEMPERATURE_CHANNEL)),
            7..=12 => self
                .regs
                .sqr4()
                .modify(|w| w.set_sq(slot, TEMPERATURE_CHANNEL)),
            13..=18 => self
                .regs
                .sqr3()
                .modify(|w| w.set_sq(slot, TEMPERATURE_CHANNEL)),
            19..=24 => self
                .regs
                .sqr2()
                .modify(|w| w.set_sq(slot, TEMPERATURE_CHANNEL)),
            _ => self
                .regs
                .sqr1()
                .modify(|w| w.set_sq((rank - 25) as usize, TEMPERATURE_CHANNEL)),
        }
    }

    fn is_ready(&self) -> bool {
        self.regs.sr().read().adons()
    }

    fn start_conversion(&mut self) {
        self.regs.cr2().modify(|w| w.set_swstart(true));
    }

    fn is_conversion_complete(&self) -> bool {
        self.regs.sr().read().eoc()
    }

    // reading DR clears EOC
    fn read_data(&mut self) -> u16 {
        self.regs.dr().read().0 as u16
    }
}
