use core::fmt::{Display, Write};

use common::{PollBudget, TemperatureAdc};
use math::calibration::Calibration;
use math::measurements::Temperature;

use crate::report::write_report;
use crate::ticker::MillisecondCounter;
use crate::SamplerError;

pub const DEFAULT_PERIOD_MS: u32 = 1000;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SamplerState {
    WaitForConversion,
    ReadAndCompensate,
    ConvertToCelsius,
    Report,
    Delay,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    pub raw: u16,
    pub compensated: u16,
    pub celsius: i16,
}

impl Reading {
    pub fn temperature(&self) -> Temperature {
        Temperature::from_celsius(f64::from(self.celsius))
    }
}

impl Display for Reading {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::write!(f, "{}\t\t{}C", self.compensated, self.celsius)
    }
}

#[cfg(feature = "defmt-log")]
impl defmt::Format for Reading {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "[raw: {}] [compensated: {}] [temperature: {}C]",
            self.raw,
            self.compensated,
            self.celsius
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SamplerOptions {
    pub period_ms: u32,
    pub conversion_budget: PollBudget,
    pub delay_budget: PollBudget,
}

impl Default for SamplerOptions {
    fn default() -> Self {
        Self {
            period_ms: DEFAULT_PERIOD_MS,
            conversion_budget: PollBudget::Unbounded,
            delay_budget: PollBudget::Unbounded,
        }
    }
}

/// Device state of the sampling loop.
///
/// The converter must already be running (see [`crate::sensor::initialize`]):
/// in continuous mode every read leaves room for the next conversion, so no
/// start is issued here.
pub struct Sampler<'a, A: TemperatureAdc> {
    adc: A,
    counter: &'a MillisecondCounter,
    calibration: Calibration,
    options: SamplerOptions,
    state: SamplerState,
    last_reading: Option<Reading>,
    cycles: u32,
}

impl<'a, A: TemperatureAdc> Sampler<'a, A> {
    pub fn new(
        adc: A,
        counter: &'a MillisecondCounter,
        calibration: Calibration,
        options: SamplerOptions,
    ) -> Self {
        Self {
            adc,
            counter,
            calibration,
            options,
            state: SamplerState::WaitForConversion,
            last_reading: None,
            cycles: 0,
        }
    }

    pub fn state(&self) -> SamplerState {
        self.state
    }

    pub fn last_reading(&self) -> Option<Reading> {
        self.last_reading
    }

    /// Completed cycles, wraps on overflow.
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    pub fn get_calibration(&self) -> Calibration {
        self.calibration
    }

    pub fn release(self) -> A {
        self.adc
    }

    /// Run one full cycle, from waiting on the converter to the end of the
    /// delay. On error the state is left where the cycle stopped.
    pub fn step<W: Write>(&mut self, out: &mut W) -> Result<Reading, SamplerError> {
        self.state = SamplerState::WaitForConversion;
        let adc = &self.adc;
        if !self
            .options
            .conversion_budget
            .spin_until(|| adc.is_conversion_complete())
        {
            return Err(SamplerError::ConversionTimeout);
        }

        self.state = SamplerState::ReadAndCompensate;
        let raw = self.adc.read_data();
        let compensated = self.calibration.compensate(raw);

        self.state = SamplerState::ConvertToCelsius;
        let celsius = self.calibration.to_celsius(compensated);
        let reading = Reading {
            raw,
            compensated,
            celsius,
        };
        self.last_reading = Some(reading);

        self.state = SamplerState::Report;
        write_report(out, &reading)?;

        self.state = SamplerState::Delay;
        self.counter
            .delay_ms(self.options.period_ms, self.options.delay_budget)?;

        self.cycles = self.cycles.wrapping_add(1);
        self.state = SamplerState::WaitForConversion;
        Ok(reading)
    }

    /// Wait one period without sampling, used after a failed cycle so that
    /// retries keep the reporting rate.
    pub fn skip_period(&mut self) -> Result<(), SamplerError> {
        self.state = SamplerState::Delay;
        self.counter
            .delay_ms(self.options.period_ms, self.options.delay_budget)?;
        self.state = SamplerState::WaitForConversion;
        Ok(())
    }

    /// Repeat [`Sampler::step`] `cycles` times, or forever with `None`.
    pub fn run<W: Write>(&mut self, out: &mut W, cycles: Option<u32>) -> Result<(), SamplerError> {
        match cycles {
            Some(n) => {
                for _ in 0..n {
                    self.step(out)?;
                }
                Ok(())
            }
            None => loop {
                self.step(out)?;
            },
        }
    }
}
