#![cfg_attr(not(test), no_std)]

use core::fmt::Display;

use math::calibration::CalibrationError;

pub mod report;
pub mod sampler;
pub mod sensor;
pub mod ticker;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

use ticker::Timeout;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SamplerError {
    Calibration(CalibrationError),
    SampleTimeTooShort { window_ns: u64, required_ns: u32 },
    NotReady,
    ConversionTimeout,
    Delay(Timeout),
    Report,
}

impl From<CalibrationError> for SamplerError {
    fn from(value: CalibrationError) -> Self {
        SamplerError::Calibration(value)
    }
}

impl From<Timeout> for SamplerError {
    fn from(value: Timeout) -> Self {
        SamplerError::Delay(value)
    }
}

impl From<core::fmt::Error> for SamplerError {
    fn from(_: core::fmt::Error) -> Self {
        SamplerError::Report
    }
}

impl Display for SamplerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SamplerError::Calibration(e) => core::write!(f, "Invalid calibration: {}", e),
            SamplerError::SampleTimeTooShort {
                window_ns,
                required_ns,
            } => core::write!(
                f,
                "Sample window of {}ns is shorter than the {}ns the sensor needs",
                window_ns,
                required_ns
            ),
            SamplerError::NotReady => core::write!(f, "ADC never became ready"),
            SamplerError::ConversionTimeout => core::write!(f, "Conversion did not complete"),
            SamplerError::Delay(timeout) => {
                core::write!(f, "Delay expired with {}ms left", timeout.remaining)
            }
            SamplerError::Report => core::write!(f, "Cannot write report line"),
        }
    }
}

#[cfg(feature = "defmt-log")]
impl defmt::Format for SamplerError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            SamplerError::Calibration(e) => defmt::write!(fmt, "Calibration({})", e),
            SamplerError::SampleTimeTooShort {
                window_ns,
                required_ns,
            } => defmt::write!(
                fmt,
                "SampleTimeTooShort [window: {}ns] [required: {}ns]",
                window_ns,
                required_ns
            ),
            SamplerError::NotReady => defmt::write!(fmt, "NotReady"),
            SamplerError::ConversionTimeout => defmt::write!(fmt, "ConversionTimeout"),
            SamplerError::Delay(timeout) => {
                defmt::write!(fmt, "Delay [remaining: {}ms]", timeout.remaining)
            }
            SamplerError::Report => defmt::write!(fmt, "Report"),
        }
    }
}
