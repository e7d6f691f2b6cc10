#![cfg_attr(not(test), no_std)]

pub use measurements;

pub mod calibration;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Resolution {
    BITS12,
    BITS10,
    BITS8,
    BITS6,
}

impl Resolution {
    /// Largest value the converter can return at this width.
    pub fn max_sample(self) -> u16 {
        (u64::from(self) - 1) as u16
    }
}

impl From<Resolution> for u64 {
    fn from(value: Resolution) -> Self {
        match value {
            Resolution::BITS12 => 1 << 12,
            Resolution::BITS10 => 1 << 10,
            Resolution::BITS8 => 1 << 8,
            Resolution::BITS6 => 1 << 6,
        }
    }
}

#[cfg(feature = "defmt-log")]
impl defmt::Format for Resolution {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{} bits", match self {
            Resolution::BITS12 => 12u8,
            Resolution::BITS10 => 10,
            Resolution::BITS8 => 8,
            Resolution::BITS6 => 6,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_steps() {
        assert_eq!(4096, u64::from(Resolution::BITS12));
        assert_eq!(64, u64::from(Resolution::BITS6));
    }

    #[test]
    fn test_resolution_max_sample() {
        assert_eq!(4095, Resolution::BITS12.max_sample());
        assert_eq!(255, Resolution::BITS8.max_sample());
    }
}
