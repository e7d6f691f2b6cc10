#![cfg_attr(not(test), no_std)]

use math::Resolution;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum ExternalTrigger {
    None,
    RisingEdge,
    FallingEdge,
    BothEdges,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Alignment {
    Right,
    Left,
}

/// Sampling window of a channel, in ADC clock cycles.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum SampleTime {
    Cycles4,
    Cycles9,
    Cycles16,
    Cycles24,
    Cycles48,
    Cycles96,
    Cycles192,
    Cycles384,
}

impl SampleTime {
    pub const ALL: [SampleTime; 8] = [
        SampleTime::Cycles4,
        SampleTime::Cycles9,
        SampleTime::Cycles16,
        SampleTime::Cycles24,
        SampleTime::Cycles48,
        SampleTime::Cycles96,
        SampleTime::Cycles192,
        SampleTime::Cycles384,
    ];

    pub fn cycles(self) -> u32 {
        match self {
            SampleTime::Cycles4 => 4,
            SampleTime::Cycles9 => 9,
            SampleTime::Cycles16 => 16,
            SampleTime::Cycles24 => 24,
            SampleTime::Cycles48 => 48,
            SampleTime::Cycles96 => 96,
            SampleTime::Cycles192 => 192,
            SampleTime::Cycles384 => 384,
        }
    }

    /// SMPx field encoding, the position of the window in [`SampleTime::ALL`].
    pub fn bits(self) -> u8 {
        match self {
            SampleTime::Cycles4 => 0b000,
            SampleTime::Cycles9 => 0b001,
            SampleTime::Cycles16 => 0b010,
            SampleTime::Cycles24 => 0b011,
            SampleTime::Cycles48 => 0b100,
            SampleTime::Cycles96 => 0b101,
            SampleTime::Cycles192 => 0b110,
            SampleTime::Cycles384 => 0b111,
        }
    }

    pub fn longest() -> Self {
        SampleTime::Cycles384
    }

    pub fn duration_ns(self, adc_clock_hz: u32) -> u64 {
        if adc_clock_hz == 0 {
            return 0;
        }
        u64::from(self.cycles()) * 1_000_000_000 / u64::from(adc_clock_hz)
    }

    pub fn covers(self, min_ns: u32, adc_clock_hz: u32) -> bool {
        self.duration_ns(adc_clock_hz) >= u64::from(min_ns)
    }

    /// Shortest window that still lasts at least `min_ns`.
    pub fn shortest_covering(min_ns: u32, adc_clock_hz: u32) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.covers(min_ns, adc_clock_hz))
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct AdcConfig {
    pub resolution: Resolution,
    pub scan: bool,
    pub continuous: bool,
    pub external_trigger: ExternalTrigger,
    pub alignment: Alignment,
    pub conversions: u8,
}

impl Default for AdcConfig {
    fn default() -> Self {
        Self {
            resolution: Resolution::BITS12,
            scan: false,
            continuous: true,
            external_trigger: ExternalTrigger::None,
            alignment: Alignment::Right,
            conversions: 1,
        }
    }
}

/// How long a busy wait on a flag may spin before giving up.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum PollBudget {
    Unbounded,
    Polls(u32),
}

impl PollBudget {
    /// Spin until `done` returns true. Returns false if the budget ran out.
    pub fn spin_until<F: FnMut() -> bool>(self, mut done: F) -> bool {
        match self {
            PollBudget::Unbounded => {
                while !done() {
                    core::hint::spin_loop();
                }
                true
            }
            PollBudget::Polls(max) => {
                for _ in 0..max {
                    if done() {
                        return true;
                    }
                    core::hint::spin_loop();
                }
                done()
            }
        }
    }
}

/// ADC bound to the internal temperature sensor.
///
/// Reading the data register clears the end of conversion flag.
pub trait TemperatureAdc {
    fn enable_clock(&mut self);
    fn configure(&mut self, config: &AdcConfig);
    fn enable(&mut self);
    fn enable_temperature_sensor(&mut self);
    fn configure_temperature_channel(&mut self, rank: u8, sample_time: SampleTime);
    fn is_ready(&self) -> bool;
    fn start_conversion(&mut self);
    fn is_conversion_complete(&self) -> bool;
    fn read_data(&mut self) -> u16;
}

/// Periodic interrupt source driving the millisecond counter.
pub trait TickSource {
    fn start_periodic(&mut self, frequency_hz: u32);
}

#[cfg(feature = "defmt-log")]
impl defmt::Format for SampleTime {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{} cycles", self.cycles())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adc_config_default() {
        let config = AdcConfig::default();
        assert_eq!(Resolution::BITS12, config.resolution);
        assert!(!config.scan);
        assert!(config.continuous);
        assert_eq!(ExternalTrigger::None, config.external_trigger);
        assert_eq!(Alignment::Right, config.alignment);
        assert_eq!(1, config.conversions);
    }

    #[test]
    fn test_sample_time_duration() {
        // HSI at 16MHz, 62.5ns per cycle
        assert_eq!(24_000, SampleTime::Cycles384.duration_ns(16_000_000));
        assert_eq!(250, SampleTime::Cycles4.duration_ns(16_000_000));
        assert_eq!(0, SampleTime::Cycles4.duration_ns(0));
    }

    #[test]
    fn test_sample_time_longest() {
        let longest = SampleTime::ALL.into_iter().max().unwrap();
        assert_eq!(longest, SampleTime::longest());
    }

    #[test]
    fn test_sample_time_shortest_covering() {
        // 4us at 16MHz needs 64 cycles
        assert_eq!(
            Some(SampleTime::Cycles96),
            SampleTime::shortest_covering(4_000, 16_000_000)
        );
        assert_eq!(
            Some(SampleTime::Cycles4),
            SampleTime::shortest_covering(0, 16_000_000)
        );
        assert_eq!(None, SampleTime::shortest_covering(100_000, 16_000_000));
    }

    #[test]
    fn test_sample_time_bits() {
        for (i, sample_time) in SampleTime::ALL.into_iter().enumerate() {
            assert_eq!(i as u8, sample_time.bits());
        }
        assert_eq!(0b111, SampleTime::longest().bits());
    }

    #[test]
    fn test_sample_time_covers() {
        assert!(SampleTime::Cycles384.covers(4_000, 32_000_000));
        assert!(!SampleTime::Cycles48.covers(4_000, 16_000_000));
    }

    #[test]
    fn test_poll_budget_bounded_gives_up() {
        let mut polls = 0;
        let done = PollBudget::Polls(10).spin_until(|| {
            polls += 1;
            false
        });
        assert!(!done);
        assert_eq!(11, polls);
    }

    #[test]
    fn test_poll_budget_bounded_succeeds() {
        let mut polls = 0;
        let done = PollBudget::Polls(10).spin_until(|| {
            polls += 1;
            polls == 3
        });
        assert!(done);
        assert_eq!(3, polls);
    }

    #[test]
    fn test_poll_budget_unbounded() {
        let mut polls = 0;
        let done = PollBudget::Unbounded.spin_until(|| {
            polls += 1;
            polls == 1000
        });
        assert!(done);
        assert_eq!(1000, polls);
    }
}
