use core::fmt::Display;

use measurements::Temperature;

/// Temperature of the first factory anchor, `ts_cal1`.
pub const CALIBRATION_LOW_CELSIUS: i32 = 30;
/// Temperature of the second factory anchor, `ts_cal2`.
pub const CALIBRATION_HIGH_CELSIUS: i32 = 110;

// the slope is scaled by 100 before dividing so that two decimals survive
const SLOPE_SCALE: i32 = 100;

// 3.3V, expressed in tenths of volt to stay in integers
pub const DEFAULT_VDD_SCALE: u16 = 33;
// 3.0V, supply used in production while recording the anchors
pub const DEFAULT_VREF_SCALE: u16 = 30;
// raw value read at 30C (factory, 0x1FF800FA on STM32L1)
pub const DEFAULT_TS_CAL1: u16 = 674;
// raw value read at 110C (factory, 0x1FF800FE on STM32L1)
pub const DEFAULT_TS_CAL2: u16 = 857;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CalibrationError {
    IdenticalAnchors,
    InvertedAnchors,
    ZeroReferenceScale,
}

impl Display for CalibrationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CalibrationError::IdenticalAnchors => {
                core::write!(f, "calibration anchors are identical")
            }
            CalibrationError::InvertedAnchors => {
                core::write!(f, "calibration anchor at 110C is below the one at 30C")
            }
            CalibrationError::ZeroReferenceScale => {
                core::write!(f, "reference voltage scale is zero")
            }
        }
    }
}

#[cfg(feature = "defmt-log")]
impl defmt::Format for CalibrationError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            CalibrationError::IdenticalAnchors => defmt::write!(fmt, "IdenticalAnchors"),
            CalibrationError::InvertedAnchors => defmt::write!(fmt, "InvertedAnchors"),
            CalibrationError::ZeroReferenceScale => defmt::write!(fmt, "ZeroReferenceScale"),
        }
    }
}

/// Linear mapping from compensated samples to degrees, anchored on the two
/// factory readings of the internal sensor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Calibration {
    vdd_scale: u16,
    vref_scale: u16,
    ts_cal1: u16,
    ts_cal2: u16,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            vdd_scale: DEFAULT_VDD_SCALE,
            vref_scale: DEFAULT_VREF_SCALE,
            ts_cal1: DEFAULT_TS_CAL1,
            ts_cal2: DEFAULT_TS_CAL2,
        }
    }
}

impl Calibration {
    pub fn new(
        vdd_scale: u16,
        vref_scale: u16,
        ts_cal1: u16,
        ts_cal2: u16,
    ) -> Result<Self, CalibrationError> {
        if vref_scale == 0 {
            return Err(CalibrationError::ZeroReferenceScale);
        }
        if ts_cal1 == ts_cal2 {
            return Err(CalibrationError::IdenticalAnchors);
        }
        if ts_cal2 < ts_cal1 {
            return Err(CalibrationError::InvertedAnchors);
        }
        Ok(Self {
            vdd_scale,
            vref_scale,
            ts_cal1,
            ts_cal2,
        })
    }

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

    /// Scale a raw sample by `vdd / vref`, truncating.
    ///
    /// Saturates at `u16::MAX` for scales that would not fit.
    pub fn compensate(&self, raw: u16) -> u16 {
        compensate_sample(raw, self.vdd_scale, self.vref_scale)
    }

    /// Degrees for a compensated sample.
    ///
    /// The slope is truncated to an integer before it is applied, so the
    /// second anchor does not map back to exactly 110C (857 gives 108 with
    /// the default anchors). This matches the readings of the deployed
    /// firmware and is kept as is.
    pub fn to_celsius(&self, compensated: u16) -> i16 {
        compute_internal_sensor_temperature(compensated, self.ts_cal1, self.ts_cal2)
    }

    pub fn temperature(&self, compensated: u16) -> Temperature {
        Temperature::from_celsius(f64::from(self.to_celsius(compensated)))
    }
}

fn compensate_sample(raw: u16, vdd_scale: u16, vref_scale: u16) -> u16 {
    let value = u32::from(raw) * u32::from(vdd_scale) / u32::from(vref_scale);
    u16::try_from(value).unwrap_or(u16::MAX)
}

// callers go through Calibration::new, which rules out a zero divisor
// ((80 * 100 / (cal2 - cal1)) * (sample - cal1)) / 100 + 30
// i32 division truncates toward zero, samples below cal1 round up
fn compute_internal_sensor_temperature(compensated: u16, ts_cal1: u16, ts_cal2: u16) -> i16 {
    let span = (CALIBRATION_HIGH_CELSIUS - CALIBRATION_LOW_CELSIUS) * SLOPE_SCALE;
    let slope = span / (i32::from(ts_cal2) - i32::from(ts_cal1));
    let offset = i32::from(compensated) - i32::from(ts_cal1);
    let celsius = slope * offset / SLOPE_SCALE + CALIBRATION_LOW_CELSIUS;
    celsius.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::Resolution;

    #[test]
    fn test_calibration_default() {
        let cal = Calibration::default();
        assert_eq!(33, cal.get_vdd_scale());
        assert_eq!(30, cal.get_vref_scale());
        assert_eq!(674, cal.get_ts_cal1());
        assert_eq!(857, cal.get_ts_cal2());
        assert_eq!(Ok(cal), Calibration::new(33, 30, 674, 857));
    }

    #[test]
    fn test_calibration_identical_anchors() {
        let cal = Calibration::new(33, 30, 700, 700);
        assert_eq!(Err(CalibrationError::IdenticalAnchors), cal);
    }

    #[test]
    fn test_calibration_inverted_anchors() {
        let cal = Calibration::new(33, 30, 857, 674);
        assert_eq!(Err(CalibrationError::InvertedAnchors), cal);
    }

    #[test]
    fn test_calibration_zero_reference() {
        let cal = Calibration::new(33, 0, 674, 857);
        assert_eq!(Err(CalibrationError::ZeroReferenceScale), cal);
    }

    #[test]
    fn test_compensate_anchor() {
        let cal = Calibration::default();
        assert_eq!(741, cal.compensate(674));
    }

    #[test]
    fn test_compensate_bounds() {
        let cal = Calibration::default();
        assert_eq!(0, cal.compensate(0));
        assert_eq!(4504, cal.compensate(Resolution::BITS12.max_sample()));
    }

    #[test]
    fn test_compensate_truncates() {
        let cal = Calibration::default();
        // 10 * 33 / 30 = 11, 11 * 33 / 30 = 12.1
        assert_eq!(11, cal.compensate(10));
        assert_eq!(12, cal.compensate(11));
    }

    #[test]
    fn test_compensate_saturates() {
        let cal = Calibration::new(2, 1, 674, 857).unwrap();
        assert_eq!(u16::MAX, cal.compensate(u16::MAX));
    }

    #[test]
    fn test_compensate_monotonic() {
        let cal = Calibration::default();
        let mut prev = cal.compensate(0);
        for raw in 1..=Resolution::BITS12.max_sample() {
            let curr = cal.compensate(raw);
            assert!(curr >= prev, "raw {} went from {} to {}", raw, prev, curr);
            assert_eq!((u32::from(raw) * 33 / 30) as u16, curr);
            prev = curr;
        }
    }

    #[test]
    fn test_to_celsius_low_anchor() {
        let cal = Calibration::default();
        assert_eq!(30, cal.to_celsius(674));
    }

    #[test]
    fn test_to_celsius_high_anchor() {
        // 8000 / 183 = 43, 43 * 183 / 100 = 78
        let cal = Calibration::default();
        assert_eq!(108, cal.to_celsius(857));
    }

    #[test]
    fn test_to_celsius_compensated_anchor() {
        // raw 674 -> 741 -> 43 * 67 / 100 + 30
        let cal = Calibration::default();
        let compensated = cal.compensate(674);
        assert_eq!(58, cal.to_celsius(compensated));
    }

    #[test]
    fn test_to_celsius_full_scale() {
        let cal = Calibration::default();
        assert_eq!(1676, cal.to_celsius(4504));
    }

    #[test]
    fn test_to_celsius_below_anchor_truncates_toward_zero() {
        let cal = Calibration::default();
        // 43 * -674 = -28982 -> -289
        assert_eq!(-259, cal.to_celsius(0));
        // 43 * -74 = -3182 -> -31
        assert_eq!(-1, cal.to_celsius(600));
    }

    #[test]
    fn test_to_celsius_saturates() {
        let cal = Calibration::new(33, 30, 0, 1).unwrap();
        assert_eq!(i16::MAX, cal.to_celsius(u16::MAX));
        let cal = Calibration::new(33, 30, u16::MAX - 1, u16::MAX).unwrap();
        assert_eq!(i16::MIN, cal.to_celsius(0));
    }

    #[test]
    fn test_to_celsius_flat_slope() {
        // span wider than 8000 counts truncates the slope to zero
        let cal = Calibration::new(33, 30, 0, 9000).unwrap();
        assert_eq!(30, cal.to_celsius(5000));
    }

    #[test]
    fn test_no_division_by_zero_reachable() {
        for (vref, cal1, cal2) in [(0, 674, 857), (30, 674, 674), (30, 0, 0), (0, 0, 0)] {
            assert!(Calibration::new(33, vref, cal1, cal2).is_err());
        }
        // every accepted calibration converts the whole sample range
        for (vdd, vref, cal1, cal2) in [(0, 1, 0, 1), (u16::MAX, 1, 0, u16::MAX), (1, u16::MAX, 1, 2)] {
            let cal = Calibration::new(vdd, vref, cal1, cal2).unwrap();
            for raw in [0, 1, 4095, u16::MAX] {
                let _ = cal.to_celsius(cal.compensate(raw));
            }
        }
    }

    #[test]
    fn test_temperature_measurement() {
        let cal = Calibration::default();
        let t = cal.temperature(741);
        assert_abs_diff_eq!(t.as_celsius(), 58.0, epsilon = 0.000001);
        assert_abs_diff_eq!(t.as_kelvin(), 331.15, epsilon = 0.000001);
    }
}
