use core::fmt::{Result, Write};

use crate::sampler::Reading;

/// One report line: compensated sample, two tabs, degrees with a `C` suffix.
pub fn write_report<W: Write>(out: &mut W, reading: &Reading) -> Result {
    core::writeln!(out, "{}", reading)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_line() {
        let reading = Reading {
            raw: 7172,
            compensated: 7890,
            celsius: 32,
        };
        let mut line = String::new();
        write_report(&mut line, &reading).unwrap();
        assert_eq!("7890\t\t32C\n", line);
    }

    #[test]
    fn test_report_line_negative() {
        let reading = Reading {
            raw: 0,
            compensated: 0,
            celsius: -259,
        };
        let mut line = String::new();
        write_report(&mut line, &reading).unwrap();
        assert_eq!("0\t\t-259C\n", line);
    }

    #[test]
    fn test_report_fixed_buffer_too_small() {
        let reading = Reading {
            raw: 4095,
            compensated: 4504,
            celsius: 1676,
        };
        let mut line: heapless::String<8> = heapless::String::new();
        assert!(write_report(&mut line, &reading).is_err());
    }
}
