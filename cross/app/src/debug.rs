use defmt::error;

/// Check a driver parameter. Compiled out unless the `full-assert` feature
/// is enabled, in which case a failed check halts in [`assert_failed`].
#[macro_export]
macro_rules! assert_param {
    ($cond: expr) => {
        #[cfg(feature = "full-assert")]
        if !($cond) {
            $crate::debug::assert_failed(core::file!(), core::line!());
        }
    };
}

/// Report where a parameter check failed and stop there.
pub fn assert_failed(file: &str, line: u32) -> ! {
    error!("Wrong parameters value: file {} on line {}", file, line);
    halt()
}

/// Spin forever. A debugger can still attach and inspect the state.
pub fn halt() -> ! {
    loop {
        cortex_m::asm::nop();
    }
}
