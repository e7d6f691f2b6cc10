use common::TickSource;
use cortex_m::peripheral::syst::SystClkSource;
use cortex_m::peripheral::SYST;
use cortex_m_rt::exception;
use thermal_sensor::ticker::{MillisecondCounter, TickHandle};

use crate::assert_param;

/// Countdown used by the sampling loop delay.
pub static COUNTER: MillisecondCounter = MillisecondCounter::new();
// the interrupt only gets to decrement
static TICK: TickHandle<'static> = COUNTER.handle();

// 24-bit reload register
const MAX_RELOAD: u32 = 0x00FF_FFFF;

pub struct SysTickSource {
    syst: SYST,
    hclk_hz: u32,
}

impl SysTickSource {
    pub fn new(syst: SYST, hclk_hz: u32) -> Self {
        Self { syst, hclk_hz }
    }
}

impl TickSource for SysTickSource {
    fn start_periodic(&mut self, frequency_hz: u32) {
        assert_param!(frequency_hz > 0 && frequency_hz <= self.hclk_hz);
        let reload = (self.hclk_hz / frequency_hz.max(1)).saturating_sub(1);
        assert_param!(reload <= MAX_RELOAD);

        self.syst.set_clock_source(SystClkSource::Core);
        self.syst.set_reload(reload.min(MAX_RELOAD));
        self.syst.clear_current();
        self.syst.enable_interrupt();
        self.syst.enable_counter();
    }
}

#[exception]
fn SysTick() {
    TICK.tick();
}
