use core::sync::atomic::{AtomicU32, Ordering};

use common::PollBudget;

/// The wait gave up before the counter reached zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timeout {
    pub remaining: u32,
}

/// Countdown shared between the tick interrupt and the main loop.
///
/// The interrupt only decrements, the main loop only sets and reads.
pub struct MillisecondCounter {
    remaining: AtomicU32,
}

impl MillisecondCounter {
    pub const fn new() -> Self {
        Self {
            remaining: AtomicU32::new(0),
        }
    }

    /// Handle for the tick interrupt. It can only decrement.
    pub const fn handle(&self) -> TickHandle<'_> {
        TickHandle { counter: self }
    }

    pub fn start(&self, ms: u32) {
        self.remaining.store(ms, Ordering::Release);
    }

    // saturating, a tick at zero is dropped
    fn tick(&self) -> bool {
        self.remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |v| v.checked_sub(1))
            .is_ok()
    }

    pub fn remaining(&self) -> u32 {
        self.remaining.load(Ordering::Acquire)
    }

    pub fn is_elapsed(&self) -> bool {
        self.remaining() == 0
    }

    pub fn wait_elapsed(&self, budget: PollBudget) -> Result<(), Timeout> {
        if budget.spin_until(|| self.is_elapsed()) {
            Ok(())
        } else {
            Err(Timeout {
                remaining: self.remaining(),
            })
        }
    }

    pub fn delay_ms(&self, ms: u32, budget: PollBudget) -> Result<(), Timeout> {
        self.start(ms);
        self.wait_elapsed(budget)
    }
}

impl Default for MillisecondCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
pub struct TickHandle<'a> {
    counter: &'a MillisecondCounter,
}

impl<'a> TickHandle<'a> {
    /// Called once per millisecond. Returns false if the counter was
    /// already at zero.
    pub fn tick(&self) -> bool {
        self.counter.tick()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicBool;
    use std::thread;

    use super::*;

    #[test]
    fn test_counter_starts_elapsed() {
        let counter = MillisecondCounter::new();
        assert!(counter.is_elapsed());
        assert_eq!(0, counter.remaining());
    }

    #[test]
    fn test_counter_tick_decrements() {
        let counter = MillisecondCounter::new();
        let handle = counter.handle();
        counter.start(3);
        assert!(handle.tick());
        assert_eq!(2, counter.remaining());
        assert!(handle.tick());
        assert!(handle.tick());
        assert!(counter.is_elapsed());
    }

    #[test]
    fn test_counter_tick_saturates() {
        let counter = MillisecondCounter::new();
        let handle = counter.handle();
        assert!(!handle.tick());
        assert_eq!(0, counter.remaining());
        counter.start(1);
        assert!(handle.tick());
        assert!(!handle.tick());
        assert_eq!(0, counter.remaining());
    }

    #[test]
    fn test_counter_restart_overrides() {
        let counter = MillisecondCounter::new();
        counter.start(10);
        counter.handle().tick();
        counter.start(1000);
        assert_eq!(1000, counter.remaining());
    }

    #[test]
    fn test_wait_elapsed_already_zero() {
        let counter = MillisecondCounter::new();
        assert_eq!(Ok(()), counter.wait_elapsed(PollBudget::Polls(0)));
    }

    #[test]
    fn test_wait_elapsed_timeout() {
        let counter = MillisecondCounter::new();
        let result = counter.delay_ms(5, PollBudget::Polls(100));
        assert_eq!(Err(Timeout { remaining: 5 }), result);
    }

    #[test]
    fn test_delay_with_tick_thread() {
        static COUNTER: MillisecondCounter = MillisecondCounter::new();
        static TICK: TickHandle<'static> = COUNTER.handle();
        let stop = AtomicBool::new(false);
        let ticks = AtomicU32::new(0);

        thread::scope(|s| {
            s.spawn(|| {
                while !stop.load(Ordering::Acquire) {
                    if TICK.tick() {
                        ticks.fetch_add(1, Ordering::Relaxed);
                    }
                    thread::yield_now();
                }
            });
            let result = COUNTER.delay_ms(250, PollBudget::Unbounded);
            stop.store(true, Ordering::Release);
            assert_eq!(Ok(()), result);
        });

        assert_eq!(250, ticks.load(Ordering::Relaxed));
        assert!(COUNTER.is_elapsed());
    }
}
