//! Software stand-ins for the converter and the tick source.

use core::cell::Cell;
use core::sync::atomic::{AtomicU32, Ordering};

use common::{AdcConfig, SampleTime, TemperatureAdc, TickSource};
use heapless::Vec;

const CAPACITY: usize = 16;

// shared by every mock so calls on different devices can be ordered
static SEQUENCE: AtomicU32 = AtomicU32::new(0);

fn next_stamp() -> u32 {
    SEQUENCE.fetch_add(1, Ordering::Relaxed)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AdcCall {
    EnableClock,
    Configure(AdcConfig),
    Enable,
    EnableTemperatureSensor,
    ConfigureChannel { rank: u8, sample_time: SampleTime },
    StartConversion,
}

/// Converter returning a fixed sequence of samples, in a loop.
pub struct MockAdc {
    calls: Vec<AdcCall, CAPACITY>,
    stamps: Vec<u32, CAPACITY>,
    samples: Vec<u16, CAPACITY>,
    reads: usize,
    // polls answered with false before the flag is raised, None never raises it
    ready_after: Option<u32>,
    eoc_after: Option<u32>,
    ready_polls: Cell<u32>,
    eoc_polls: Cell<u32>,
}

impl MockAdc {
    pub fn new(samples: &[u16]) -> Self {
        Self {
            calls: Vec::new(),
            stamps: Vec::new(),
            samples: Vec::from_slice(samples).expect("MockAdc holds at most 16 samples"),
            reads: 0,
            ready_after: Some(0),
            eoc_after: Some(0),
            ready_polls: Cell::new(0),
            eoc_polls: Cell::new(0),
        }
    }

    pub fn ready_after(mut self, polls: u32) -> Self {
        self.ready_after = Some(polls);
        self
    }

    pub fn never_ready(mut self) -> Self {
        self.ready_after = None;
        self
    }

    pub fn eoc_after(mut self, polls: u32) -> Self {
        self.eoc_after = Some(polls);
        self
    }

    pub fn never_converts(mut self) -> Self {
        self.eoc_after = None;
        self
    }

    pub fn calls(&self) -> &[AdcCall] {
        &self.calls
    }

    /// Sequence stamp of the first recorded call.
    pub fn first_call_at(&self) -> Option<u32> {
        self.stamps.first().copied()
    }

    pub fn reads(&self) -> usize {
        self.reads
    }

    pub fn ready_polls(&self) -> u32 {
        self.ready_polls.get()
    }

    fn record(&mut self, call: AdcCall) {
        self.calls
            .push(call)
            .expect("MockAdc records at most 16 calls");
        self.stamps
            .push(next_stamp())
            .expect("MockAdc records at most 16 calls");
    }
}

impl TemperatureAdc for MockAdc {
    fn enable_clock(&mut self) {
        self.record(AdcCall::EnableClock);
    }

    fn configure(&mut self, config: &AdcConfig) {
        self.record(AdcCall::Configure(*config));
    }

    fn enable(&mut self) {
        self.record(AdcCall::Enable);
    }

    fn enable_temperature_sensor(&mut self) {
        self.record(AdcCall::EnableTemperatureSensor);
    }

    fn configure_temperature_channel(&mut self, rank: u8, sample_time: SampleTime) {
        self.record(AdcCall::ConfigureChannel { rank, sample_time });
    }

    fn is_ready(&self) -> bool {
        let polls = self.ready_polls.get();
        self.ready_polls.set(polls + 1);
        self.ready_after.is_some_and(|after| polls >= after)
    }

    fn start_conversion(&mut self) {
        self.record(AdcCall::StartConversion);
    }

    fn is_conversion_complete(&self) -> bool {
        let polls = self.eoc_polls.get();
        self.eoc_polls.set(polls + 1);
        self.eoc_after.is_some_and(|after| polls >= after)
    }

    fn read_data(&mut self) -> u16 {
        self.eoc_polls.set(0);
        let sample = match self.samples.len() {
            0 => 0,
            n => self.samples[self.reads % n],
        };
        self.reads += 1;
        sample
    }
}

#[derive(Default)]
pub struct MockTicks {
    pub frequency_hz: Option<u32>,
    /// Sequence stamp of the `start_periodic` call, comparable with
    /// [`MockAdc::first_call_at`].
    pub started_at: Option<u32>,
}

impl TickSource for MockTicks {
    fn start_periodic(&mut self, frequency_hz: u32) {
        self.frequency_hz = Some(frequency_hz);
        self.started_at = Some(next_stamp());
    }
}
