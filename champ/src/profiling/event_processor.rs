//! # Event Processing
//!
//! Applies emulator trace events to the run's aggregates, one event at a
//! time, in arrival order.
//!
//! ## Event Routing
//!
//! - `Call` / `Return` → [`CallStack`] → exclusive cost in [`CostAggregate`]
//! - `WatchSample` → [`SampleStore`]
//! - `ScreenFrame` → [`FrameTimeline`], plus an [`AnimationFrame`] for the
//!   encoder while recording and below the frame cap
//! - `CycleCount` → progress counter only
//! - `EmulatorError` → logged and counted
//!
//! Applying an event never fails: after the emulator has started, problems
//! are logged and the run carries on.

use log::{debug, warn};

use super::trace_event::TraceEvent;
use crate::encoder::AnimationFrame;
use crate::trace_data::{CallStack, CostAggregate, FrameTimeline, SampleStore, TraceSummary};

/// Encapsulates trace consumption state
pub struct TraceProcessor {
    // Configuration
    record_frames: bool,
    max_frames: Option<usize>,

    // Aggregates
    costs: CostAggregate,
    stack: CallStack,
    samples: SampleStore,
    frames: FrameTimeline,
    last_frame_cycles: u64,

    // Counters
    pub event_count: usize,
    pub ignored_lines: usize,
    pub emulator_errors: usize,
    pub frames_forwarded: usize,
    /// Last cumulative cycle count seen on any event
    pub cycles: u64,
}

impl TraceProcessor {
    /// Processor for `watch_count` registered watches
    #[must_use]
    pub fn new(watch_count: usize, record_frames: bool, max_frames: Option<usize>) -> Self {
        Self {
            record_frames,
            max_frames,
            costs: CostAggregate::new(),
            stack: CallStack::new(),
            samples: SampleStore::new(watch_count),
            frames: FrameTimeline::new(),
            last_frame_cycles: 0,
            event_count: 0,
            ignored_lines: 0,
            emulator_errors: 0,
            frames_forwarded: 0,
            cycles: 0,
        }
    }

    /// Decode and apply one trace line
    pub fn process_line(&mut self, line: &str) -> Option<AnimationFrame> {
        match TraceEvent::parse(line) {
            Some(event) => self.apply(event),
            None => {
                self.ignored_lines += 1;
                debug!("ignored trace line: {}", line.trim_end());
                None
            }
        }
    }

    /// Apply one event; returns a frame to forward to the animation encoder
    pub fn apply(&mut self, event: TraceEvent) -> Option<AnimationFrame> {
        self.event_count += 1;

        match event {
            TraceEvent::Call { address, cycles } => {
                self.cycles = cycles;
                self.costs.count_call(address);
                if let Some((caller, spent)) = self.stack.push(address, cycles) {
                    self.costs.charge(caller, spent);
                }
                None
            }
            TraceEvent::Return { cycles } => {
                self.cycles = cycles;
                if let Some((callee, spent)) = self.stack.pop(cycles) {
                    self.costs.charge(callee, spent);
                }
                None
            }
            TraceEvent::WatchSample { index, values } => {
                self.samples.record(index, values);
                None
            }
            TraceEvent::ScreenFrame { cycles, raster } => self.handle_screen_frame(cycles, raster),
            TraceEvent::CycleCount(cycles) => {
                self.cycles = cycles;
                None
            }
            TraceEvent::EmulatorError { pc, message } => {
                self.emulator_errors += 1;
                match pc {
                    Some(pc) => warn!("emulator error at {pc}: {message}"),
                    None => warn!("emulator error: {message}"),
                }
                None
            }
        }
    }

    fn handle_screen_frame(&mut self, cycles: u64, raster: Vec<u8>) -> Option<AnimationFrame> {
        self.frames.push(cycles);
        let elapsed = cycles.saturating_sub(self.last_frame_cycles);
        self.last_frame_cycles = cycles;

        if !self.record_frames {
            return None;
        }
        if self.max_frames.is_some_and(|cap| self.frames_forwarded >= cap) {
            return None;
        }
        self.frames_forwarded += 1;
        if self.max_frames == Some(self.frames_forwarded) {
            debug!("frame cap of {} reached, no further frames recorded", self.frames_forwarded);
        }
        Some(AnimationFrame::new(raster, elapsed))
    }

    /// Screen frames observed so far
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Current call depth
    #[must_use]
    pub fn call_depth(&self) -> usize {
        self.stack.depth()
    }

    /// Freeze the aggregates
    #[must_use]
    pub fn finish(self) -> TraceSummary {
        if self.stack.depth() > 0 {
            debug!("trace ended with {} calls in flight", self.stack.depth());
        }
        TraceSummary {
            costs: self.costs,
            samples: self.samples,
            frames: self.frames,
            cycles: self.cycles,
            emulator_errors: self.emulator_errors,
            frames_recorded: self.frames_forwarded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Address, WatchIndex};

    fn run(lines: &[&str]) -> TraceSummary {
        let mut processor = TraceProcessor::new(2, false, None);
        for line in lines {
            processor.process_line(line);
        }
        processor.finish()
    }

    #[test]
    fn test_nested_calls_attribute_exclusive_cost() {
        let summary = run(&["jsr 0x000a 100", "jsr 0x000b 150", "rts 180", "rts 200"]);
        let (a, b) = (Address(0xa), Address(0xb));

        assert_eq!(summary.costs.cycles_for(b), 30);
        assert_eq!(summary.costs.cycles_for(a), 70);
        assert_eq!(summary.costs.calls_for(a), 1);
        assert_eq!(summary.costs.calls_for(b), 1);
    }

    #[test]
    fn test_return_on_empty_stack_is_harmless() {
        let summary = run(&["rts 500"]);
        assert!(summary.costs.is_empty());
        assert_eq!(summary.cycles, 500);
    }

    #[test]
    fn test_samples_and_unknown_lines() {
        let mut processor = TraceProcessor::new(2, false, None);
        processor.process_line("watch 1 5 6");
        processor.process_line("log 6000 00");
        processor.process_line("watch 1 7 8");
        assert_eq!(processor.ignored_lines, 1);
        assert_eq!(processor.event_count, 2);

        let summary = processor.finish();
        assert_eq!(summary.samples.samples(WatchIndex(1)), &[vec![5, 6], vec![7, 8]]);
    }

    #[test]
    fn test_frames_without_recording() {
        let mut processor = TraceProcessor::new(0, false, None);
        assert!(processor.process_line("screen 1000 0 0").is_none());
        assert!(processor.process_line("screen 2000 0 0").is_none());
        assert_eq!(processor.frame_count(), 2);
    }

    #[test]
    fn test_frame_cap_stops_forwarding_only() {
        let mut processor = TraceProcessor::new(0, true, Some(2));
        let forwarded: Vec<bool> = ["screen 20000", "screen 50000", "screen 90000", "cycles 100000"]
            .iter()
            .map(|line| processor.process_line(line).is_some())
            .collect();
        assert_eq!(forwarded, vec![true, true, false, false]);
        assert_eq!(processor.frame_count(), 3);
        assert_eq!(processor.cycles, 100_000);

        let summary = processor.finish();
        assert_eq!(summary.frames_recorded, 2);
        assert_eq!(summary.frames.readings(), &[20_000, 50_000, 90_000]);
    }

    #[test]
    fn test_frame_delay_uses_previous_frame() {
        let mut processor = TraceProcessor::new(0, true, None);
        let first = processor.process_line("screen 20000").unwrap();
        let second = processor.process_line("screen 75000").unwrap();
        assert_eq!(first.delay_ticks, 2);
        assert_eq!(second.delay_ticks, 5);
    }

    #[test]
    fn test_emulator_errors_are_counted() {
        let summary = run(&["error 6000 Stack underrun", "error"]);
        assert_eq!(summary.emulator_errors, 2);
    }
}
