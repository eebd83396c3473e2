//! Trace data models
//!
//! Aggregates built while the emulator trace is consumed. They start empty,
//! only grow while [`crate::profiling::TraceProcessor`] owns them, and are
//! handed over read-only as a [`TraceSummary`] once the trace ends.

use log::debug;
use std::collections::HashMap;

use crate::domain::{Address, WatchIndex};

/// Exclusive cycles and invocation counts per call target
#[derive(Debug, Clone, Default)]
pub struct CostAggregate {
    cycles: HashMap<Address, u64>,
    calls: HashMap<Address, u64>,
}

impl CostAggregate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `cycles` to the exclusive cost of `address`
    pub fn charge(&mut self, address: Address, cycles: u64) {
        *self.cycles.entry(address).or_default() += cycles;
    }

    pub fn count_call(&mut self, address: Address) {
        *self.calls.entry(address).or_default() += 1;
    }

    #[must_use]
    pub fn cycles_for(&self, address: Address) -> u64 {
        self.cycles.get(&address).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn calls_for(&self, address: Address) -> u64 {
        self.calls.get(&address).copied().unwrap_or(0)
    }

    /// Sum of all exclusive cycles
    #[must_use]
    pub fn total_cycles(&self) -> u64 {
        self.cycles.values().sum()
    }

    /// Addresses that have been charged at least once
    pub fn charged(&self) -> impl Iterator<Item = (Address, u64)> + '_ {
        self.cycles.iter().map(|(address, cycles)| (*address, *cycles))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty() && self.calls.is_empty()
    }
}

/// In-flight calls plus the cycle reading of the last call/return event
#[derive(Debug, Clone, Default)]
pub struct CallStack {
    frames: Vec<Address>,
    last_marker: u64,
}

impl CallStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter `address` at cumulative cycle count `now`.
    ///
    /// Returns the caller and the cycles it spent since the previous marker.
    pub fn push(&mut self, address: Address, now: u64) -> Option<(Address, u64)> {
        let charge = self.charge_top(now);
        self.frames.push(address);
        charge
    }

    /// Leave the innermost call at `now`.
    ///
    /// Returns the callee and its cycles since the previous marker. On an
    /// empty stack only the marker moves.
    pub fn pop(&mut self, now: u64) -> Option<(Address, u64)> {
        let charge = self.charge_top(now);
        self.frames.pop();
        charge
    }

    fn charge_top(&mut self, now: u64) -> Option<(Address, u64)> {
        let elapsed = now.saturating_sub(self.last_marker);
        self.last_marker = now;
        self.frames.last().map(|top| (*top, elapsed))
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn top(&self) -> Option<Address> {
        self.frames.last().copied()
    }
}

/// Recorded value tuples, one sequence per watch
#[derive(Debug, Clone, Default)]
pub struct SampleStore {
    sequences: Vec<Vec<Vec<i64>>>,
}

impl SampleStore {
    /// Empty sequences for `watch_count` watches
    #[must_use]
    pub fn new(watch_count: usize) -> Self {
        Self { sequences: vec![Vec::new(); watch_count] }
    }

    /// Append one tuple; returns `false` for an index no watch was registered under
    pub fn record(&mut self, index: WatchIndex, values: Vec<i64>) -> bool {
        match self.sequences.get_mut(index.0) {
            Some(sequence) => {
                sequence.push(values);
                true
            }
            None => {
                debug!("sample for unregistered {index} dropped");
                false
            }
        }
    }

    /// Samples of one watch in arrival order (empty for unknown indices)
    #[must_use]
    pub fn samples(&self, index: WatchIndex) -> &[Vec<i64>] {
        self.sequences.get(index.0).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn watch_count(&self) -> usize {
        self.sequences.len()
    }

    /// Total number of tuples across all watches
    #[must_use]
    pub fn total(&self) -> usize {
        self.sequences.iter().map(Vec::len).sum()
    }
}

/// Number of leading frames left out of the cycles-per-frame statistics
pub const WARMUP_FRAMES: usize = 2;

/// Cumulative cycle reading of every observed screen frame
#[derive(Debug, Clone, Default)]
pub struct FrameTimeline {
    readings: Vec<u64>,
}

impl FrameTimeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cycles: u64) {
        self.readings.push(cycles);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    #[must_use]
    pub fn readings(&self) -> &[u64] {
        &self.readings
    }

    /// Differences between consecutive readings, ignoring the first [`WARMUP_FRAMES`] readings
    ///
    /// `[1000, 1050, 1300, 1900, 2600]` yields `[600, 700]`.
    #[must_use]
    pub fn cycle_deltas(&self) -> Vec<u64> {
        self.readings
            .get(WARMUP_FRAMES..)
            .unwrap_or_default()
            .windows(2)
            .map(|pair| pair[1].saturating_sub(pair[0]))
            .collect()
    }

    /// Integer mean of [`Self::cycle_deltas`], `None` when there are none
    #[must_use]
    pub fn average_cycles_per_frame(&self) -> Option<u64> {
        let deltas = self.cycle_deltas();
        let count = u64::try_from(deltas.len()).ok().filter(|n| *n > 0)?;
        Some(deltas.iter().sum::<u64>() / count)
    }
}

/// Everything a finished trace leaves behind
#[derive(Debug, Clone, Default)]
pub struct TraceSummary {
    pub costs: CostAggregate,
    pub samples: SampleStore,
    pub frames: FrameTimeline,
    /// Last cumulative cycle count reported by the emulator
    pub cycles: u64,
    /// Emulator `error` lines seen
    pub emulator_errors: usize,
    /// Frames forwarded to the animation encoder
    pub frames_recorded: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_stack_charges_caller() {
        let mut stack = CallStack::new();
        assert_eq!(stack.push(Address(0xa), 100), None);
        assert_eq!(stack.push(Address(0xb), 150), Some((Address(0xa), 50)));
        assert_eq!(stack.pop(180), Some((Address(0xb), 30)));
        assert_eq!(stack.pop(200), Some((Address(0xa), 20)));
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_pop_on_empty_stack_moves_marker_only() {
        let mut stack = CallStack::new();
        assert_eq!(stack.pop(500), None);
        assert_eq!(stack.push(Address(0xa), 600), None);
        assert_eq!(stack.pop(650), Some((Address(0xa), 50)));
    }

    #[test]
    fn test_cost_aggregate() {
        let mut costs = CostAggregate::new();
        costs.charge(Address(1), 10);
        costs.charge(Address(1), 5);
        costs.count_call(Address(1));
        assert_eq!(costs.cycles_for(Address(1)), 15);
        assert_eq!(costs.calls_for(Address(1)), 1);
        assert_eq!(costs.cycles_for(Address(2)), 0);
        assert_eq!(costs.total_cycles(), 15);
    }

    #[test]
    fn test_frame_deltas_skip_warmup() {
        let mut frames = FrameTimeline::new();
        for cycles in [1000, 1050, 1300, 1900, 2600] {
            frames.push(cycles);
        }
        assert_eq!(frames.cycle_deltas(), vec![600, 700]);
        assert_eq!(frames.average_cycles_per_frame(), Some(650));
    }

    #[test]
    fn test_frame_deltas_short_timelines() {
        let mut frames = FrameTimeline::new();
        assert!(frames.cycle_deltas().is_empty());
        frames.push(10);
        frames.push(20);
        assert!(frames.cycle_deltas().is_empty());
        assert_eq!(frames.average_cycles_per_frame(), None);
        frames.push(35);
        assert!(frames.cycle_deltas().is_empty());
        frames.push(50);
        assert_eq!(frames.cycle_deltas(), vec![15]);
    }

    #[test]
    fn test_sample_store_keeps_arrival_order() {
        let mut samples = SampleStore::new(2);
        assert!(samples.record(WatchIndex(1), vec![3]));
        assert!(samples.record(WatchIndex(1), vec![3]));
        assert!(samples.record(WatchIndex(1), vec![1]));
        assert!(!samples.record(WatchIndex(5), vec![0]));
        assert_eq!(samples.samples(WatchIndex(1)), &[vec![3], vec![3], vec![1]]);
        assert!(samples.samples(WatchIndex(0)).is_empty());
        assert!(samples.samples(WatchIndex(9)).is_empty());
        assert_eq!(samples.total(), 3);
    }
}
