//! Machine-readable run summary (`--export`)

use serde::Serialize;
use std::io::Write;

use crate::analysis::CostEntry;
use crate::directive::WatchSpec;
use crate::domain::WatchIndex;
use crate::trace_data::TraceSummary;

#[derive(Debug, Serialize)]
pub struct FrameSummary {
    pub observed: usize,
    pub recorded: usize,
    pub cycle_deltas: Vec<u64>,
    pub average_cycles_per_frame: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct WatchSummary {
    pub index: usize,
    pub caption: String,
    pub components: Vec<String>,
    pub samples: usize,
}

#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    pub total_cycles: u64,
    pub emulator_errors: usize,
    pub costs: &'a [CostEntry],
    pub frames: FrameSummary,
    pub watches: Vec<WatchSummary>,
}

impl<'a> RunSummary<'a> {
    #[must_use]
    pub fn new(trace: &TraceSummary, costs: &'a [CostEntry], watches: &[WatchSpec]) -> Self {
        Self {
            total_cycles: trace.cycles,
            emulator_errors: trace.emulator_errors,
            costs,
            frames: FrameSummary {
                observed: trace.frames.len(),
                recorded: trace.frames_recorded,
                cycle_deltas: trace.frames.cycle_deltas(),
                average_cycles_per_frame: trace.frames.average_cycles_per_frame(),
            },
            watches: watches
                .iter()
                .enumerate()
                .map(|(index, watch)| WatchSummary {
                    index,
                    caption: watch.caption(),
                    components: watch.components.iter().map(|c| c.name().to_string()).collect(),
                    samples: trace.samples.samples(WatchIndex(index)).len(),
                })
                .collect(),
        }
    }

    /// Serialize as pretty-printed JSON
    ///
    /// # Errors
    /// Serialization or write errors.
    pub fn export<W: Write>(&self, writer: W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(writer, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::Component;
    use crate::domain::{Address, Phase, Register, ValueType};

    #[test]
    fn test_export_creates_valid_json() {
        let mut trace = TraceSummary::default();
        for cycles in [1000, 1050, 1300, 1900, 2600] {
            trace.frames.push(cycles);
        }
        trace.samples = crate::trace_data::SampleStore::new(1);
        trace.samples.record(WatchIndex(0), vec![4]);
        let watches = vec![WatchSpec {
            trigger: Address(0x6000),
            phase: Phase::Pre,
            source_file: "main.s".to_string(),
            source_line: 3,
            components: vec![Component::Register {
                register: Register::Y,
                value_type: ValueType::U8,
            }],
        }];
        let costs = vec![CostEntry {
            address: Address(0x6000),
            cycles: 10,
            percentage: 100.0,
            calls: 1,
            cycles_per_call: 10,
            label: Some("MAIN".to_string()),
        }];

        let mut buffer = Vec::new();
        RunSummary::new(&trace, &costs, &watches).export(&mut buffer).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

        assert_eq!(parsed["costs"][0]["address"], "0x6000");
        assert_eq!(parsed["costs"][0]["label"], "MAIN");
        assert_eq!(parsed["frames"]["cycle_deltas"], serde_json::json!([600, 700]));
        assert_eq!(parsed["frames"]["average_cycles_per_frame"], 650);
        assert_eq!(parsed["watches"][0]["components"], serde_json::json!(["Y"]));
        assert_eq!(parsed["watches"][0]["samples"], 1);
    }
}
