//! Cost ranking for profiling data.
//!
//! Turns the per-call-target [`CostAggregate`] into the table shown in the
//! report: most expensive call target first, with its share of all charged
//! cycles and its average cost per call.
//!
//! ```text
//! Addr     CC      CC %    Calls  CC/Call  Label
//! 0x6012   91820   61.43%  240    382      DRAW
//! 0x6100   40100   26.83%  1      40100    CLEAR
//! ```

// Percentage calculations intentionally convert u64 to f64
#![allow(clippy::cast_precision_loss)]

use serde::Serialize;
use std::cmp::Reverse;

use crate::domain::Address;
use crate::symbolization::SymbolTable;
use crate::trace_data::CostAggregate;

/// One row of the cost table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostEntry {
    /// Call target, formatted `0x%04x`
    #[serde(serialize_with = "serialize_address")]
    pub address: Address,

    /// Exclusive cycles
    pub cycles: u64,

    /// Share of all exclusive cycles (0.0 - 100.0)
    pub percentage: f64,

    pub calls: u64,

    /// Integer average; 0 when never called
    pub cycles_per_call: u64,

    /// Label bound to the address, if any
    pub label: Option<String>,
}

fn serialize_address<S: serde::Serializer>(address: &Address, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(address)
}

/// Rank call targets by exclusive cycles, descending; ties go to the lower address
#[must_use]
pub fn rank_costs(costs: &CostAggregate, symbols: &SymbolTable) -> Vec<CostEntry> {
    let total = costs.total_cycles();

    let mut entries: Vec<CostEntry> = costs
        .charged()
        .map(|(address, cycles)| {
            let calls = costs.calls_for(address);
            let percentage =
                if total > 0 { (cycles as f64 / total as f64) * 100.0 } else { 0.0 };
            CostEntry {
                address,
                cycles,
                percentage,
                calls,
                cycles_per_call: cycles.checked_div(calls).unwrap_or(0),
                label: symbols.symbol_for(address).map(str::to_string),
            }
        })
        .collect();

    entries.sort_unstable_by_key(|e| (Reverse(e.cycles), e.address));
    entries
}
