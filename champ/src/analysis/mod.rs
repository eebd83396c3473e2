//! Analysis of finished traces
//!
//! Pure functions over the frozen aggregates, separated from report output.

pub mod cost_ranking;

pub use cost_ranking::{rank_costs, CostEntry};
