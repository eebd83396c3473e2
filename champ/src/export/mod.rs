//! Report output
//!
//! - `html_report`: the report page combining frames, costs and watch figures
//! - `json_summary`: the same data as JSON for other tools

pub mod html_report;
pub mod json_summary;

pub use html_report::{FrameSection, ReportAssembler, WatchFigure, NO_VALUES};
pub use json_summary::RunSummary;
