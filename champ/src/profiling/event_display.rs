//! Terminal output while and after the trace is consumed

// Elapsed time is shown with one decimal
#![allow(clippy::cast_precision_loss)]

use std::io::Write;

use super::session::SessionOutcome;

/// Refresh the `Frames: …, Cycles: …` progress line on stderr
pub fn display_progress(frames: usize, cycles: u64) {
    eprint!("\rFrames: {frames}, Cycles: {cycles}");
    std::io::stderr().flush().ok();
}

/// One-line summary of a finished trace
#[must_use]
pub fn format_statistics(outcome: &SessionOutcome) -> String {
    let summary = &outcome.summary;
    format!(
        "{}: {:.1}s, {} events ({} ignored lines), {} frames ({} recorded), {} cycles, {} emulator errors",
        outcome.exit_reason,
        outcome.elapsed.as_secs_f64(),
        outcome.events,
        outcome.ignored_lines,
        summary.frames.len(),
        summary.frames_recorded,
        summary.cycles,
        summary.emulator_errors,
    )
}

/// Print the end-of-trace summary
pub fn display_statistics(outcome: &SessionOutcome) {
    eprintln!("\n{}", format_statistics(outcome));
}
