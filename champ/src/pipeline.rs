//! # Run orchestration
//!
//! ```text
//! config ─► preflight ─► assemble + parse ─► patch ─► disk image
//!                                                        │
//!            ┌───────────────────────────────────────────┘
//!            ▼
//!        emulator ──trace──► run_session ──► TraceSummary
//!                               │                 │
//!                           frames.gif     histograms + cost table
//!                                                 │
//!                                         report.html (+ JSON)
//! ```
//!
//! Everything before the emulator starts is fatal on error. After that,
//! encoder and emulator problems are logged and the report is still written.

use anyhow::{Context, Result};
use log::{info, warn};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::analysis::rank_costs;
use crate::config::RunConfig;
use crate::directive::WatchSpec;
use crate::domain::WatchIndex;
use crate::encoder::{encode_still_image, AnimationRecorder};
use crate::export::{FrameSection, ReportAssembler, RunSummary, WatchFigure};
use crate::preflight::run_preflight_checks;
use crate::profiling::{run_session, spawn_emulator, ExitReason, SessionOutcome, TraceProcessor};
use crate::program;
use crate::render::HistogramRenderer;
use crate::trace_data::TraceSummary;

const IMAGE_FILE: &str = "disk_image";
const ANIMATION_FILE: &str = "frames.gif";

/// Command-line choices that shape one run
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub max_frames: Option<usize>,
    pub record_animation: bool,
    pub report: PathBuf,
    pub files_dir: PathBuf,
    pub export: Option<PathBuf>,
    pub quiet: bool,
}

/// Profile the program described by `config` and write the report
///
/// # Errors
/// Any failure before tracing starts, and failures writing the report.
pub async fn run(config: &RunConfig, options: &RunOptions) -> Result<SessionOutcome> {
    run_preflight_checks(config, options.quiet)?;

    let program::Program { mut image, listing } =
        program::build(&config.assembler, &config.load).await?;
    let start_pc = config.entry.resolve(&listing.symbols)?;
    image.patch_instant_rts(&config.instant_rts, &listing.symbols)?;

    let scratch = tempfile::tempdir().context("Failed to create scratch directory")?;
    let image_path = scratch.path().join(IMAGE_FILE);
    image.write_to(&image_path)?;

    prepare_files_dir(&options.files_dir)?;

    let mut emulator =
        spawn_emulator(&config.emulator, start_pc, &image_path, &listing.watches).await?;

    let recorder = if options.record_animation {
        match AnimationRecorder::start(&config.encoder, config.encoder_timeout()).await {
            Ok(recorder) => Some(recorder),
            Err(e) => {
                warn!("{e}; continuing without animation");
                None
            }
        }
    } else {
        None
    };

    let processor = TraceProcessor::new(
        listing.watches.len(),
        recorder.is_some(),
        options.max_frames,
    );
    let outcome = run_session(
        &mut emulator.trace,
        processor,
        recorder,
        tokio::signal::ctrl_c(),
        !options.quiet,
    )
    .await;

    match outcome.exit_reason {
        ExitReason::EndOfTrace => match emulator.child.wait().await {
            Ok(status) if !status.success() => warn!("emulator exited with {status}"),
            Ok(_) => {}
            Err(e) => warn!("could not wait for the emulator: {e}"),
        },
        ExitReason::Interrupted | ExitReason::ReadFailed => {
            info!("stopping emulator");
            if let Err(e) = emulator.child.kill().await {
                warn!("could not stop the emulator: {e}");
            }
        }
    }

    let animation = match &outcome.animation {
        Some(bytes) => {
            let path = options.files_dir.join(ANIMATION_FILE);
            std::fs::write(&path, bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            Some(report_link(&options.report, &path))
        }
        None => None,
    };

    let figures = render_watches(config, options, &listing.watches, &outcome.summary).await?;
    let costs = rank_costs(&outcome.summary.costs, &listing.symbols);

    let frames = FrameSection {
        animation,
        frames_observed: outcome.summary.frames.len(),
        average_cycles_per_frame: outcome.summary.frames.average_cycles_per_frame(),
    };
    let report = ReportAssembler::new(frames, costs, figures);
    let file = File::create(&options.report)
        .with_context(|| format!("Failed to create {}", options.report.display()))?;
    report.write(BufWriter::new(file)).context("Failed to write report")?;
    info!("report written to {}", options.report.display());

    if let Some(path) = &options.export {
        let summary = RunSummary::new(&outcome.summary, &report.costs, &listing.watches);
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        summary.export(BufWriter::new(file)).context("Failed to write JSON summary")?;
        info!("summary exported to {}", path.display());
    }

    Ok(outcome)
}

/// Remove and recreate the image directory
fn prepare_files_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        std::fs::remove_dir_all(dir)
            .with_context(|| format!("Failed to clear {}", dir.display()))?;
    }
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))
}

/// One histogram per watch, encoded in watch order
async fn render_watches(
    config: &RunConfig,
    options: &RunOptions,
    watches: &[WatchSpec],
    summary: &TraceSummary,
) -> Result<Vec<WatchFigure>> {
    let renderer = HistogramRenderer::new(config.highlight);
    let mut figures = Vec::with_capacity(watches.len());

    for (index, watch) in watches.iter().enumerate() {
        let samples = summary.samples.samples(WatchIndex(index));
        let image = match renderer.render(watch, samples) {
            Some(histogram) => {
                match encode_still_image(&config.encoder, &histogram, config.encoder_timeout())
                    .await
                {
                    Ok(bytes) => {
                        let path = options.files_dir.join(format!("watch_{index}.gif"));
                        std::fs::write(&path, bytes)
                            .with_context(|| format!("Failed to write {}", path.display()))?;
                        Some(report_link(&options.report, &path))
                    }
                    Err(e) => {
                        warn!("histogram for {} not encoded: {e}", WatchIndex(index));
                        None
                    }
                }
            }
            None => None,
        };
        figures.push(WatchFigure { caption: watch.caption(), image });
    }
    Ok(figures)
}

/// Path of `file` as seen from the report's directory
fn report_link(report: &Path, file: &Path) -> String {
    let base = report.parent().unwrap_or_else(|| Path::new(""));
    file.strip_prefix(base).unwrap_or(file).display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_link() {
        assert_eq!(
            report_link(Path::new("report.html"), Path::new("report-files/frames.gif")),
            "report-files/frames.gif"
        );
        assert_eq!(
            report_link(Path::new("out/report.html"), Path::new("out/files/watch_0.gif")),
            "files/watch_0.gif"
        );
        assert_eq!(
            report_link(Path::new("out/report.html"), Path::new("/abs/watch_0.gif")),
            "/abs/watch_0.gif"
        );
    }

    #[test]
    fn test_prepare_files_dir_clears_old_images() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("report-files");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("watch_9.gif"), b"old").unwrap();

        prepare_files_dir(&dir).unwrap();
        assert!(dir.is_dir());
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
    }
}
