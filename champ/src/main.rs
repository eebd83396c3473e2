//! # champ - Main Entry Point
//!
//! `champ <CONFIG>` assembles, traces and reports in one go. Ctrl-C stops
//! the trace early; the report is still written from what was collected.

use anyhow::Result;
use clap::Parser;

use champ::cli::Args;
use champ::config::RunConfig;
use champ::domain::ChampError;
use champ::pipeline::{self, RunOptions};
use champ::profiling::display_statistics;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_USAGE: i32 = 2;

fn main() {
    env_logger::init();
    std::process::exit(match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            let code = exit_code_for(&e);
            eprintln!("error: {e:#}");
            code
        }
    });
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ChampError>() {
        Some(e) if e.is_usage() => EXIT_USAGE,
        _ => EXIT_ERROR,
    }
}

fn parse_args() -> Result<Args> {
    Args::try_parse().map_err(|e| {
        if e.use_stderr() {
            let message = e.render().to_string();
            let message = message.trim_start_matches("error: ").trim_end().to_string();
            anyhow::Error::from(ChampError::CliArgument(message))
        } else {
            // --help and --version
            e.exit()
        }
    })
}

#[tokio::main]
async fn run() -> Result<()> {
    let args = parse_args()?;
    let config = RunConfig::from_file(&args.config)?;

    let options = RunOptions {
        max_frames: args.max_frames,
        record_animation: !args.no_animation,
        report: args.report,
        files_dir: args.files_dir,
        export: args.export,
        quiet: args.quiet,
    };

    let outcome = pipeline::run(&config, &options).await?;
    if !options.quiet {
        display_statistics(&outcome);
        eprintln!("Report written to {}", options.report.display());
    }
    Ok(())
}
