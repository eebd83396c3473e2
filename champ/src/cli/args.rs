//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "champ",
    about = "Cycle and value profiler for instrumented 65C02 assembly programs",
    after_help = "\
EXAMPLES:
    champ plot3d.yaml                          Profile and write report.html
    champ plot3d.yaml --max-frames 100         Record at most 100 animation frames
    champ plot3d.yaml --no-animation --export run.json"
)]
pub struct Args {
    /// Run configuration (YAML)
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Record at most N frames into the animation (tracing continues)
    #[arg(long, value_name = "N")]
    pub max_frames: Option<usize>,

    /// Do not record the screen animation
    #[arg(long)]
    pub no_animation: bool,

    /// Report file
    #[arg(long, value_name = "FILE", default_value = "report.html")]
    pub report: PathBuf,

    /// Directory for report images (recreated on each run)
    #[arg(long, value_name = "DIR", default_value = "report-files")]
    pub files_dir: PathBuf,

    /// Also write a JSON summary
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["champ", "run.yaml"]).unwrap();
        assert_eq!(args.config, PathBuf::from("run.yaml"));
        assert_eq!(args.report, PathBuf::from("report.html"));
        assert_eq!(args.files_dir, PathBuf::from("report-files"));
        assert!(args.max_frames.is_none());
        assert!(!args.no_animation);
        assert!(!args.quiet);
    }

    #[test]
    fn test_all_options() {
        let args = Args::try_parse_from([
            "champ",
            "run.yaml",
            "--max-frames",
            "50",
            "--no-animation",
            "--export",
            "out.json",
            "-q",
        ])
        .unwrap();
        assert_eq!(args.max_frames, Some(50));
        assert!(args.no_animation);
        assert_eq!(args.export, Some(PathBuf::from("out.json")));
        assert!(args.quiet);
    }

    #[test]
    fn test_config_is_required() {
        assert!(Args::try_parse_from(["champ"]).is_err());
        assert!(Args::try_parse_from(["champ", "a.yaml", "--max-frames", "many"]).is_err());
    }
}
