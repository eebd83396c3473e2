//! Structured error types for champ
//!
//! Using thiserror for automatic Display implementation and error chaining.
//! Every variant of [`ChampError`] is raised before tracing starts; once the
//! emulator is running, problems are logged and the run carries on.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChampError {
    #[error("[{file}:{line}] {message}")]
    Parse { file: String, line: usize, message: String },

    #[error("Input file not found: {}", .0.display())]
    MissingInputFile(PathBuf),

    #[error("[{file}:{line}] Invalid directive `{directive}`: {reason}")]
    InvalidDirective { file: String, line: usize, directive: String, reason: String },

    #[error("{0}")]
    CliArgument(String),

    #[error("Assembler failed on {file}:\n{message}")]
    Assembler { file: String, message: String },

    #[error("Invalid run configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl ChampError {
    /// Whether this error should exit with the usage exit code
    #[must_use]
    pub fn is_usage(&self) -> bool {
        matches!(self, ChampError::CliArgument(_))
    }
}

#[derive(Error, Debug)]
pub enum EncoderError {
    #[error("Failed to start image encoder `{command}`: {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write to image encoder: {0}")]
    WriteFailed(#[source] std::io::Error),

    #[error("Image encoder did not finish within {0:?}")]
    Timeout(std::time::Duration),

    #[error("Image encoder exited with {0}")]
    ExitStatus(std::process::ExitStatus),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ChampError::Parse {
            file: "plot3d.s".to_string(),
            line: 42,
            message: "Champ directive not allowed here.".to_string(),
        };
        assert_eq!(err.to_string(), "[plot3d.s:42] Champ directive not allowed here.");
    }

    #[test]
    fn test_invalid_directive_display() {
        let err = ChampError::InvalidDirective {
            file: "main.s".to_string(),
            line: 7,
            directive: "@Au,Xu,Yu".to_string(),
            reason: "a watch takes one or two components".to_string(),
        };
        assert!(err.to_string().contains("@Au,Xu,Yu"));
        assert!(err.to_string().contains("main.s:7"));
    }

    #[test]
    fn test_usage_errors() {
        assert!(ChampError::CliArgument("missing config".to_string()).is_usage());
        assert!(!ChampError::MissingInputFile(PathBuf::from("x.s")).is_usage());
    }
}
