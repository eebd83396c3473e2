//! Pre-flight checks for champ
//!
//! Validates inputs and external tools before anything is assembled or
//! started, so a run never fails halfway through for a missing file.

use log::warn;
use std::path::{Path, PathBuf};

use crate::config::RunConfig;
use crate::domain::ChampError;

/// Run all pre-flight checks for a loaded configuration
///
/// # Errors
/// `MissingInputFile` for a missing load file or emulator.
pub fn run_preflight_checks(config: &RunConfig, quiet: bool) -> Result<(), ChampError> {
    check_load_files(config)?;
    check_tool(&config.emulator).ok_or_else(|| missing_tool(&config.emulator))?;
    if config.load.iter().any(|entry| entry.path.extension().is_some_and(|ext| ext == "s"))
        && check_tool(&config.assembler).is_none()
    {
        return Err(missing_tool(&config.assembler));
    }
    if check_tool(&config.encoder).is_none() && !quiet {
        warn!("image encoder `{}` not found, report images will be missing", config.encoder);
    }
    Ok(())
}

/// Check that every `load` file exists
///
/// # Errors
/// `MissingInputFile` naming the first missing file.
pub fn check_load_files(config: &RunConfig) -> Result<(), ChampError> {
    match config.load.iter().find(|entry| !entry.path.is_file()) {
        Some(entry) => Err(ChampError::MissingInputFile(entry.path.clone())),
        None => Ok(()),
    }
}

/// Locate a command: a path if it names one, otherwise a `PATH` lookup
#[must_use]
pub fn check_tool(command: &str) -> Option<PathBuf> {
    let path = Path::new(command);
    if path.components().count() > 1 {
        return path.is_file().then(|| path.to_path_buf());
    }
    std::env::var_os("PATH").and_then(|dirs| {
        std::env::split_paths(&dirs).map(|dir| dir.join(command)).find(|p| p.is_file())
    })
}

fn missing_tool(command: &str) -> ChampError {
    ChampError::MissingInputFile(PathBuf::from(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(load: &str, extra: &str) -> RunConfig {
        RunConfig::from_yaml(&format!("load:\n  0x6000: {load}\nentry: 0x6000\n{extra}")).unwrap()
    }

    #[test]
    fn test_missing_load_file() {
        let result = check_load_files(&config("/nonexistent/main.s", ""));
        let err = result.unwrap_err();
        assert!(matches!(err, ChampError::MissingInputFile(_)));
        assert!(err.to_string().contains("Input file not found"));
    }

    #[test]
    fn test_tool_lookup() {
        assert!(check_tool("/nonexistent/p65c02").is_none());
        assert!(check_tool("definitely-not-a-real-command-name").is_none());

        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("p65c02");
        std::fs::write(&tool, "").unwrap();
        assert_eq!(check_tool(tool.to_str().unwrap()), Some(tool));
    }

    #[test]
    fn test_missing_emulator() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("prog.bin");
        std::fs::write(&image, [0x60]).unwrap();

        let config = config(image.to_str().unwrap(), "emulator: /nonexistent/p65c02\n");
        let result = run_preflight_checks(&config, true);
        assert!(matches!(result, Err(ChampError::MissingInputFile(p)) if p.ends_with("p65c02")));
    }
}
