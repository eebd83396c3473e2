//! External assembler invocation
//!
//! Each source is copied into a fresh scratch directory and assembled
//! there, so the assembler's output files never collide:
//!
//! ```text
//! <tmp>/plot3d.s  ──assembler -V . plot3d.s──►  <tmp>/plot3d_Output.txt   (listing)
//!                                              <tmp>/plot3d              (binary)
//!                                              <tmp>/error_output.txt    (on failure)
//! ```

use log::{debug, info};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::process::Command;

use crate::domain::ChampError;

const LISTING_SUFFIX: &str = "_Output.txt";
const ERROR_FILE: &str = "error_output.txt";

/// Outputs of one successful assembler run
///
/// The files live in a scratch directory that is removed on drop.
#[derive(Debug)]
pub struct Assembly {
    _scratch: TempDir,
    pub listing: PathBuf,
    pub binary: PathBuf,
}

/// Assemble `source` with the `assembler` command
///
/// # Errors
/// `Assembler` if the assembler cannot be started, exits with a failure
/// status, reports errors, or produces no listing. I/O errors for the
/// scratch directory.
pub async fn assemble(assembler: &str, source: &Path) -> Result<Assembly, ChampError> {
    let file_name = source
        .file_name()
        .ok_or_else(|| ChampError::Config(format!("not a file: {}", source.display())))?;
    let display_name = file_name.to_string_lossy().into_owned();

    let scratch = tempfile::tempdir()?;
    std::fs::copy(source, scratch.path().join(file_name))?;

    info!("assembling {display_name}");
    let output = Command::new(assembler)
        .arg("-V")
        .arg(".")
        .arg(file_name)
        .current_dir(scratch.path())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| ChampError::Assembler {
            file: display_name.clone(),
            message: format!("could not run `{assembler}`: {e}"),
        })?;

    let transcript = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    if !output.status.success() || scratch.path().join(ERROR_FILE).exists() {
        return Err(ChampError::Assembler { file: display_name, message: transcript });
    }

    let listing = find_listing(scratch.path())?.ok_or_else(|| ChampError::Assembler {
        file: display_name.clone(),
        message: format!("no *{LISTING_SUFFIX} listing was produced\n{transcript}"),
    })?;
    let binary = binary_for(&listing);
    debug!("listing {}, binary {}", listing.display(), binary.display());

    Ok(Assembly { _scratch: scratch, listing, binary })
}

/// First `*_Output.txt` file in `dir`, by name
fn find_listing(dir: &Path) -> Result<Option<PathBuf>, ChampError> {
    let mut listings: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(LISTING_SUFFIX))
        })
        .collect();
    listings.sort();
    Ok(listings.into_iter().next())
}

/// The binary sits next to its listing, named without the listing suffix
fn binary_for(listing: &Path) -> PathBuf {
    let name = listing
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_suffix(LISTING_SUFFIX))
        .unwrap_or_default();
    listing.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_for_listing() {
        assert_eq!(
            binary_for(Path::new("/tmp/x/plot3d_Output.txt")),
            PathBuf::from("/tmp/x/plot3d")
        );
    }

    #[test]
    fn test_find_listing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_listing(dir.path()).unwrap().is_none());
        std::fs::write(dir.path().join("main.s"), "").unwrap();
        std::fs::write(dir.path().join("main_Output.txt"), "").unwrap();
        assert_eq!(find_listing(dir.path()).unwrap(), Some(dir.path().join("main_Output.txt")));
    }

    #[tokio::test]
    async fn test_missing_assembler() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("main.s");
        std::fs::write(&source, " RTS\n").unwrap();

        let result = assemble("/nonexistent/assembler", &source).await;
        assert!(matches!(result, Err(ChampError::Assembler { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_assembler() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("main.s");
        std::fs::write(&source, " RTS\n").unwrap();

        let result = assemble("false", &source).await;
        assert!(matches!(result, Err(ChampError::Assembler { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_assembler_outputs_are_found() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake-assembler");
        std::fs::write(
            &script,
            "#!/bin/sh\nprintf 'listing' > main_Output.txt\nprintf '\\140' > main\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        let source = dir.path().join("main.s");
        std::fs::write(&source, " RTS\n").unwrap();

        let assembly = assemble(&script.display().to_string(), &source).await.unwrap();
        assert!(assembly.listing.ends_with("main_Output.txt"));
        assert_eq!(std::fs::read_to_string(&assembly.listing).unwrap(), "listing");
        assert_eq!(std::fs::read(&assembly.binary).unwrap(), vec![0x60]);
    }
}
