//! Program image construction
//!
//! For each `load` entry, in order:
//! - `.s` sources are assembled, their listing parsed, and the binary loaded
//! - any other file is loaded as-is
//!
//! Later entries overwrite earlier ones where they overlap.

pub mod assembler;
pub mod image;

pub use assembler::{assemble, Assembly};
pub use image::DiskImage;

use log::info;
use std::path::Path;

use crate::config::LoadEntry;
use crate::domain::ChampError;
use crate::listing::{ListingParser, ParsedListing};

/// Built image plus everything recovered from the listings
#[derive(Debug)]
pub struct Program {
    pub image: DiskImage,
    pub listing: ParsedListing,
}

fn is_assembly_source(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "s")
}

/// Build the program image from `entries`
///
/// # Errors
/// `MissingInputFile`, `Assembler`, listing parse errors, and I/O errors.
pub async fn build(assembler: &str, entries: &[LoadEntry]) -> Result<Program, ChampError> {
    let mut image = DiskImage::new();
    let mut parser = ListingParser::new();

    for entry in entries {
        if !entry.path.is_file() {
            return Err(ChampError::MissingInputFile(entry.path.clone()));
        }
        if is_assembly_source(&entry.path) {
            let assembly = assemble(assembler, &entry.path).await?;
            let source_name = entry
                .path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            parser.parse_file(&source_name, &assembly.listing)?;
            image.load_file(entry.origin, &assembly.binary)?;
        } else {
            image.load_file(entry.origin, &entry.path)?;
        }
        info!("loaded {} at {}", entry.path.display(), entry.origin);
    }

    let listing = parser.finish();
    info!("{} labels, {} watches", listing.symbols.len(), listing.watches.len());
    Ok(Program { image, listing })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Address;

    #[tokio::test]
    async fn test_raw_files_are_loaded_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.bin");
        let second = dir.path().join("b.bin");
        std::fs::write(&first, [1, 2, 3]).unwrap();
        std::fs::write(&second, [9]).unwrap();

        let entries = vec![
            LoadEntry { origin: Address(0x0800), path: first },
            LoadEntry { origin: Address(0x0801), path: second },
        ];
        let program = build("unused", &entries).await.unwrap();
        assert_eq!(program.image.byte(Address(0x0800)), 1);
        assert_eq!(program.image.byte(Address(0x0801)), 9);
        assert_eq!(program.image.byte(Address(0x0802)), 3);
        assert!(program.listing.watches.is_empty());
    }

    #[tokio::test]
    async fn test_missing_load_file() {
        let entries =
            vec![LoadEntry { origin: Address(0), path: "/no/such/file.bin".into() }];
        assert!(matches!(
            build("unused", &entries).await,
            Err(ChampError::MissingInputFile(_))
        ));
    }

    #[test]
    fn test_source_detection() {
        assert!(is_assembly_source(Path::new("plot3d.s")));
        assert!(!is_assembly_source(Path::new("font.bin")));
        assert!(!is_assembly_source(Path::new("notes.sx")));
    }
}
