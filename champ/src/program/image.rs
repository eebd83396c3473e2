//! 64 KiB memory image handed to the emulator

use log::debug;
use std::path::Path;

use crate::domain::{Address, ChampError};
use crate::symbolization::SymbolTable;

pub const IMAGE_SIZE: usize = 0x1_0000;
const RTS_OPCODE: u8 = 0x60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskImage {
    memory: Vec<u8>,
}

impl Default for DiskImage {
    fn default() -> Self {
        Self::new()
    }
}

impl DiskImage {
    /// Zeroed image
    #[must_use]
    pub fn new() -> Self {
        Self { memory: vec![0; IMAGE_SIZE] }
    }

    /// Copy `bytes` to memory starting at `origin`
    ///
    /// # Errors
    /// `Config` if the data runs past the end of memory.
    pub fn load_at(&mut self, origin: Address, bytes: &[u8]) -> Result<(), ChampError> {
        let start = origin.as_usize();
        let end = start + bytes.len();
        if end > IMAGE_SIZE {
            return Err(ChampError::Config(format!(
                "{} bytes at {origin} run past the end of memory",
                bytes.len()
            )));
        }
        self.memory[start..end].copy_from_slice(bytes);
        debug!("loaded {} bytes at {origin}", bytes.len());
        Ok(())
    }

    /// Load a file's raw contents at `origin`
    ///
    /// # Errors
    /// I/O errors, or see [`Self::load_at`].
    pub fn load_file(&mut self, origin: Address, path: &Path) -> Result<(), ChampError> {
        let bytes = std::fs::read(path)?;
        self.load_at(origin, &bytes)
    }

    /// Replace the first byte of each labelled subroutine with `RTS`
    ///
    /// # Errors
    /// `Config` for a label the listings never defined.
    pub fn patch_instant_rts(
        &mut self,
        labels: &[String],
        symbols: &SymbolTable,
    ) -> Result<(), ChampError> {
        for label in labels {
            let address = symbols.address_for(label).ok_or_else(|| {
                ChampError::Config(format!("instant_rts label `{label}` is not defined"))
            })?;
            self.memory[address.as_usize()] = RTS_OPCODE;
            debug!("patched RTS into {label} at {address}");
        }
        Ok(())
    }

    #[must_use]
    pub fn byte(&self, address: Address) -> u8 {
        self.memory[address.as_usize()]
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.memory
    }

    /// Write the image to `path`
    ///
    /// # Errors
    /// I/O errors.
    pub fn write_to(&self, path: &Path) -> Result<(), ChampError> {
        std::fs::write(path, &self.memory)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_at_origin() {
        let mut image = DiskImage::new();
        image.load_at(Address(0x6000), &[0xa9, 0x01, 0x60]).unwrap();
        assert_eq!(image.byte(Address(0x5fff)), 0);
        assert_eq!(image.byte(Address(0x6000)), 0xa9);
        assert_eq!(image.byte(Address(0x6002)), 0x60);
        assert_eq!(image.as_bytes().len(), IMAGE_SIZE);
    }

    #[test]
    fn test_load_past_end_is_rejected() {
        let mut image = DiskImage::new();
        assert!(image.load_at(Address(0xffff), &[1]).is_ok());
        assert!(matches!(image.load_at(Address(0xffff), &[1, 2]), Err(ChampError::Config(_))));
    }

    #[test]
    fn test_instant_rts() {
        let mut symbols = SymbolTable::new();
        symbols.bind("WAITKEY", Address(0x6100));
        let mut image = DiskImage::new();
        image.load_at(Address(0x6100), &[0x20, 0x00, 0x70]).unwrap();

        image.patch_instant_rts(&["WAITKEY".to_string()], &symbols).unwrap();
        assert_eq!(image.byte(Address(0x6100)), 0x60);
        assert_eq!(image.byte(Address(0x6101)), 0x00);

        let missing = image.patch_instant_rts(&["BEEP".to_string()], &symbols);
        assert!(matches!(missing, Err(ChampError::Config(_))));
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("disk_image");
        let mut image = DiskImage::new();
        image.load_at(Address(0x10), &[7]).unwrap();
        image.write_to(&path).unwrap();

        let written = std::fs::read(&path).unwrap();
        assert_eq!(written.len(), IMAGE_SIZE);
        assert_eq!(written[0x10], 7);
    }
}
