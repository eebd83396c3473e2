//! Assembler listing ingestion
//!
//! ```text
//!   *_Output.txt ──► ListingRecord ──► ListingParser ──► ParsedListing
//!                    (fields, type)    (labels, EQU,     (SymbolTable,
//!                                       directives)       globals, watches)
//! ```

pub mod mnemonics;
pub mod parser;
pub mod record;

pub use parser::{ListingParser, ParsedListing};
pub use record::{LineType, ListingRecord};
