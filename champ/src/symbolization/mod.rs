//! # Symbol Resolution
//!
//! Converts raw 16-bit program addresses reported by the emulator into the
//! labels the programmer wrote, so the cost table reads `DRAW_LINE` instead
//! of `0x6a3c`.
//!
//! The table is filled while the assembler listing is parsed (see
//! [`crate::listing`]) and is consulted afterwards for:
//! - `instant_rts` patching and `entry` resolution (label → address)
//! - the cost table's Label column (address → label)

pub mod symbol_table;

pub use symbol_table::SymbolTable;
