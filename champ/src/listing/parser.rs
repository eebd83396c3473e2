//! Listing parser
//!
//! Walks an assembler listing once, in source order, and builds:
//! - the [`SymbolTable`] (labels and `EQU` constants)
//! - the global variables declared with a type directive on an `EQU` line
//! - one [`WatchSpec`] per directive on a code line
//!
//! Parsing is eager and fails closed: the first malformed directive aborts
//! the run before the emulator is started.

use log::{debug, warn};
use std::collections::HashMap;
use std::path::Path;

use super::mnemonics::is_mnemonic;
use super::record::{extract_directives, LineType, ListingRecord};
use crate::directive::{DirectiveCompiler, GlobalVariable, SourceLocation, WatchSpec};
use crate::domain::{Address, ChampError};
use crate::symbolization::SymbolTable;

/// Everything recovered from the listings of one run
#[derive(Debug, Default)]
pub struct ParsedListing {
    pub symbols: SymbolTable,
    pub globals: HashMap<String, GlobalVariable>,
    /// Watches ordered by trigger address, then declaration order.
    /// A watch's position in this vector is its stable index.
    pub watches: Vec<WatchSpec>,
}

#[derive(Debug, Default)]
pub struct ListingParser {
    symbols: SymbolTable,
    globals: HashMap<String, GlobalVariable>,
    watches: Vec<WatchSpec>,
}

impl ListingParser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a listing file produced for `source_name`
    ///
    /// # Errors
    /// I/O errors reading the listing, or any parse error (see [`Self::parse_str`]).
    pub fn parse_file(&mut self, source_name: &str, listing: &Path) -> Result<(), ChampError> {
        let text = std::fs::read_to_string(listing)?;
        self.parse_str(source_name, &text)
    }

    /// Parse listing text; `source_name` tags watches and error messages
    ///
    /// # Errors
    /// `Parse` for structural violations (directives on the wrong line type,
    /// several directives on an `EQU` line), `InvalidDirective` for directive
    /// grammar errors.
    pub fn parse_str(&mut self, source_name: &str, text: &str) -> Result<(), ChampError> {
        let before = self.watches.len();
        for (index, raw) in text.lines().enumerate() {
            let Some(record) = ListingRecord::parse(raw) else {
                continue;
            };
            let location = SourceLocation {
                file: source_name.to_string(),
                line: record.source_line().unwrap_or(index + 1),
            };
            self.parse_record(&record, &location)?;
        }
        debug!(
            "{source_name}: {} symbols, {} globals, {} new watches",
            self.symbols.len(),
            self.globals.len(),
            self.watches.len() - before
        );
        Ok(())
    }

    fn parse_record(
        &mut self,
        record: &ListingRecord<'_>,
        location: &SourceLocation,
    ) -> Result<(), ChampError> {
        if let LineType::Other(line_type) = &record.line_type {
            if record.has_stray_directive() {
                return Err(parse_error(
                    location,
                    format!("Directive not allowed on a `{line_type}` line."),
                ));
            }
            return Ok(());
        }

        let Some(address) = record.address() else {
            return Ok(());
        };
        let code = record.code();
        let tokens: Vec<&str> = code.split_whitespace().collect();
        let Some(&first) = tokens.first() else {
            return Ok(());
        };
        let directives = extract_directives(code);

        let label = (!is_mnemonic(first) && !first.starts_with([';', '*'])).then_some(first);

        if directives.is_empty() && record.line_type == LineType::Equivalence {
            match tokens.get(2).and_then(|value| Address::from_literal(value)) {
                Some(value) => self.symbols.bind(first, value),
                None => warn!(
                    "[{}:{}] cannot evaluate `{code}`, `{first}` left unbound",
                    location.file, location.line
                ),
            }
            return Ok(());
        }
        if let Some(label) = label {
            self.symbols.bind(label, address);
        }

        if directives.is_empty() {
            return Ok(());
        }

        match record.line_type {
            LineType::Equivalence => self.declare_global(label, &tokens, &directives, location),
            LineType::Code => {
                let compiler = DirectiveCompiler::new(&self.globals);
                for directive in directives {
                    let watch = compiler.compile_watch(directive, address, location)?;
                    self.watches.push(watch);
                }
                Ok(())
            }
            _ => {
                warn!(
                    "[{}:{}] directives on an empty line are ignored: {}",
                    location.file,
                    location.line,
                    directives.join(" ")
                );
                Ok(())
            }
        }
    }

    fn declare_global(
        &mut self,
        label: Option<&str>,
        tokens: &[&str],
        directives: &[&str],
        location: &SourceLocation,
    ) -> Result<(), ChampError> {
        if directives.len() != 1 {
            return Err(parse_error(
                location,
                "No more than one directive allowed in an equivalence declaration.".to_string(),
            ));
        }
        let Some(name) = label else {
            return Err(parse_error(location, "Typed equivalence without a label.".to_string()));
        };
        let Some(address) = tokens.get(2).and_then(|value| Address::from_literal(value)) else {
            return Err(parse_error(location, format!("Cannot evaluate address of `{name}`.")));
        };

        let value_type =
            DirectiveCompiler::new(&self.globals).compile_type_tag(directives[0], location)?;
        debug!("global {name} at {address}: {value_type}");
        self.globals.insert(
            name.to_string(),
            GlobalVariable { name: name.to_string(), address, value_type },
        );
        Ok(())
    }

    /// Finish parsing and assign watch indices
    #[must_use]
    pub fn finish(mut self) -> ParsedListing {
        // Stable sort keeps declaration order within one trigger address
        self.watches.sort_by_key(|watch| watch.trigger);
        ParsedListing { symbols: self.symbols, globals: self.globals, watches: self.watches }
    }
}

fn parse_error(location: &SourceLocation, message: String) -> ChampError {
    ChampError::Parse { file: location.file.clone(), line: location.line, message }
}
