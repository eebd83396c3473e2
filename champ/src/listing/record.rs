//! One line of an assembler listing, split into typed fields
//!
//! Listing lines are pipe-delimited:
//!
//! ```text
//!   field 0 | field 1      | field 2 | 3 | 4 | 5 | field 6  | field 7
//!  ---------+--------------+---------+---+---+---+----------+---------------------------
//!       12  | plot3d.s  40 | Code    | … | … | … | 00/6012  | DRAW LDA #$00 ; @Au
//! ```
//!
//! field 1 ends with the source line number, field 2 is the line type,
//! field 6 starts with the `bank/offset` address and field 7 holds the code
//! and comment text.

use crate::directive::SIGIL;
use crate::domain::Address;

const FIELD_SOURCE_LINE: usize = 1;
const FIELD_LINE_TYPE: usize = 2;
const FIELD_ADDRESS: usize = 6;
const FIELD_CODE: usize = 7;

/// Comment delimiter in assembler source
pub const COMMENT: char = ';';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineType {
    Code,
    Equivalence,
    Empty,
    Other(String),
}

impl LineType {
    fn classify(field: &str) -> Self {
        match field.trim() {
            "Code" => LineType::Code,
            "Equivalence" => LineType::Equivalence,
            "Empty" => LineType::Empty,
            other => LineType::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ListingRecord<'a> {
    pub line_type: LineType,
    raw: &'a str,
    fields: Vec<&'a str>,
}

impl<'a> ListingRecord<'a> {
    /// Split a listing line; `None` if it has too few fields to carry a line type
    #[must_use]
    pub fn parse(raw: &'a str) -> Option<Self> {
        let fields: Vec<&str> = raw.split('|').collect();
        if fields.len() <= FIELD_LINE_TYPE {
            return None;
        }
        Some(Self { line_type: LineType::classify(fields[FIELD_LINE_TYPE]), raw, fields })
    }

    /// Source line number embedded in field 1
    #[must_use]
    pub fn source_line(&self) -> Option<usize> {
        self.fields.get(FIELD_SOURCE_LINE)?.split_whitespace().last()?.parse().ok()
    }

    /// Resolved address from field 6, if it is a well-formed `HH/HHHH` pair
    #[must_use]
    pub fn address(&self) -> Option<Address> {
        let token = self.fields.get(FIELD_ADDRESS)?.split_whitespace().next()?;
        parse_bank_offset(token)
    }

    /// Code and comment text (field 7 onwards, trimmed)
    #[must_use]
    pub fn code(&self) -> &'a str {
        // Re-slice from the raw line so a `|` inside a comment survives
        self.raw
            .match_indices('|')
            .nth(FIELD_CODE - 1)
            .map_or("", |(i, _)| self.raw[i + 1..].trim())
    }

    /// Whether the part of the raw line after its last `;` contains a directive sigil
    #[must_use]
    pub fn has_stray_directive(&self) -> bool {
        self.raw.rfind(COMMENT).is_some_and(|i| self.raw[i + 1..].contains(SIGIL))
    }
}

/// Parse `00/6012` into the 16-bit offset
fn parse_bank_offset(token: &str) -> Option<Address> {
    let (bank, offset) = token.split_once('/')?;
    let is_hex = |s: &str, len: usize| s.len() == len && s.chars().all(|c| c.is_ascii_hexdigit());
    if !is_hex(bank, 2) || !is_hex(offset, 4) {
        return None;
    }
    u16::from_str_radix(offset, 16).ok().map(Address)
}

/// Directive candidates in the comment part of `code`, in order of appearance
///
/// A candidate is the sigil followed by a non-empty run of non-whitespace.
#[must_use]
pub fn extract_directives(code: &str) -> Vec<&str> {
    let Some(start) = code.find(COMMENT) else {
        return Vec::new();
    };
    let comment = &code[start + 1..];
    let mut directives = Vec::new();
    let mut rest = comment;

    while let Some(at) = rest.find(SIGIL) {
        let candidate = &rest[at..];
        let len = candidate
            .char_indices()
            .skip(1)
            .find(|(_, c)| c.is_whitespace())
            .map_or(candidate.len(), |(i, _)| i);
        if len > SIGIL.len_utf8() {
            directives.push(&candidate[..len]);
        }
        rest = &candidate[len..];
    }

    directives
}

#[cfg(test)]
mod tests {
    use super::*;

    const CODE_LINE: &str =
        "   57 |    plot3d.s    40 | Code        | 0 | 00 | 1 | 00/6012 : A9 00    | DRAW LDA #$00 ; @Au @RX,RY(post)";

    #[test]
    fn test_fields() {
        let record = ListingRecord::parse(CODE_LINE).unwrap();
        assert_eq!(record.line_type, LineType::Code);
        assert_eq!(record.source_line(), Some(40));
        assert_eq!(record.address(), Some(Address(0x6012)));
        assert_eq!(record.code(), "DRAW LDA #$00 ; @Au @RX,RY(post)");
    }

    #[test]
    fn test_short_lines_are_not_records() {
        assert!(ListingRecord::parse("just text").is_none());
        assert!(ListingRecord::parse("a|b").is_none());
    }

    #[test]
    fn test_malformed_address() {
        let record = ListingRecord::parse("1 | f 2 | Code | | | | 6012 | NOP").unwrap();
        assert_eq!(record.address(), None);
        let record = ListingRecord::parse("1 | f 2 | Code | | | | 0/6012 | NOP").unwrap();
        assert_eq!(record.address(), None);
    }

    #[test]
    fn test_pipe_inside_comment() {
        let record = ListingRecord::parse("1 | f 2 | Code | | | | 00/6000 | NOP ; a|b").unwrap();
        assert_eq!(record.code(), "NOP ; a|b");
    }

    #[test]
    fn test_extract_directives() {
        assert_eq!(extract_directives("LDA #$00 ; @Au @RX,RY(post)"), vec!["@Au", "@RX,RY(post)"]);
        assert_eq!(extract_directives("LDA #$00 ; no directive"), Vec::<&str>::new());
        assert_eq!(extract_directives("LDA @Au"), Vec::<&str>::new());
        assert_eq!(extract_directives("NOP ; mail@Xu here"), vec!["@Xu"]);
        assert_eq!(extract_directives("NOP ; lone @ sigil"), Vec::<&str>::new());
    }

    #[test]
    fn test_stray_directive_detection() {
        let record = ListingRecord::parse("1 | f 2 | Comment | | | | | * text ; @Au").unwrap();
        assert!(record.has_stray_directive());
        let record = ListingRecord::parse("1 | f 2 | Comment | | | | | * text ; plain").unwrap();
        assert!(!record.has_stray_directive());
    }
}
