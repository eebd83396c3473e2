//! Emulator trace lines
//!
//! One event per line, whitespace separated, leading tag first:
//!
//! ```text
//! jsr 0x6012 1834          call into 0x6012 at cumulative cycle 1834
//! rts 1901                 return at cycle 1901
//! watch 3 -12 200          sample of watch 3: values -12, 200
//! screen 52011 0 0 127 …   frame shown at cycle 52011, 40×192 raster bytes
//! cycles 100000            progress tick
//! error 6012 Stack underrun
//! ```
//!
//! The extended watch form `watch 0x<sub> <index> <cycles> <values…>` is
//! accepted too; its subroutine and cycle fields are skipped.

use crate::domain::{Address, WatchIndex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    Call { address: Address, cycles: u64 },
    Return { cycles: u64 },
    WatchSample { index: WatchIndex, values: Vec<i64> },
    ScreenFrame { cycles: u64, raster: Vec<u8> },
    CycleCount(u64),
    EmulatorError { pc: Option<Address>, message: String },
}

impl TraceEvent {
    /// Decode one trace line; `None` for unrecognized or malformed lines
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let tag = parts.next()?;
        match tag {
            "jsr" => {
                let address = parse_hex_address(parts.next()?)?;
                let cycles = parts.next()?.parse().ok()?;
                Some(TraceEvent::Call { address, cycles })
            }
            "rts" => Some(TraceEvent::Return { cycles: parts.next()?.parse().ok()? }),
            "watch" => {
                let first = parts.next()?;
                let index = if first.starts_with("0x") {
                    let index = parts.next()?.parse().ok()?;
                    parts.next()?;
                    index
                } else {
                    first.parse().ok()?
                };
                let values = parts.map(str::parse).collect::<Result<Vec<i64>, _>>().ok()?;
                Some(TraceEvent::WatchSample { index: WatchIndex(index), values })
            }
            "screen" => {
                let cycles = parts.next()?.parse().ok()?;
                let raster = parts.map(str::parse).collect::<Result<Vec<u8>, _>>().ok()?;
                Some(TraceEvent::ScreenFrame { cycles, raster })
            }
            "cycles" => Some(TraceEvent::CycleCount(parts.next()?.parse().ok()?)),
            "error" => {
                let rest = line.trim_start()[tag.len()..].trim_start();
                let (pc, message) = match rest.split_once(char::is_whitespace) {
                    Some((pc, message)) => (parse_hex_address(pc), message.trim()),
                    None => (parse_hex_address(rest), ""),
                };
                Some(TraceEvent::EmulatorError { pc, message: message.to_string() })
            }
            _ => None,
        }
    }
}

/// Hex address with or without a `0x` prefix
fn parse_hex_address(s: &str) -> Option<Address> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    u16::from_str_radix(digits, 16).ok().map(Address)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_and_return() {
        assert_eq!(
            TraceEvent::parse("jsr 0x6012 1834"),
            Some(TraceEvent::Call { address: Address(0x6012), cycles: 1834 })
        );
        assert_eq!(
            TraceEvent::parse("jsr 6012 7"),
            Some(TraceEvent::Call { address: Address(0x6012), cycles: 7 })
        );
        assert_eq!(TraceEvent::parse("rts 1901"), Some(TraceEvent::Return { cycles: 1901 }));
    }

    #[test]
    fn test_watch_forms() {
        let expected =
            Some(TraceEvent::WatchSample { index: WatchIndex(3), values: vec![-12, 200] });
        assert_eq!(TraceEvent::parse("watch 3 -12 200"), expected);
        assert_eq!(TraceEvent::parse("watch 0x6000 3 4711 -12 200"), expected);
    }

    #[test]
    fn test_screen() {
        assert_eq!(
            TraceEvent::parse("screen 52011 0 1 127"),
            Some(TraceEvent::ScreenFrame { cycles: 52011, raster: vec![0, 1, 127] })
        );
        assert_eq!(
            TraceEvent::parse("screen 9"),
            Some(TraceEvent::ScreenFrame { cycles: 9, raster: vec![] })
        );
    }

    #[test]
    fn test_error_line() {
        assert_eq!(
            TraceEvent::parse("error 6012 Unhandled opcode: 02"),
            Some(TraceEvent::EmulatorError {
                pc: Some(Address(0x6012)),
                message: "Unhandled opcode: 02".to_string()
            })
        );
    }

    #[test]
    fn test_unrecognized_and_malformed_lines() {
        assert_eq!(TraceEvent::parse(""), None);
        assert_eq!(TraceEvent::parse("log 6000 00 00 00 01ff 00 00"), None);
        assert_eq!(TraceEvent::parse("jsr zz 10"), None);
        assert_eq!(TraceEvent::parse("rts"), None);
        assert_eq!(TraceEvent::parse("watch 1 x"), None);
        assert_eq!(TraceEvent::parse("cycles 100000"), Some(TraceEvent::CycleCount(100_000)));
    }
}
