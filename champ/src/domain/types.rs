//! Domain types providing compile-time safety and self-documentation
//!
//! These newtype wrappers keep 16-bit program addresses, watch indices and
//! sample value types apart, and make function signatures more expressive.

// Normalization clamps before narrowing, so the casts below cannot truncate.
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use std::fmt;
use std::str::FromStr;

/// 16-bit address in the 65C02 address space
///
/// Used for program counters, call targets and memory-backed variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub u16);

impl Address {
    /// Parse an assembler-style numeric literal.
    ///
    /// Accepts `$`-prefixed hex (`$6000`), `0x`-prefixed hex (`0x6000`),
    /// immediate literals (`#12`, `#$0C`) and plain decimal (`24576`).
    /// Returns `None` for anything else, including values above `0xffff`.
    #[must_use]
    pub fn from_literal(s: &str) -> Option<Self> {
        let s = s.trim();
        let value = if let Some(rest) = s.strip_prefix('#') {
            return Self::from_literal(rest);
        } else if let Some(hex) = s.strip_prefix('$') {
            u32::from_str_radix(hex, 16).ok()?
        } else if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            u32::from_str_radix(hex, 16).ok()?
        } else {
            s.parse::<u32>().ok()?
        };
        u16::try_from(value).ok().map(Address)
    }

    /// Address as an index into a 64 KiB image
    #[must_use]
    pub fn as_usize(self) -> usize {
        usize::from(self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04x}", self.0)
    }
}

/// Declared type of a sampled value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    U8,
    S8,
    U16,
    S16,
}

impl ValueType {
    /// All type tags, in declaration order
    pub const ALL: [ValueType; 4] = [ValueType::U8, ValueType::S8, ValueType::U16, ValueType::S16];

    /// Wire/directive tag (`u8`, `s8`, `u16`, `s16`)
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            ValueType::U8 => "u8",
            ValueType::S8 => "s8",
            ValueType::U16 => "u16",
            ValueType::S16 => "s16",
        }
    }

    /// Look up a type by its exact tag
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.tag() == tag)
    }

    /// Map a raw sample onto the 8-bit display domain `[0, 255]`.
    ///
    /// u8 is the identity, s8 is offset by 128, u16 keeps the high byte and
    /// s16 is offset by 32768 before keeping the high byte. Out-of-range raw
    /// values are clamped.
    #[must_use]
    pub fn normalize(self, raw: i64) -> u8 {
        let shifted = match self {
            ValueType::U8 => raw,
            ValueType::S8 => raw + 128,
            ValueType::U16 => raw >> 8,
            ValueType::S16 => (raw + 32_768) >> 8,
        };
        shifted.clamp(0, 255) as u8
    }

    /// Axis tick labels at normalized positions 0, 64, 128, 192 and 255
    #[must_use]
    pub fn tick_labels(self) -> [&'static str; 5] {
        match self {
            ValueType::U8 => ["0", "64", "128", "192", "255"],
            ValueType::S8 => ["-128", "-64", "0", "64", "127"],
            ValueType::U16 => ["0", "16k", "32k", "48k", "64k"],
            ValueType::S16 => ["-32k", "-16k", "0", "16k", "32k"],
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| format!("unknown value type `{s}`"))
    }
}

/// CPU register that can be watched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    A,
    X,
    Y,
}

impl Register {
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'A' => Some(Register::A),
            'X' => Some(Register::X),
            'Y' => Some(Register::Y),
            _ => None,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Register::A => "A",
            Register::X => "X",
            Register::Y => "Y",
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether a watch samples before or after its trigger instruction executes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Pre,
    Post,
}

impl Phase {
    /// Flag sent to the emulator (0 = pre, 1 = post)
    #[must_use]
    pub fn flag(self) -> u8 {
        match self {
            Phase::Pre => 0,
            Phase::Post => 1,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Pre => f.write_str("pre"),
            Phase::Post => f.write_str("post"),
        }
    }
}

/// Stable watch index, assigned by ascending trigger address then declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WatchIndex(pub usize);

impl fmt::Display for WatchIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "watch#{}", self.0)
    }
}

/// 24-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
    pub const WHITE: Rgb = Rgb { r: 0xff, g: 0xff, b: 0xff };

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase `rrggbb` form used by the encoder protocols
    #[must_use]
    pub fn hex(self) -> String {
        format!("{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = String;

    /// Parse `#rrggbb` (the leading `#` is optional)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("invalid RGB color `{s}` (expected #rrggbb)"));
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|e| e.to_string());
        Ok(Rgb { r: channel(0)?, g: channel(2)?, b: channel(4)? })
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.hex())
    }
}
