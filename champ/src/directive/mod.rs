//! Instrumentation directives
//!
//! Directives live in assembler comments and start with `@`:
//!
//! ```text
//! RX      EQU $8D        ; @s16           ← global variable declaration
//!         LDA (PTR),Y    ; @Au @RX,RY     ← two watches on this instruction
//!         STA OUT        ; @Xs(post)      ← sampled after the instruction
//! ```
//!
//! [`DirectiveCompiler`] turns them into [`GlobalVariable`] types and
//! [`WatchSpec`]s; [`crate::listing`] decides which form applies.

pub mod compiler;
pub mod lexer;

pub use compiler::{DirectiveCompiler, MAX_COMPONENTS};

use crate::domain::{Address, Phase, Register, ValueType};

/// Character that introduces a directive inside a comment
pub const SIGIL: char = '@';

/// Where a directive was written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: String,
    pub line: usize,
}

/// A memory-backed variable declared with a type directive on an `EQU` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalVariable {
    pub name: String,
    pub address: Address,
    pub value_type: ValueType,
}

/// One sampled value of a watch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component {
    Register { register: Register, value_type: ValueType },
    Variable { name: String, address: Address, value_type: ValueType },
}

impl Component {
    /// Short name used as the axis caption
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Component::Register { register, .. } => register.name(),
            Component::Variable { name, .. } => name,
        }
    }

    #[must_use]
    pub fn value_type(&self) -> ValueType {
        match self {
            Component::Register { value_type, .. } | Component::Variable { value_type, .. } => {
                *value_type
            }
        }
    }

    /// Location field of the watch registration protocol
    #[must_use]
    pub fn location(&self) -> String {
        match self {
            Component::Register { register, .. } => format!("reg,{register}"),
            Component::Variable { address, .. } => format!("mem,{address}"),
        }
    }
}

/// A point-in-program sampling request with one or two components
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchSpec {
    pub trigger: Address,
    pub phase: Phase,
    pub source_file: String,
    pub source_line: usize,
    pub components: Vec<Component>,
}

impl WatchSpec {
    /// Title caption: `0x6000 / plot3d.s:12 (post)`
    #[must_use]
    pub fn caption(&self) -> String {
        format!("{} / {}:{} ({})", self.trigger, self.source_file, self.source_line, self.phase)
    }
}
