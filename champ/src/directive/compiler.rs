//! Directive compiler
//!
//! Turns directive strings into [`ValueType`]s (global variable declarations
//! on `EQU` lines) or [`WatchSpec`]s (code lines).
//!
//! ```text
//! directive := '@'? ( type_tag | watch )
//! type_tag  := 'u8' | 's8' | 'u16' | 's16'
//! watch     := component (',' component)* '(post)'?
//! component := register | variable
//! register  := ('A' | 'X' | 'Y') ('u' | 's')
//! variable  := name of a global declared earlier in the listing
//! ```

use std::collections::HashMap;

use super::lexer::{tokenize, Token};
use super::{Component, GlobalVariable, SourceLocation, WatchSpec, SIGIL};
use crate::domain::{Address, ChampError, Phase, Register, ValueType};

/// Maximum number of components in one watch (X and Y axis)
pub const MAX_COMPONENTS: usize = 2;

/// Compiles directives against the globals declared so far
pub struct DirectiveCompiler<'a> {
    globals: &'a HashMap<String, GlobalVariable>,
}

impl<'a> DirectiveCompiler<'a> {
    #[must_use]
    pub fn new(globals: &'a HashMap<String, GlobalVariable>) -> Self {
        Self { globals }
    }

    /// Compile the global-variable form: a bare type tag
    ///
    /// # Errors
    /// `InvalidDirective` if the body is not exactly one of the four type tags.
    pub fn compile_type_tag(
        &self,
        directive: &str,
        location: &SourceLocation,
    ) -> Result<ValueType, ChampError> {
        let body = strip_sigil(directive);
        ValueType::from_tag(body).ok_or_else(|| {
            invalid(directive, location, "expected one of u8, s8, u16, s16".to_string())
        })
    }

    /// Compile the watch form into a [`WatchSpec`] triggered at `trigger`
    ///
    /// # Errors
    /// `InvalidDirective` on lexical errors, empty components, misplaced
    /// `(post)`, unknown variables, or a component count other than 1 or 2.
    pub fn compile_watch(
        &self,
        directive: &str,
        trigger: Address,
        location: &SourceLocation,
    ) -> Result<WatchSpec, ChampError> {
        let body = strip_sigil(directive);
        let tokens = tokenize(body).map_err(|e| {
            invalid(directive, location, format!("{} at offset {}", e.message, e.offset))
        })?;

        let mut components = Vec::new();
        let mut phase = Phase::Pre;
        let mut expect_component = true;

        for (i, token) in tokens.iter().enumerate() {
            match *token {
                Token::Word(word) if expect_component => {
                    components.push(self.resolve_component(word, directive, location)?);
                    expect_component = false;
                }
                Token::Comma if !expect_component => expect_component = true,
                Token::PostMarker if !expect_component && i == tokens.len() - 1 => {
                    phase = Phase::Post;
                }
                Token::PostMarker => {
                    return Err(invalid(
                        directive,
                        location,
                        "`(post)` must follow the last component".to_string(),
                    ));
                }
                Token::Word(word) => {
                    return Err(invalid(directive, location, format!("missing `,` before `{word}`")));
                }
                Token::Comma => {
                    return Err(invalid(directive, location, "empty component".to_string()));
                }
            }
        }

        if expect_component && !components.is_empty() {
            return Err(invalid(directive, location, "empty component".to_string()));
        }
        if components.is_empty() || components.len() > MAX_COMPONENTS {
            return Err(invalid(
                directive,
                location,
                format!(
                    "a watch takes one or two components, found {}",
                    components.len()
                ),
            ));
        }

        Ok(WatchSpec {
            trigger,
            phase,
            source_file: location.file.clone(),
            source_line: location.line,
            components,
        })
    }

    fn resolve_component(
        &self,
        word: &str,
        directive: &str,
        location: &SourceLocation,
    ) -> Result<Component, ChampError> {
        if let Some(component) = register_component(word) {
            return Ok(component);
        }
        self.globals
            .get(word)
            .map(|global| Component::Variable {
                name: global.name.clone(),
                address: global.address,
                value_type: global.value_type,
            })
            .ok_or_else(|| invalid(directive, location, format!("unknown variable `{word}`")))
    }
}

/// `Au`, `As`, `Xu`, `Xs`, `Yu`, `Ys` → register component
fn register_component(word: &str) -> Option<Component> {
    let mut chars = word.chars();
    let (Some(reg), Some(sign), None) = (chars.next(), chars.next(), chars.next()) else {
        return None;
    };
    let register = Register::from_char(reg)?;
    let value_type = match sign {
        'u' => ValueType::U8,
        's' => ValueType::S8,
        _ => return None,
    };
    Some(Component::Register { register, value_type })
}

fn strip_sigil(directive: &str) -> &str {
    directive.strip_prefix(SIGIL).unwrap_or(directive)
}

fn invalid(directive: &str, location: &SourceLocation, reason: String) -> ChampError {
    ChampError::InvalidDirective {
        file: location.file.clone(),
        line: location.line,
        directive: directive.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn globals() -> HashMap<String, GlobalVariable> {
        let mut globals = HashMap::new();
        for (name, address, value_type) in
            [("RX", 0x8d, ValueType::S16), ("RY", 0x8f, ValueType::S16), ("COUNT", 0x06, ValueType::U8)]
        {
            globals.insert(
                name.to_string(),
                GlobalVariable { name: name.to_string(), address: Address(address), value_type },
            );
        }
        globals
    }

    fn loc() -> SourceLocation {
        SourceLocation { file: "plot3d.s".to_string(), line: 12 }
    }

    fn assert_invalid(result: Result<WatchSpec, ChampError>) {
        assert!(
            matches!(result, Err(ChampError::InvalidDirective { .. })),
            "expected InvalidDirective, got {result:?}"
        );
    }

    #[test]
    fn test_register_component() {
        let globals = globals();
        let compiler = DirectiveCompiler::new(&globals);
        let watch = compiler.compile_watch("@As", Address(0x6000), &loc()).unwrap();

        assert_eq!(watch.phase, Phase::Pre);
        assert_eq!(
            watch.components,
            vec![Component::Register { register: Register::A, value_type: ValueType::S8 }]
        );
        assert_eq!(watch.source_line, 12);
    }

    #[test]
    fn test_two_components_keep_written_order() {
        let globals = globals();
        let compiler = DirectiveCompiler::new(&globals);
        let watch = compiler.compile_watch("@RY,Xu(post)", Address(0x6000), &loc()).unwrap();

        assert_eq!(watch.phase, Phase::Post);
        assert_eq!(watch.components[0].name(), "RY");
        assert_eq!(watch.components[0].value_type(), ValueType::S16);
        assert_eq!(watch.components[1].name(), "X");
    }

    #[test]
    fn test_sigil_is_optional() {
        let globals = globals();
        let compiler = DirectiveCompiler::new(&globals);
        assert!(compiler.compile_watch("COUNT", Address(0x6000), &loc()).is_ok());
    }

    #[test]
    fn test_component_count_limits() {
        let globals = globals();
        let compiler = DirectiveCompiler::new(&globals);
        assert_invalid(compiler.compile_watch("@Au,Xu,Yu", Address(0x6000), &loc()));
        assert_invalid(compiler.compile_watch("@", Address(0x6000), &loc()));
        assert_invalid(compiler.compile_watch("@(post)", Address(0x6000), &loc()));
    }

    #[test]
    fn test_empty_components_rejected() {
        let globals = globals();
        let compiler = DirectiveCompiler::new(&globals);
        assert_invalid(compiler.compile_watch("@Au,", Address(0x6000), &loc()));
        assert_invalid(compiler.compile_watch("@,Au", Address(0x6000), &loc()));
        assert_invalid(compiler.compile_watch("@Au,,Xu", Address(0x6000), &loc()));
    }

    #[test]
    fn test_post_marker_must_be_last() {
        let globals = globals();
        let compiler = DirectiveCompiler::new(&globals);
        assert_invalid(compiler.compile_watch("@Au(post),Xu", Address(0x6000), &loc()));
    }

    #[test]
    fn test_unknown_variable() {
        let globals = globals();
        let compiler = DirectiveCompiler::new(&globals);
        let err = compiler.compile_watch("@RZ", Address(0x6000), &loc()).unwrap_err();
        assert!(err.to_string().contains("unknown variable `RZ`"));
    }

    #[test]
    fn test_register_like_prefix_is_not_a_register() {
        let globals = globals();
        let compiler = DirectiveCompiler::new(&globals);
        assert_invalid(compiler.compile_watch("@Aux", Address(0x6000), &loc()));
    }

    #[test]
    fn test_type_tags() {
        let globals = globals();
        let compiler = DirectiveCompiler::new(&globals);
        assert_eq!(compiler.compile_type_tag("@s16", &loc()).unwrap(), ValueType::S16);
        assert!(matches!(
            compiler.compile_type_tag("@u32", &loc()),
            Err(ChampError::InvalidDirective { .. })
        ));
    }
}
