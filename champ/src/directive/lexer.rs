//! Tokenizer for the directive mini-language
//!
//! A directive body (sigil already stripped) is a flat sequence of words,
//! commas and an optional `(post)` marker:
//!
//! ```text
//! Au          → [Word("Au")]
//! RX,RY(post) → [Word("RX"), Comma, Word("RY"), PostMarker]
//! ```
//!
//! Words are runs of anything except `,` and `(`; the lexer does not decide
//! whether a word is a register or a variable, that is the compiler's job.

/// Literal spelling of the post-sample marker
pub const POST_MARKER: &str = "(post)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Word(&'a str),
    Comma,
    PostMarker,
}

/// Lexical error with the byte offset where it was detected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub offset: usize,
    pub message: String,
}

/// Split a directive body into tokens
///
/// # Errors
/// Returns a [`LexError`] on whitespace or on a `(` that does not start `(post)`.
pub fn tokenize(body: &str) -> Result<Vec<Token<'_>>, LexError> {
    let mut tokens = Vec::new();
    let mut offset = 0;

    while offset < body.len() {
        let rest = &body[offset..];
        let Some(c) = rest.chars().next() else { break };

        if c == ',' {
            tokens.push(Token::Comma);
            offset += 1;
        } else if c == '(' {
            if !rest.starts_with(POST_MARKER) {
                return Err(LexError {
                    offset,
                    message: format!("expected `{POST_MARKER}`"),
                });
            }
            tokens.push(Token::PostMarker);
            offset += POST_MARKER.len();
        } else if c.is_whitespace() {
            return Err(LexError { offset, message: "unexpected whitespace".to_string() });
        } else {
            let len = rest
                .find(|ch: char| ch == ',' || ch == '(' || ch.is_whitespace())
                .unwrap_or(rest.len());
            tokens.push(Token::Word(&rest[..len]));
            offset += len;
        }
    }

    Ok(tokens)
}
