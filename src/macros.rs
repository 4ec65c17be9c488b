//! Utility macros for the scanner.
//!
//! This module defines helper macros used throughout the lexer:
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_DEFAULT_HANDLER!` - Creates a default lexer handler for simple tokens
//!
//! These macros reduce boilerplate in the lexer implementation.

/// Creates a Token instance without a decoded literal payload.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$value` - The token's raw text
/// * `$span` - The source span
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::Identifier, "cc_library".to_string(), span);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $span:expr) => {
        Token {
            kind: $kind,
            value: $value,
            literal: None,
            span: $span,
        }
    };
    ($kind:expr, $value:expr, $literal:expr, $span:expr) => {
        Token {
            kind: $kind,
            value: $value,
            literal: Some($literal),
            span: $span,
        }
    };
}

/// Creates a default lexer handler for operators and punctuation.
///
/// Generates a handler function that emits a token of the given kind and
/// advances the lexer past it. Opening and closing brackets adjust the
/// nesting depth so that newlines inside them are ignored.
///
/// # Arguments
///
/// * `$kind` - The TokenKind to create
/// * `$value` - The literal string value (used for length calculation)
///
/// # Example
///
/// ```ignore
/// RegexPattern {
///     regex: Regex::new(r"^\+").unwrap(),
///     handler: MK_DEFAULT_HANDLER!(TokenKind::Plus, "+"),
/// }
/// ```
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr, $value:literal) => {
        |lexer: &mut Lexer, _matched: &str| -> Result<(), Error> {
            let start = lexer.position();
            lexer.advance_str($value);
            match $kind {
                TokenKind::OpenParen | TokenKind::OpenBracket | TokenKind::OpenCurly => {
                    lexer.depth += 1
                }
                TokenKind::CloseParen | TokenKind::CloseBracket | TokenKind::CloseCurly => {
                    lexer.depth = lexer.depth.saturating_sub(1)
                }
                _ => {}
            }
            let end = lexer.position();
            lexer.push(MK_TOKEN!($kind, String::from($value), Span { start, end }));
            Ok(())
        }
    };
}
