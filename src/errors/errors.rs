use std::fmt::Display;

use thiserror::Error;

use crate::{lexer::tokens::TokenKind, Position};

/// A positioned parse failure.
///
/// Lexical and grammar failures share this one type; parsing stops at the
/// first one and no partial tree is returned.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{position}: {internal_error}")]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    Syntax,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn message(&self) -> String {
        self.internal_error.to_string()
    }

    pub fn kind(&self) -> ErrorKind {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. }
            | ErrorImpl::UnterminatedString
            | ErrorImpl::NumberParseError { .. }
            | ErrorImpl::FloatParseError { .. }
            | ErrorImpl::InvalidLiteral { .. }
            | ErrorImpl::InconsistentIndent
            | ErrorImpl::SourceUnreadable { .. } => ErrorKind::Lexical,
            _ => ErrorKind::Syntax,
        }
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnterminatedString => "UnterminatedString",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::FloatParseError { .. } => "FloatParseError",
            ErrorImpl::InvalidLiteral { .. } => "InvalidLiteral",
            ErrorImpl::InconsistentIndent => "InconsistentIndent",
            ErrorImpl::SourceUnreadable { .. } => "SourceUnreadable",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::NotAnIdentifier => "NotAnIdentifier",
            ErrorImpl::TrailingInput { .. } => "TrailingInput",
            ErrorImpl::TupleTrailingComma => "TupleTrailingComma",
            ErrorImpl::MissingElse => "MissingElse",
            ErrorImpl::NonAssociative { .. } => "NonAssociative",
            ErrorImpl::KeywordArgumentForm => "KeywordArgumentForm",
            ErrorImpl::LoadOperandCount { .. } => "LoadOperandCount",
            ErrorImpl::LoadModuleNotString => "LoadModuleNotString",
            ErrorImpl::LoadOperandForm => "LoadOperandForm",
            ErrorImpl::NestingTooDeep { .. } => "NestingTooDeep",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnterminatedString => {
                ErrorTip::Suggestion(String::from("is a closing quote missing?"))
            }
            ErrorImpl::NumberParseError { .. } => {
                ErrorTip::Suggestion(String::from("is it above the integer limit?"))
            }
            ErrorImpl::InconsistentIndent => ErrorTip::Suggestion(String::from(
                "dedent to the column of an enclosing block",
            )),
            ErrorImpl::TupleTrailingComma => ErrorTip::Suggestion(String::from(
                "wrap the tuple in parentheses or drop the comma",
            )),
            ErrorImpl::NonAssociative { .. } => ErrorTip::Suggestion(String::from(
                "wrap one of the comparisons in parentheses",
            )),
            ErrorImpl::LoadOperandCount { .. } => ErrorTip::Suggestion(String::from(
                "name at least one symbol to load from the module",
            )),
            ErrorImpl::NestingTooDeep { .. } => ErrorTip::Suggestion(String::from(
                "split the expression using intermediate variables",
            )),
            _ => ErrorTip::None,
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Lexical
    #[error("unexpected input character {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("invalid int literal {token:?}")]
    NumberParseError { token: String },
    #[error("invalid float literal {token:?}")]
    FloatParseError { token: String },
    #[error("literal {token:?} has no value")]
    InvalidLiteral { token: String },
    #[error("unindent does not match any outer indentation level")]
    InconsistentIndent,
    #[error("cannot read source: {message}")]
    SourceUnreadable { message: String },

    // Syntax
    #[error("got {got}, want {want}")]
    UnexpectedToken { got: TokenKind, want: String },
    #[error("not an identifier")]
    NotAnIdentifier,
    #[error("got {got} after expression, want EOF")]
    TrailingInput { got: TokenKind },
    #[error("unparenthesized tuple with trailing comma")]
    TupleTrailingComma,
    #[error("conditional expression without else clause")]
    MissingElse,
    #[error("{left} does not associate with {right} (use parens)")]
    NonAssociative { left: TokenKind, right: TokenKind },
    #[error("keyword argument must have form name=expr")]
    KeywordArgumentForm,
    #[error("load statement needs at least 2 operands, got {got}")]
    LoadOperandCount { got: usize },
    #[error("first operand of load statement must be a string literal")]
    LoadModuleNotString,
    #[error("load operand must be \"name\" or localname=\"name\"")]
    LoadOperandForm,
    #[error("nesting exceeds {limit} levels")]
    NestingTooDeep { limit: usize },
}
