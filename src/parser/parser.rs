//! Parser driver.
//!
//! This module contains the main Parser struct and the two public entry
//! points. The parser keeps exactly one token of lookahead, pulled on demand
//! from the lexer, and every grammar function reads and advances it through
//! the methods below.
//!
//! Failures from the lexer or any grammar function propagate with `?` up to
//! `parse_module` / `parse_expression`, which are the only places an error is
//! reported.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::{
    ast::ast::{Expr, Module},
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::Lexer,
        tokens::{Token, TokenKind},
    },
    source::Source,
    Position,
};

use super::{expr::parse_test, stmt::parse_file};

/// Deepest nesting of expressions and blocks accepted before parsing fails.
///
/// A block counts once. A bracket level counts twice: once for the
/// bracketed `test` and once for the primary holding it.
pub const MAX_NESTING: usize = 50;

/// The parsing state: the token source and the current lookahead token.
pub struct Parser {
    /// Token source
    lexer: Lexer,
    /// Lookahead token
    tok: Token,
    /// Current nesting of `enter`/`leave` pairs
    depth: usize,
}

impl Parser {
    /// Creates a parser over `lexer` and reads the first lookahead token.
    pub fn new(mut lexer: Lexer) -> Result<Self, Error> {
        let tok = lexer.next_token()?;
        trace!(kind = %tok.kind, position = %tok.span.start, "next token");
        Ok(Parser { lexer, tok, depth: 0 })
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.tok.kind
    }

    /// Advances to the next token and returns the previous token.
    pub fn advance(&mut self) -> Result<Token, Error> {
        let next = self.lexer.next_token()?;
        trace!(kind = %next.kind, position = %next.span.start, "next token");
        Ok(std::mem::replace(&mut self.tok, next))
    }

    /// Expects a token of the specified kind.
    ///
    /// Returns the consumed token, or a "got X, want Y" error positioned at
    /// the current token.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        if self.tok.kind != expected_kind {
            return Err(self.unexpected(&expected_kind.to_string()));
        }
        self.advance()
    }

    /// Opens one level of nesting, failing once `MAX_NESTING` is exceeded.
    pub fn enter(&mut self) -> Result<(), Error> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(self.error(ErrorImpl::NestingTooDeep { limit: MAX_NESTING }));
        }
        Ok(())
    }

    /// Closes a level opened by `enter`.
    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Builds a "got X, want Y" error at the current token.
    pub fn unexpected(&self, want: &str) -> Error {
        self.error(ErrorImpl::UnexpectedToken {
            got: self.tok.kind,
            want: want.to_string(),
        })
    }

    /// Builds an error positioned at the current token.
    pub fn error(&self, error_impl: ErrorImpl) -> Error {
        Error::new(error_impl, self.get_position())
    }

    /// Replaces the current `in` token by the synthetic `not in` operator.
    pub fn merge_not_in(&mut self) {
        self.tok.kind = TokenKind::NotIn;
    }

    /// Returns the start of the current token.
    pub fn get_position(&self) -> Position {
        self.tok.span.start.clone()
    }
}

/// Parses a build file into a `Module`.
///
/// `filename` is only used for positions; the text comes from `source`,
/// which may be a string, a byte buffer or a reader.
pub fn parse_module<'a>(filename: &str, source: impl Into<Source<'a>>) -> Result<Module, Error> {
    let file = Arc::new(filename.to_string());

    let result = source.into().read(&file).and_then(|text| {
        let mut parser = Parser::new(Lexer::new(text, Arc::clone(&file)))?;
        parse_file(&mut parser)
    });

    match result {
        Ok(stmts) => {
            debug!(file = %file, statements = stmts.len(), "parsed module");
            Ok(Module { path: file, stmts })
        }
        Err(error) => {
            debug!(%error, "module parse failed");
            Err(error)
        }
    }
}

/// Parses a single expression. Anything but line ends after the expression
/// is an error.
pub fn parse_expression<'a>(filename: &str, source: impl Into<Source<'a>>) -> Result<Expr, Error> {
    let file = Arc::new(filename.to_string());

    let result = source.into().read(&file).and_then(|text| {
        let mut parser = Parser::new(Lexer::new(text, Arc::clone(&file)))?;
        let expr = parse_test(&mut parser)?;

        while parser.current_token_kind() == TokenKind::Newline {
            parser.advance()?;
        }
        if parser.current_token_kind() != TokenKind::EOF {
            return Err(parser.error(ErrorImpl::TrailingInput {
                got: parser.current_token_kind(),
            }));
        }

        Ok(expr)
    });

    match result {
        Ok(expr) => {
            debug!(file = %file, "parsed expression");
            Ok(expr)
        }
        Err(error) => {
            debug!(%error, "expression parse failed");
            Err(error)
        }
    }
}
