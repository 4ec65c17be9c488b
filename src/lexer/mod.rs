//! Lexical analysis module for the parser.
//!
//! This module contains the scanner that converts build-file source into a
//! stream of tokens for parsing. It handles:
//!
//! - Tokenization using anchored regex patterns
//! - Keywords, identifiers, int/float/string literals and operators
//! - INDENT/OUTDENT/NEWLINE synthesis from line structure
//! - Comments, blank lines and line continuations
//! - Token position tracking for error reporting

pub mod lexer;
pub mod tokens;
