//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the LL(1) recursive-descent parser that transforms
//! the token stream into an AST. It handles:
//!
//! - Statement parsing (def, if/elif/else, for, simple statements, load)
//! - Expression parsing by precedence climbing, conditionals and lambdas
//! - Primaries, collection literals, comprehensions and suffix chains
//!
//! The parser keeps one token of lookahead. The first error stops parsing
//! and is returned from the entry point.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod primary;
pub mod stmt;

#[cfg(test)]
mod tests;
