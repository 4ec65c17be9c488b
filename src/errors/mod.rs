//! Error types and error handling for the parser.
//!
//! This module defines the single error type returned by the public entry
//! points. It includes:
//!
//! - Error structures with source position information
//! - Lexical and syntax error variants with their exact messages
//! - Error names and suggestions used by the caret diagnostic

pub mod errors;
