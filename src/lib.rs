#![allow(clippy::module_inception)]

use std::{fmt::Display, sync::Arc};

use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod source;

extern crate regex;

pub use ast::ast::{Expr, Module, Stmt};
pub use errors::errors::ErrorKind;
pub use lexer::lexer::tokenize;
pub use parser::parser::{parse_expression, parse_module};
pub use source::Source;

/// A location in a source file.
///
/// `line` and `col` are 1-based, `offset` is the byte offset from the start
/// of the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub file: Arc<String>,
    pub line: u32,
    pub col: u32,
    pub offset: u32,
}

impl Position {
    pub fn new(file: Arc<String>, line: u32, col: u32, offset: u32) -> Self {
        Position { file, line, col, offset }
    }

    pub fn null() -> Self {
        Position::new(Arc::new(String::from("<null>")), 0, 0, 0)
    }

    /// Returns the position `n` columns to the right on the same line.
    pub fn add_columns(&self, n: u32) -> Self {
        Position {
            file: Arc::clone(&self.file),
            line: self.line,
            col: self.col + n,
            offset: self.offset + n,
        }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&format!("{}:{}:{}", self.file, self.line, self.col))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Finds the line containing byte `position` of `content`.
///
/// Returns the 1-based line number, the line text and the offset of
/// `position` within that line. Positions past the end clamp to the last line.
pub fn get_line_at_position(content: &str, position: u32) -> (usize, String, usize) {
    let pos = position as usize;

    let mut start = 0;
    let mut line_number = 1;
    let mut last = (1, String::new(), 0);

    for line in content.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            return (line_number, line.to_string(), pos - start);
        }

        last = (line_number, line.to_string(), line.trim_end_matches('\n').len());
        start = end;
        line_number += 1;
    }

    last
}


/// Renders an error against its source text.
///
/// ```text
/// Error: UnexpectedToken (got ), want parameter)
/// -> BUILD:2:13
///   |
/// 2 | def f(*args,):
///   | ------------^
/// ```
pub fn render_error(error: &Error, content: &str) -> String {
    let position = error.get_position();
    let (line, line_text, line_pos) = get_line_at_position(content, position.offset);

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    let mut out = String::new();
    if let ErrorTip::None = error.get_tip() {
        out.push_str(&format!("Error: {} ({})\n", error.get_error_name(), error.message()));
    } else {
        out.push_str(&format!(
            "Error: {} ({}; {})\n",
            error.get_error_name(),
            error.message(),
            error.get_tip()
        ));
    }
    out.push_str(&format!("-> {}\n", position));
    out.push_str(&format!("{:>padding$}\n", "|"));

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    out.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim_end()));

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;

    out.push_str(&format!("{:>padding$} {:->arrows$}", "|", "^"));
    out
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' || c == '\t' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}
