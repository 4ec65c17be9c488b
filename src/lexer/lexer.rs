use std::{collections::VecDeque, sync::Arc};

use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use crate::{
    errors::errors::{Error, ErrorImpl},
    source::Source,
    Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{LiteralValue, Token, TokenKind, RESERVED_LOOKUP};

const TAB_WIDTH: u32 = 8;

pub type RegexHandler = fn(&mut Lexer, &str) -> Result<(), Error>;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

lazy_static! {
    // Patterns are anchored and tried in order; longer operators come first.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern { regex: Regex::new(r#"(?s)^[rR]?(?:"""(?:\\.|[^\\])*?"""|'''(?:\\.|[^\\])*?''')"#).unwrap(), handler: string_handler },
        RegexPattern { regex: Regex::new(r#"^[rR]?(?:"(?:\\(?s:.)|[^\\"\n])*"|'(?:\\(?s:.)|[^\\'\n])*')"#).unwrap(), handler: string_handler },
        RegexPattern { regex: Regex::new(r"^(?:[0-9]+\.[0-9]*(?:[eE][+-]?[0-9]+)?|\.[0-9]+(?:[eE][+-]?[0-9]+)?|[0-9]+[eE][+-]?[0-9]+)").unwrap(), handler: float_handler },
        RegexPattern { regex: Regex::new(r"^(?:0[xX][0-9a-fA-F]+|0[oO][0-7]+|[0-9]+)").unwrap(), handler: int_handler },
        RegexPattern { regex: Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*").unwrap(), handler: symbol_handler },
        RegexPattern { regex: Regex::new(r"^//=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::SlashSlashEquals, "//=") },
        RegexPattern { regex: Regex::new(r"^//").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::SlashSlash, "//") },
        RegexPattern { regex: Regex::new(r"^\*\*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::StarStar, "**") },
        RegexPattern { regex: Regex::new(r"^==").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Equals, "==") },
        RegexPattern { regex: Regex::new(r"^!=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=") },
        RegexPattern { regex: Regex::new(r"^<=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=") },
        RegexPattern { regex: Regex::new(r"^>=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=") },
        RegexPattern { regex: Regex::new(r"^\+=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::PlusEquals, "+=") },
        RegexPattern { regex: Regex::new(r"^-=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::MinusEquals, "-=") },
        RegexPattern { regex: Regex::new(r"^\*=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::StarEquals, "*=") },
        RegexPattern { regex: Regex::new(r"^/=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::SlashEquals, "/=") },
        RegexPattern { regex: Regex::new(r"^%=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::PercentEquals, "%=") },
        RegexPattern { regex: Regex::new(r"^\[").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenBracket, "[") },
        RegexPattern { regex: Regex::new(r"^\]").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseBracket, "]") },
        RegexPattern { regex: Regex::new(r"^\{").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{") },
        RegexPattern { regex: Regex::new(r"^\}").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}") },
        RegexPattern { regex: Regex::new(r"^\(").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(") },
        RegexPattern { regex: Regex::new(r"^\)").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")") },
        RegexPattern { regex: Regex::new(r"^=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=") },
        RegexPattern { regex: Regex::new(r"^<").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Less, "<") },
        RegexPattern { regex: Regex::new(r"^>").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Greater, ">") },
        RegexPattern { regex: Regex::new(r"^\+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Plus, "+") },
        RegexPattern { regex: Regex::new(r"^-").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Minus, "-") },
        RegexPattern { regex: Regex::new(r"^\*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Star, "*") },
        RegexPattern { regex: Regex::new(r"^/").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Slash, "/") },
        RegexPattern { regex: Regex::new(r"^%").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Percent, "%") },
        RegexPattern { regex: Regex::new(r"^\|").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Pipe, "|") },
        RegexPattern { regex: Regex::new(r"^&").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Amp, "&") },
        RegexPattern { regex: Regex::new(r"^\.").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dot, ".") },
        RegexPattern { regex: Regex::new(r"^,").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Comma, ",") },
        RegexPattern { regex: Regex::new(r"^;").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";") },
        RegexPattern { regex: Regex::new(r"^:").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Colon, ":") },
    ];
}

/// On-demand scanner for build files.
///
/// Tokens are produced one call at a time. Block structure is synthesized
/// from leading whitespace as INDENT/OUTDENT tokens, and logical lines end
/// with NEWLINE. Newlines inside brackets are ignored.
pub struct Lexer {
    source: String,
    pos: usize,
    line: u32,
    col: u32,
    file: Arc<String>,
    depth: usize,
    indents: Vec<u32>,
    at_line_start: bool,
    line_has_tokens: bool,
    pending: VecDeque<Token>,
}

impl Lexer {
    pub fn new(source: String, file: Arc<String>) -> Lexer {
        Lexer {
            source,
            pos: 0,
            line: 1,
            col: 1,
            file,
            depth: 0,
            indents: vec![0],
            at_line_start: true,
            line_has_tokens: false,
            pending: VecDeque::new(),
        }
    }

    /// Returns the next token. After the input is exhausted every call
    /// returns EOF.
    pub fn next_token(&mut self) -> Result<Token, Error> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(token);
            }
            self.scan()?;
        }
    }

    pub fn position(&self) -> Position {
        Position::new(Arc::clone(&self.file), self.line, self.col, self.pos as u32)
    }

    pub fn advance_str(&mut self, text: &str) {
        for c in text.chars() {
            if c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
        self.pos += text.len();
    }

    pub fn push(&mut self, token: Token) {
        self.pending.push_back(token);
    }

    pub fn at(&self) -> Option<char> {
        self.remainder().chars().next()
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    fn error(&self, error_impl: ErrorImpl) -> Error {
        Error::new(error_impl, self.position())
    }

    fn push_marker(&mut self, kind: TokenKind) {
        let here = self.position();
        self.push(MK_TOKEN!(kind, String::new(), Span { start: here.clone(), end: here }));
    }

    fn scan(&mut self) -> Result<(), Error> {
        if self.at_line_start && self.depth == 0 {
            self.at_line_start = false;
            if self.scan_indentation()? {
                return Ok(());
            }
        }

        self.skip_whitespace();

        let Some(c) = self.at() else {
            self.finish();
            return Ok(());
        };

        if c == '\n' {
            self.advance_str("\n");
            if self.line_has_tokens {
                self.line_has_tokens = false;
                let here = self.position();
                self.push(MK_TOKEN!(TokenKind::Newline, String::from("\n"), Span { start: here.clone(), end: here }));
            }
            self.at_line_start = true;
            return Ok(());
        }

        let found = PATTERNS.iter().find_map(|pattern| {
            pattern
                .regex
                .find(self.remainder())
                .map(|matched| (pattern.handler, matched.as_str().to_string()))
        });

        match found {
            Some((handler, matched)) => {
                handler(self, &matched)?;
                self.line_has_tokens = true;
                Ok(())
            }
            None if c == '"' || c == '\'' => Err(self.error(ErrorImpl::UnterminatedString)),
            None => Err(self.error(ErrorImpl::UnrecognisedToken { token: c.to_string() })),
        }
    }

    /// Measures the indentation of a new line and queues INDENT/OUTDENT
    /// markers. Returns true if the line was blank or comment-only and has
    /// been consumed.
    fn scan_indentation(&mut self) -> Result<bool, Error> {
        let mut width = 0;
        let mut consumed = 0;
        for c in self.remainder().chars() {
            match c {
                ' ' => width += 1,
                '\t' => width += TAB_WIDTH - width % TAB_WIDTH,
                '\x0c' => width = 0,
                _ => break,
            }
            consumed += 1;
        }
        let indentation = self.remainder()[..consumed].to_string();
        self.advance_str(&indentation);

        match self.at() {
            None => return Ok(false),
            Some('\n') | Some('\r') | Some('#') => {
                while let Some(c) = self.at() {
                    if c == '\n' {
                        break;
                    }
                    let mut buffer = [0; 4];
                    self.advance_str(c.encode_utf8(&mut buffer));
                }
                if self.at() == Some('\n') {
                    self.advance_str("\n");
                }
                self.at_line_start = true;
                return Ok(true);
            }
            _ => {}
        }

        let current = self.indents.last().copied().unwrap_or(0);
        if width > current {
            self.indents.push(width);
            self.push_marker(TokenKind::Indent);
        } else if width < current {
            while self.indents.last().is_some_and(|&level| level > width) {
                self.indents.pop();
                self.push_marker(TokenKind::Outdent);
            }
            if self.indents.last().copied().unwrap_or(0) != width {
                return Err(self.error(ErrorImpl::InconsistentIndent));
            }
        }
        Ok(false)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.at() {
            match c {
                ' ' | '\t' | '\r' | '\x0c' => self.advance_str(" "),
                '#' => {
                    let comment_len = self.remainder().find('\n').unwrap_or(self.remainder().len());
                    let comment = self.remainder()[..comment_len].to_string();
                    self.advance_str(&comment);
                }
                '\\' if self.remainder().starts_with("\\\n") => self.advance_str("\\\n"),
                '\\' if self.remainder().starts_with("\\\r\n") => self.advance_str("\\\r\n"),
                '\n' if self.depth > 0 => self.advance_str("\n"),
                _ => break,
            }
        }
    }

    fn finish(&mut self) {
        if self.line_has_tokens && self.depth == 0 {
            self.line_has_tokens = false;
            self.push_marker(TokenKind::Newline);
        }
        while self.indents.len() > 1 {
            self.indents.pop();
            self.push_marker(TokenKind::Outdent);
        }
        self.push_marker(TokenKind::EOF);
    }
}

fn string_handler(lexer: &mut Lexer, matched: &str) -> Result<(), Error> {
    let start = lexer.position();

    let raw = matched.starts_with(['r', 'R']);
    let quoted = if raw { &matched[1..] } else { matched };
    let quote_len = if quoted.starts_with("\"\"\"") || quoted.starts_with("'''") { 3 } else { 1 };
    let body = &quoted[quote_len..quoted.len() - quote_len];

    let value = if raw { body.to_string() } else { unescape(body) };

    lexer.advance_str(matched);
    let end = lexer.position();
    lexer.push(MK_TOKEN!(TokenKind::String, matched.to_string(), LiteralValue::String(value), Span { start, end }));
    Ok(())
}

/// Decodes backslash escapes. Unknown escapes keep their backslash.
///
/// String values are text, so `\xhh` and octal escapes yield the code point
/// of that number (`\xff` is U+00FF), not a raw byte.
fn unescape(body: &str) -> String {
    let mut result = String::new();
    let mut chars = body.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        let Some(&next_ch) = chars.peek() else {
            result.push(ch); // Keep the lone backslash
            break;
        };

        match next_ch {
            'n' => result.push('\n'),
            't' => result.push('\t'),
            'r' => result.push('\r'),
            'a' => result.push('\x07'),
            'b' => result.push('\x08'),
            'f' => result.push('\x0c'),
            'v' => result.push('\x0b'),
            '\\' => result.push('\\'),
            '\'' => result.push('\''),
            '"' => result.push('"'),
            '\n' => {} // line continuation
            '0'..='7' => {
                let mut octal = String::new();
                while octal.len() < 3 {
                    match chars.peek() {
                        Some(c @ '0'..='7') => {
                            octal.push(*c);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                if let Some(decoded) = u32::from_str_radix(&octal, 8).ok().and_then(char::from_u32) {
                    result.push(decoded);
                }
                continue;
            }
            'x' => {
                chars.next();
                let mut hex = String::new();
                while hex.len() < 2 {
                    match chars.peek() {
                        Some(c) if c.is_ascii_hexdigit() => {
                            hex.push(*c);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                match u8::from_str_radix(&hex, 16) {
                    Ok(byte) => result.push(byte as char),
                    Err(_) => {
                        result.push_str("\\x");
                        result.push_str(&hex);
                    }
                }
                continue;
            }
            _ => {
                result.push(ch); // Keep the backslash
                continue;
            }
        }
        chars.next();
    }

    result
}

fn float_handler(lexer: &mut Lexer, matched: &str) -> Result<(), Error> {
    let start = lexer.position();
    let value: f64 = matched
        .parse()
        .map_err(|_| Error::new(ErrorImpl::FloatParseError { token: matched.to_string() }, start.clone()))?;

    lexer.advance_str(matched);
    let end = lexer.position();
    lexer.push(MK_TOKEN!(TokenKind::Float, matched.to_string(), LiteralValue::Float(value), Span { start, end }));
    Ok(())
}

fn int_handler(lexer: &mut Lexer, matched: &str) -> Result<(), Error> {
    let start = lexer.position();

    let (digits, radix) = if let Some(hex) = matched.strip_prefix("0x").or_else(|| matched.strip_prefix("0X")) {
        (hex, 16)
    } else if let Some(octal) = matched.strip_prefix("0o").or_else(|| matched.strip_prefix("0O")) {
        (octal, 8)
    } else if matched.len() > 1 && matched.starts_with('0') {
        (&matched[1..], 8)
    } else {
        (matched, 10)
    };

    let value = i64::from_str_radix(digits, radix)
        .map_err(|_| Error::new(ErrorImpl::NumberParseError { token: matched.to_string() }, start.clone()))?;

    lexer.advance_str(matched);
    let end = lexer.position();
    lexer.push(MK_TOKEN!(TokenKind::Int, matched.to_string(), LiteralValue::Int(value), Span { start, end }));
    Ok(())
}

fn symbol_handler(lexer: &mut Lexer, matched: &str) -> Result<(), Error> {
    let start = lexer.position();
    lexer.advance_str(matched);
    let end = lexer.position();

    let kind = RESERVED_LOOKUP.get(matched).copied().unwrap_or(TokenKind::Identifier);
    lexer.push(MK_TOKEN!(kind, matched.to_string(), Span { start, end }));
    Ok(())
}

/// Scans a whole input, returning every token up to and including EOF.
pub fn tokenize<'a>(file: &str, source: impl Into<Source<'a>>) -> Result<Vec<Token>, Error> {
    let file = Arc::new(file.to_string());
    let text = source.into().read(&file)?;
    let mut lex = Lexer::new(text, file);

    let mut tokens = vec![];
    loop {
        let token = lex.next_token()?;
        trace!(kind = %token.kind, position = %token.span.start, "token");
        let done = token.kind == TokenKind::EOF;
        tokens.push(token);
        if done {
            break;
        }
    }

    Ok(tokens)
}
