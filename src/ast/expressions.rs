use crate::{
    lexer::tokens::{LiteralValue, TokenKind},
    Position, Span,
};

use super::ast::{Expr, Function};

// LITERALS

/// Identifier
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    /// Creates an identifier whose span covers `name` starting at `start`.
    pub fn synthesize(name: String, start: Position) -> Self {
        let end = start.add_columns(name.chars().count() as u32);
        Ident { name, span: Span { start, end } }
    }
}

/// Literal
/// An int, float or string constant. `raw` is the source text; `value` is
/// the decoded payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub token: TokenKind,
    pub raw: String,
    pub value: LiteralValue,
    pub span: Span,
}

impl Literal {
    /// The decoded string value, if this is a string literal.
    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            LiteralValue::String(value) if self.token == TokenKind::String => Some(value),
            _ => None,
        }
    }
}

// OPERATORS

/// Unary Expression
/// `-x`, `+x`, `not x`, and `*x`/`**x` in argument and parameter lists.
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub op_pos: Position,
    pub op: TokenKind,
    pub x: Box<Expr>,
}

/// Binary Expression
/// Also used for keyword arguments and parameter defaults with `op` set to
/// `TokenKind::Assignment`.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub x: Box<Expr>,
    pub op_pos: Position,
    pub op: TokenKind,
    pub y: Box<Expr>,
}

/// Conditional Expression
/// `then_expr if cond else else_expr`
#[derive(Debug, Clone, PartialEq)]
pub struct CondExpr {
    pub if_pos: Position,
    pub cond: Box<Expr>,
    pub then_expr: Box<Expr>,
    pub else_pos: Position,
    pub else_expr: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LambdaExpr {
    pub lambda: Position,
    pub function: Function,
}

// SUFFIXES

/// Dot Expression
/// `x.name`
#[derive(Debug, Clone, PartialEq)]
pub struct DotExpr {
    pub x: Box<Expr>,
    pub dot: Position,
    pub name: Ident,
}

/// Index Expression
/// `x[y]`
#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpr {
    pub x: Box<Expr>,
    pub lbrack: Position,
    pub y: Box<Expr>,
    pub rbrack: Position,
}

/// Slice Expression
/// `x[lo:hi:step]`, any component may be omitted.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceExpr {
    pub x: Box<Expr>,
    pub lbrack: Position,
    pub lo: Option<Box<Expr>>,
    pub hi: Option<Box<Expr>>,
    pub step: Option<Box<Expr>>,
    pub rbrack: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub func: Box<Expr>,
    pub lparen: Position,
    pub args: Vec<Expr>,
    pub rparen: Position,
}

// COLLECTIONS

/// Tuple Expression
/// Parentheses are absent for unparenthesized tuples such as `a, b = ...`.
#[derive(Debug, Clone, PartialEq)]
pub struct TupleExpr {
    pub lparen: Option<Position>,
    pub list: Vec<Expr>,
    pub rparen: Option<Position>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListExpr {
    pub lbrack: Position,
    pub list: Vec<Expr>,
    pub rbrack: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DictExpr {
    pub lbrace: Position,
    pub list: Vec<DictEntry>,
    pub rbrace: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DictEntry {
    pub key: Box<Expr>,
    pub colon: Position,
    pub value: Box<Expr>,
}

/// Comprehension
/// `[body for ... if ...]` or `{key: value for ...}` when `curly` is set.
/// The first clause is always a `Clause::For`.
#[derive(Debug, Clone, PartialEq)]
pub struct Comprehension {
    pub curly: bool,
    pub lbrack: Position,
    pub body: Box<Expr>,
    pub clauses: Vec<Clause>,
    pub rbrack: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    For(ForClause),
    If(IfClause),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForClause {
    pub for_pos: Position,
    pub vars: Expr,
    pub in_pos: Position,
    pub x: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfClause {
    pub if_pos: Position,
    pub cond: Expr,
}
