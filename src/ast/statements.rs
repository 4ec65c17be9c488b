use crate::{lexer::tokens::TokenKind, Position};

use super::{
    ast::{Expr, Function, Stmt},
    expressions::{Ident, Literal},
};

#[derive(Debug, Clone, PartialEq)]
pub struct DefStmt {
    pub def: Position,
    pub name: Ident,
    pub function: Function,
}

/// If Statement
/// An `elif` is an `IfStmt` that is the only statement of its parent's
/// `false_body`; `else_pos` then points at the `elif` keyword.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub if_pos: Position,
    pub cond: Expr,
    pub true_body: Vec<Stmt>,
    pub else_pos: Option<Position>,
    pub false_body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub for_pos: Position,
    pub vars: Expr,
    pub x: Expr,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub return_pos: Position,
    pub result: Option<Expr>,
}

/// `break`, `continue` or `pass`, tagged by `token`.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchStmt {
    pub token: TokenKind,
    pub token_pos: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    pub lhs: Expr,
    pub op_pos: Position,
    pub op: TokenKind,
    pub rhs: Expr,
}

/// One `load` binding: the local name `to` bound to the module's `from`.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadBinding {
    pub to: Ident,
    pub from: Ident,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadStmt {
    pub load: Position,
    pub module: Literal,
    pub bindings: Vec<LoadBinding>,
    pub lparen: Position,
    pub rparen: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub x: Expr,
}
