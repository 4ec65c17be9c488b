use std::sync::Arc;

use crate::{Position, Span};

use super::{
    expressions::{
        CallExpr, Comprehension, CondExpr, DictEntry, DictExpr, DotExpr, Ident, IndexExpr,
        LambdaExpr, ListExpr, Literal, SliceExpr, TupleExpr, UnaryExpr, BinaryExpr,
    },
    statements::{AssignStmt, BranchStmt, DefStmt, ExprStmt, ForStmt, IfStmt, LoadStmt, ReturnStmt},
};

/// Statement
///
/// Every statement form of the language. Consumers match exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Def(DefStmt),
    If(IfStmt),
    For(ForStmt),
    Return(ReturnStmt),
    Branch(BranchStmt),
    Assign(AssignStmt),
    Load(LoadStmt),
    Expr(ExprStmt),
}

/// Expression
///
/// Every expression form of the language. Consumers match exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(Ident),
    Literal(Literal),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    Cond(CondExpr),
    Lambda(LambdaExpr),
    Dot(DotExpr),
    Index(IndexExpr),
    Slice(SliceExpr),
    Call(CallExpr),
    Tuple(TupleExpr),
    List(ListExpr),
    Dict(DictExpr),
    DictEntry(DictEntry),
    Comprehension(Comprehension),
}

/// A parsed build file.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub path: Arc<String>,
    pub stmts: Vec<Stmt>,
}

/// Parameters and body shared by `def` statements and lambdas.
///
/// Parameters are `Ident`, `Binary` with `=` for defaults, or `Unary` with
/// `*`/`**`. A lambda body is a single synthetic `Return`.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub start: Position,
    pub params: Vec<Expr>,
    pub body: Vec<Stmt>,
}

fn after(pos: &Position) -> Position {
    pos.add_columns(1)
}

impl Expr {
    pub fn get_span(&self) -> Span {
        match self {
            Expr::Ident(ident) => ident.span.clone(),
            Expr::Literal(literal) => literal.span.clone(),
            Expr::Unary(unary) => Span {
                start: unary.op_pos.clone(),
                end: unary.x.get_span().end,
            },
            Expr::Binary(binary) => Span {
                start: binary.x.get_span().start,
                end: binary.y.get_span().end,
            },
            Expr::Cond(cond) => Span {
                start: cond.then_expr.get_span().start,
                end: cond.else_expr.get_span().end,
            },
            Expr::Lambda(lambda) => Span {
                start: lambda.lambda.clone(),
                end: body_end(&lambda.function.body).unwrap_or_else(|| after(&lambda.lambda)),
            },
            Expr::Dot(dot) => Span {
                start: dot.x.get_span().start,
                end: dot.name.span.end.clone(),
            },
            Expr::Index(index) => Span {
                start: index.x.get_span().start,
                end: after(&index.rbrack),
            },
            Expr::Slice(slice) => Span {
                start: slice.x.get_span().start,
                end: after(&slice.rbrack),
            },
            Expr::Call(call) => Span {
                start: call.func.get_span().start,
                end: after(&call.rparen),
            },
            Expr::Tuple(tuple) => match (&tuple.lparen, &tuple.rparen) {
                (Some(lparen), Some(rparen)) => Span {
                    start: lparen.clone(),
                    end: after(rparen),
                },
                _ => match (tuple.list.first(), tuple.list.last()) {
                    (Some(first), Some(last)) => Span {
                        start: first.get_span().start,
                        end: last.get_span().end,
                    },
                    _ => Span {
                        start: Position::null(),
                        end: Position::null(),
                    },
                },
            },
            Expr::List(list) => Span {
                start: list.lbrack.clone(),
                end: after(&list.rbrack),
            },
            Expr::Dict(dict) => Span {
                start: dict.lbrace.clone(),
                end: after(&dict.rbrace),
            },
            Expr::DictEntry(entry) => Span {
                start: entry.key.get_span().start,
                end: entry.value.get_span().end,
            },
            Expr::Comprehension(comprehension) => Span {
                start: comprehension.lbrack.clone(),
                end: after(&comprehension.rbrack),
            },
        }
    }

    pub fn as_ident(&self) -> Option<&Ident> {
        match self {
            Expr::Ident(ident) => Some(ident),
            _ => None,
        }
    }
}

fn body_end(body: &[Stmt]) -> Option<Position> {
    body.last().map(|stmt| stmt.get_span().end)
}

impl Stmt {
    pub fn get_span(&self) -> Span {
        match self {
            Stmt::Def(def) => Span {
                start: def.def.clone(),
                end: body_end(&def.function.body).unwrap_or_else(|| def.name.span.end.clone()),
            },
            Stmt::If(if_stmt) => Span {
                start: if_stmt.if_pos.clone(),
                end: body_end(&if_stmt.false_body)
                    .or_else(|| body_end(&if_stmt.true_body))
                    .unwrap_or_else(|| if_stmt.cond.get_span().end),
            },
            Stmt::For(for_stmt) => Span {
                start: for_stmt.for_pos.clone(),
                end: body_end(&for_stmt.body).unwrap_or_else(|| for_stmt.x.get_span().end),
            },
            Stmt::Return(ret) => Span {
                start: ret.return_pos.clone(),
                end: match &ret.result {
                    Some(result) => result.get_span().end,
                    None => ret.return_pos.add_columns("return".len() as u32),
                },
            },
            Stmt::Branch(branch) => Span {
                start: branch.token_pos.clone(),
                end: branch
                    .token_pos
                    .add_columns(branch.token.to_string().len() as u32),
            },
            Stmt::Assign(assign) => Span {
                start: assign.lhs.get_span().start,
                end: assign.rhs.get_span().end,
            },
            Stmt::Load(load) => Span {
                start: load.load.clone(),
                end: after(&load.rparen),
            },
            Stmt::Expr(expr) => expr.x.get_span(),
        }
    }
}
