//! Expression grammar: tuples, `test`, lambda, the conditional operator and
//! precedence climbing over the binary operators.

use crate::{
    ast::{
        ast::{Expr, Function, Stmt},
        expressions::{BinaryExpr, CondExpr, LambdaExpr, Literal, TupleExpr, UnaryExpr},
        statements::ReturnStmt,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{LiteralValue, TokenKind},
    Position, Span,
};

use super::{
    lookups::{comparison_level, level_count, not_level, precedence},
    parser::Parser,
    primary::{parse_ident, parse_primary_with_suffix},
};

/// Parses an expression, possibly a comma-separated list of `test`s that
/// forms an unparenthesized tuple.
///
/// Callers that must tell `f(x, y)` from `f((x, y))` use `parse_test`.
pub fn parse_expr(parser: &mut Parser, in_parens: bool) -> Result<Expr, Error> {
    let x = parse_test(parser)?;
    if parser.current_token_kind() != TokenKind::Comma {
        return Ok(x);
    }

    let list = parse_exprs(parser, vec![x], in_parens)?;
    Ok(Expr::Tuple(TupleExpr {
        lparen: None,
        list,
        rparen: None,
    }))
}

/// Parses `(',' test)* ','?` onto `exprs`, starting at a comma.
pub fn parse_exprs(
    parser: &mut Parser,
    mut exprs: Vec<Expr>,
    allow_trailing_comma: bool,
) -> Result<Vec<Expr>, Error> {
    while parser.current_token_kind() == TokenKind::Comma {
        let comma = parser.advance()?;
        if terminates_expr_list(parser.current_token_kind()) {
            if !allow_trailing_comma {
                return Err(Error::new(ErrorImpl::TupleTrailingComma, comma.span.start));
            }
            break;
        }
        exprs.push(parse_test(parser)?);
    }
    Ok(exprs)
}

/// True for tokens that may follow the last element of an expression list.
pub fn terminates_expr_list(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::EOF
            | TokenKind::Newline
            | TokenKind::Assignment
            | TokenKind::CloseCurly
            | TokenKind::CloseBracket
            | TokenKind::CloseParen
            | TokenKind::Semicolon
    )
}

/// Parses a `test`: a lambda, or a binary expression optionally followed
/// by `if cond else other`.
pub fn parse_test(parser: &mut Parser) -> Result<Expr, Error> {
    parser.enter()?;
    let result = parse_test_inner(parser);
    parser.leave();
    result
}

fn parse_test_inner(parser: &mut Parser) -> Result<Expr, Error> {
    if parser.current_token_kind() == TokenKind::Lambda {
        return parse_lambda(parser);
    }

    let x = parse_test_prec(parser, 0)?;

    if parser.current_token_kind() != TokenKind::If {
        return Ok(x);
    }

    let if_pos = parser.advance()?.span.start;
    let cond = parse_test_prec(parser, 0)?;
    if parser.current_token_kind() != TokenKind::Else {
        return Err(Error::new(ErrorImpl::MissingElse, if_pos));
    }
    let else_pos = parser.advance()?.span.start;
    let else_expr = parse_test(parser)?;

    Ok(Expr::Cond(CondExpr {
        if_pos,
        cond: Box::new(cond),
        then_expr: Box::new(x),
        else_pos,
        else_expr: Box::new(else_expr),
    }))
}

fn parse_lambda(parser: &mut Parser) -> Result<Expr, Error> {
    let lambda = parser.advance()?.span.start;

    let params = if parser.current_token_kind() != TokenKind::Colon {
        parse_params(parser)?
    } else {
        vec![]
    };
    parser.expect(TokenKind::Colon)?;

    let body = parse_test(parser)?;
    let return_pos = body.get_span().start;

    Ok(Expr::Lambda(LambdaExpr {
        lambda: lambda.clone(),
        function: Function {
            start: lambda,
            params,
            body: vec![Stmt::Return(ReturnStmt {
                return_pos,
                result: Some(body),
            })],
        },
    }))
}

/// Parses the unary `not` at its own level, or a binary expression.
pub fn parse_test_prec(parser: &mut Parser, prec: usize) -> Result<Expr, Error> {
    if prec >= level_count() {
        return parse_primary_with_suffix(parser);
    }

    if parser.current_token_kind() == TokenKind::Not && prec == not_level() {
        let op_pos = parser.advance()?.span.start;
        let x = parse_test_prec(parser, prec + 1)?;
        return Ok(Expr::Unary(UnaryExpr {
            op_pos,
            op: TokenKind::Not,
            x: Box::new(x),
        }));
    }

    parse_binop_expr(parser, prec)
}

/// Precedence climbing: operands are parsed one level up, then operators of
/// at least `prec` are folded in left to right.
fn parse_binop_expr(parser: &mut Parser, prec: usize) -> Result<Expr, Error> {
    let mut x = parse_test_prec(parser, prec + 1)?;
    let mut first = true;

    loop {
        if parser.current_token_kind() == TokenKind::Not {
            // Here `not` must be the first half of `not in`.
            parser.advance()?;
            if parser.current_token_kind() != TokenKind::In {
                return Err(parser.unexpected("in"));
            }
            parser.merge_not_in();
        }

        let op = parser.current_token_kind();
        let Some(op_prec) = precedence(op).filter(|&level| level >= prec) else {
            return Ok(x);
        };

        if !first && op_prec == comparison_level() {
            let left = match &x {
                Expr::Binary(binary) => binary.op,
                _ => op,
            };
            return Err(parser.error(ErrorImpl::NonAssociative { left, right: op }));
        }

        let op_pos = parser.advance()?.span.start;
        let y = parse_test_prec(parser, op_prec + 1)?;
        x = make_binary_expr(op, op_pos, x, y);
        first = false;
    }
}

/// Builds a binary node, folding `"a" + "b"` into one string literal.
pub fn make_binary_expr(op: TokenKind, op_pos: Position, x: Expr, y: Expr) -> Expr {
    if op == TokenKind::Plus {
        if let (Expr::Literal(left), Expr::Literal(right)) = (&x, &y) {
            if let (Some(a), Some(b)) = (left.as_str(), right.as_str()) {
                // The span of the folded literal covers both operands.
                return Expr::Literal(Literal {
                    token: TokenKind::String,
                    raw: format!("{} + {}", left.raw, right.raw),
                    value: LiteralValue::String(format!("{}{}", a, b)),
                    span: Span {
                        start: left.span.start.clone(),
                        end: right.span.end.clone(),
                    },
                });
            }
        }
    }

    Expr::Binary(BinaryExpr {
        x: Box::new(x),
        op_pos,
        op,
        y: Box::new(y),
    })
}

/// Parses a parameter list up to, but not including, `)` or `:`.
///
/// ```text
/// params = (param COMMA)* param COMMA?
/// param  = IDENT | IDENT '=' test | '*' IDENT | '**' IDENT
/// ```
///
/// A trailing comma is only allowed if no `*` or `**` parameter appeared.
pub fn parse_params(parser: &mut Parser) -> Result<Vec<Expr>, Error> {
    let mut params = vec![];
    let mut stars = false;

    while !matches!(
        parser.current_token_kind(),
        TokenKind::CloseParen | TokenKind::Colon | TokenKind::EOF
    ) {
        if !params.is_empty() {
            parser.expect(TokenKind::Comma)?;
        }
        if parser.current_token_kind() == TokenKind::CloseParen {
            if stars {
                return Err(parser.unexpected("parameter"));
            }
            break;
        }

        // *args, **kwargs
        if matches!(parser.current_token_kind(), TokenKind::Star | TokenKind::StarStar) {
            stars = true;
            let star = parser.advance()?;
            let id = parse_ident(parser)?;
            params.push(Expr::Unary(UnaryExpr {
                op_pos: star.span.start,
                op: star.kind,
                x: Box::new(Expr::Ident(id)),
            }));
            continue;
        }

        let id = parse_ident(parser)?;
        if parser.current_token_kind() == TokenKind::Assignment {
            let eq = parser.advance()?.span.start;
            let default = parse_test(parser)?;
            params.push(Expr::Binary(BinaryExpr {
                x: Box::new(Expr::Ident(id)),
                op_pos: eq,
                op: TokenKind::Assignment,
                y: Box::new(default),
            }));
            continue;
        }

        params.push(Expr::Ident(id));
    }

    Ok(params)
}
