//! Primary expressions and their suffixes.
//!
//! ```text
//! primary_with_suffix = primary ('.' IDENT | slice_suffix | call_suffix)*
//! primary = IDENT | INT | FLOAT | STRING
//!         | '[' ...          list literal or comprehension
//!         | '{' ...          dict literal or comprehension
//!         | '(' ...          tuple or parenthesized expression
//!         | ('-' | '+') primary_with_suffix
//! ```

use crate::{
    ast::{
        ast::Expr,
        expressions::{
            CallExpr, Clause, Comprehension, DictEntry, DictExpr, DotExpr, ForClause, Ident,
            IfClause, IndexExpr, ListExpr, Literal, SliceExpr, TupleExpr, UnaryExpr, BinaryExpr,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Position,
};

use super::{
    expr::{parse_expr, parse_exprs, parse_test, parse_test_prec, terminates_expr_list},
    parser::Parser,
};

pub fn parse_ident(parser: &mut Parser) -> Result<Ident, Error> {
    if parser.current_token_kind() != TokenKind::Identifier {
        return Err(parser.error(ErrorImpl::NotAnIdentifier));
    }
    let token = parser.advance()?;
    Ok(Ident {
        name: token.value,
        span: token.span,
    })
}

pub fn parse_primary_with_suffix(parser: &mut Parser) -> Result<Expr, Error> {
    parser.enter()?;
    let result = parse_suffixes(parser);
    parser.leave();
    result
}

fn parse_suffixes(parser: &mut Parser) -> Result<Expr, Error> {
    let mut x = parse_primary(parser)?;
    loop {
        x = match parser.current_token_kind() {
            TokenKind::Dot => {
                let dot = parser.advance()?.span.start;
                let name = parse_ident(parser)?;
                Expr::Dot(DotExpr {
                    x: Box::new(x),
                    dot,
                    name,
                })
            }
            TokenKind::OpenBracket => parse_slice_suffix(parser, x)?,
            TokenKind::OpenParen => parse_call_suffix(parser, x)?,
            _ => return Ok(x),
        };
    }
}

/// Parses `[y]` or `[lo:hi:step]` after `x`.
fn parse_slice_suffix(parser: &mut Parser, x: Expr) -> Result<Expr, Error> {
    let lbrack = parser.advance()?.span.start;
    let mut lo = None;
    let mut hi = None;
    let mut step = None;

    if parser.current_token_kind() != TokenKind::Colon {
        let y = parse_expr(parser, false)?;

        if parser.current_token_kind() == TokenKind::CloseBracket {
            let rbrack = parser.advance()?.span.start;
            return Ok(Expr::Index(IndexExpr {
                x: Box::new(x),
                lbrack,
                y: Box::new(y),
                rbrack,
            }));
        }

        lo = Some(Box::new(y));
    }

    if parser.current_token_kind() == TokenKind::Colon {
        parser.advance()?;
        if !matches!(parser.current_token_kind(), TokenKind::Colon | TokenKind::CloseBracket) {
            hi = Some(Box::new(parse_test(parser)?));
        }
    }
    if parser.current_token_kind() == TokenKind::Colon {
        parser.advance()?;
        if parser.current_token_kind() != TokenKind::CloseBracket {
            step = Some(Box::new(parse_test(parser)?));
        }
    }
    let rbrack = parser.expect(TokenKind::CloseBracket)?.span.start;

    Ok(Expr::Slice(SliceExpr {
        x: Box::new(x),
        lbrack,
        lo,
        hi,
        step,
        rbrack,
    }))
}

fn parse_call_suffix(parser: &mut Parser, func: Expr) -> Result<Expr, Error> {
    let lparen = parser.expect(TokenKind::OpenParen)?.span.start;
    let args = if parser.current_token_kind() == TokenKind::CloseParen {
        vec![]
    } else {
        parse_args(parser)?
    };
    let rparen = parser.expect(TokenKind::CloseParen)?.span.start;

    Ok(Expr::Call(CallExpr {
        func: Box::new(func),
        lparen,
        args,
        rparen,
    }))
}

/// Parses call arguments, mirroring `parse_params`.
///
/// Keyword arguments are parsed as `test '=' test` and the left side is
/// then checked to be an identifier, which keeps the grammar LL(1).
fn parse_args(parser: &mut Parser) -> Result<Vec<Expr>, Error> {
    let mut args = vec![];
    let mut stars = false;

    while !matches!(parser.current_token_kind(), TokenKind::CloseParen | TokenKind::EOF) {
        if !args.is_empty() {
            parser.expect(TokenKind::Comma)?;
        }
        if parser.current_token_kind() == TokenKind::CloseParen {
            if stars {
                return Err(parser.unexpected("argument"));
            }
            break;
        }

        // *args, **kwargs
        if matches!(parser.current_token_kind(), TokenKind::Star | TokenKind::StarStar) {
            stars = true;
            let star = parser.advance()?;
            let x = parse_test(parser)?;
            args.push(Expr::Unary(UnaryExpr {
                op_pos: star.span.start,
                op: star.kind,
                x: Box::new(x),
            }));
            continue;
        }

        let mut x = parse_test(parser)?;

        if parser.current_token_kind() == TokenKind::Assignment {
            if x.as_ident().is_none() {
                return Err(parser.error(ErrorImpl::KeywordArgumentForm));
            }
            let eq = parser.advance()?.span.start;
            let y = parse_test(parser)?;
            x = Expr::Binary(BinaryExpr {
                x: Box::new(x),
                op_pos: eq,
                op: TokenKind::Assignment,
                y: Box::new(y),
            });
        }

        args.push(x);
    }

    Ok(args)
}

pub fn parse_primary(parser: &mut Parser) -> Result<Expr, Error> {
    match parser.current_token_kind() {
        TokenKind::Identifier => Ok(Expr::Ident(parse_ident(parser)?)),

        TokenKind::Int | TokenKind::Float | TokenKind::String => {
            let token = parser.advance()?;
            match token.literal {
                Some(value) => Ok(Expr::Literal(Literal {
                    token: token.kind,
                    raw: token.value,
                    value,
                    span: token.span,
                })),
                None => Err(Error::new(
                    ErrorImpl::InvalidLiteral { token: token.value },
                    token.span.start,
                )),
            }
        }

        TokenKind::OpenBracket => parse_list(parser),

        TokenKind::OpenCurly => parse_dict(parser),

        TokenKind::OpenParen => {
            let lparen = parser.advance()?.span.start;
            if parser.current_token_kind() == TokenKind::CloseParen {
                let rparen = parser.advance()?.span.start;
                return Ok(Expr::Tuple(TupleExpr {
                    lparen: Some(lparen),
                    list: vec![],
                    rparen: Some(rparen),
                }));
            }

            let e = parse_expr(parser, true)?;
            let rparen = parser.expect(TokenKind::CloseParen)?.span.start;

            // A comma inside the parentheses made this a tuple.
            Ok(match e {
                Expr::Tuple(TupleExpr { list, lparen: None, .. }) => Expr::Tuple(TupleExpr {
                    lparen: Some(lparen),
                    list,
                    rparen: Some(rparen),
                }),
                e => e,
            })
        }

        TokenKind::Minus | TokenKind::Plus => {
            let op = parser.advance()?;
            let x = parse_primary_with_suffix(parser)?;
            Ok(Expr::Unary(UnaryExpr {
                op_pos: op.span.start,
                op: op.kind,
                x: Box::new(x),
            }))
        }

        _ => Err(parser.unexpected("primary expression")),
    }
}

/// ```text
/// list = '[' ']'
///      | '[' test (',' test)* ','? ']'
///      | '[' test comp_suffix
/// ```
fn parse_list(parser: &mut Parser) -> Result<Expr, Error> {
    let lbrack = parser.advance()?.span.start;
    if parser.current_token_kind() == TokenKind::CloseBracket {
        let rbrack = parser.advance()?.span.start;
        return Ok(Expr::List(ListExpr {
            lbrack,
            list: vec![],
            rbrack,
        }));
    }

    let x = parse_test(parser)?;

    if parser.current_token_kind() == TokenKind::For {
        return parse_comprehension_suffix(parser, lbrack, x, TokenKind::CloseBracket);
    }

    let mut list = vec![x];
    if parser.current_token_kind() == TokenKind::Comma {
        list = parse_exprs(parser, list, true)?;
    }

    let rbrack = parser.expect(TokenKind::CloseBracket)?.span.start;
    Ok(Expr::List(ListExpr { lbrack, list, rbrack }))
}

/// ```text
/// dict = '{' '}'
///      | '{' entry (',' entry)* ','? '}'
///      | '{' entry comp_suffix
/// ```
fn parse_dict(parser: &mut Parser) -> Result<Expr, Error> {
    let lbrace = parser.advance()?.span.start;
    if parser.current_token_kind() == TokenKind::CloseCurly {
        let rbrace = parser.advance()?.span.start;
        return Ok(Expr::Dict(DictExpr {
            lbrace,
            list: vec![],
            rbrace,
        }));
    }

    let entry = parse_dict_entry(parser)?;

    if parser.current_token_kind() == TokenKind::For {
        return parse_comprehension_suffix(parser, lbrace, Expr::DictEntry(entry), TokenKind::CloseCurly);
    }

    let mut list = vec![entry];
    while parser.current_token_kind() == TokenKind::Comma {
        parser.advance()?;
        if parser.current_token_kind() == TokenKind::CloseCurly {
            break;
        }
        list.push(parse_dict_entry(parser)?);
    }

    let rbrace = parser.expect(TokenKind::CloseCurly)?.span.start;
    Ok(Expr::Dict(DictExpr { lbrace, list, rbrace }))
}

fn parse_dict_entry(parser: &mut Parser) -> Result<DictEntry, Error> {
    let key = parse_test(parser)?;
    let colon = parser.expect(TokenKind::Colon)?.span.start;
    let value = parse_test(parser)?;
    Ok(DictEntry {
        key: Box::new(key),
        colon,
        value: Box::new(value),
    })
}

/// Parses the `for`/`if` clauses of a comprehension up to `end`. The first
/// clause is always a `for`.
fn parse_comprehension_suffix(
    parser: &mut Parser,
    lbrack: Position,
    body: Expr,
    end: TokenKind,
) -> Result<Expr, Error> {
    let mut clauses = vec![];

    while parser.current_token_kind() != end {
        match parser.current_token_kind() {
            TokenKind::For => {
                let for_pos = parser.advance()?.span.start;
                let vars = parse_for_loop_variables(parser)?;
                let in_pos = parser.expect(TokenKind::In)?.span.start;
                // No conditional, lambda or bare tuple here: `if` belongs
                // to the comprehension.
                let x = parse_test_prec(parser, 0)?;
                clauses.push(Clause::For(ForClause {
                    for_pos,
                    vars,
                    in_pos,
                    x,
                }));
            }
            TokenKind::If => {
                let if_pos = parser.advance()?.span.start;
                // A further `if` starts the next clause.
                let cond = parse_test_prec(parser, 0)?;
                clauses.push(Clause::If(IfClause { if_pos, cond }));
            }
            _ => return Err(parser.unexpected(&format!("'{}', for, or if", end))),
        }
    }
    let rbrack = parser.advance()?.span.start;

    Ok(Expr::Comprehension(Comprehension {
        curly: end == TokenKind::CloseCurly,
        lbrack,
        body: Box::new(body),
        clauses,
        rbrack,
    }))
}

/// Parses loop variables without consuming the `in` that follows them.
///
/// ```text
/// loop_variables = primary_with_suffix (',' primary_with_suffix)* ','?
/// ```
pub fn parse_for_loop_variables(parser: &mut Parser) -> Result<Expr, Error> {
    let v = parse_primary_with_suffix(parser)?;
    if parser.current_token_kind() != TokenKind::Comma {
        return Ok(v);
    }

    let mut list = vec![v];
    while parser.current_token_kind() == TokenKind::Comma {
        parser.advance()?;
        if terminates_expr_list(parser.current_token_kind()) {
            break;
        }
        list.push(parse_primary_with_suffix(parser)?);
    }

    Ok(Expr::Tuple(TupleExpr {
        lparen: None,
        list,
        rparen: None,
    }))
}
