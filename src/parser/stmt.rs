use crate::{
    ast::{
        ast::{Expr, Function, Stmt},
        expressions::{CallExpr, Ident},
        statements::{
            AssignStmt, BranchStmt, DefStmt, ExprStmt, ForStmt, IfStmt, LoadBinding, LoadStmt,
            ReturnStmt,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{
    expr::{parse_expr, parse_params, parse_test},
    parser::Parser,
    primary::{parse_for_loop_variables, parse_ident},
};

/// Parses `(NEWLINE | stmt)* EOF`.
pub fn parse_file(parser: &mut Parser) -> Result<Vec<Stmt>, Error> {
    let mut stmts = vec![];
    while parser.current_token_kind() != TokenKind::EOF {
        if parser.current_token_kind() == TokenKind::Newline {
            parser.advance()?;
            continue;
        }
        parse_stmt(parser, &mut stmts)?;
    }
    Ok(stmts)
}

/// Parses one statement onto `stmts`. A simple statement line may add
/// several.
pub fn parse_stmt(parser: &mut Parser, stmts: &mut Vec<Stmt>) -> Result<(), Error> {
    match parser.current_token_kind() {
        TokenKind::Def => stmts.push(parse_def_stmt(parser)?),
        TokenKind::If => stmts.push(parse_if_stmt(parser)?),
        TokenKind::For => stmts.push(parse_for_stmt(parser)?),
        _ => parse_simple_stmt(parser, stmts)?,
    }
    Ok(())
}

pub fn parse_def_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let def = parser.advance()?.span.start;
    let name = parse_ident(parser)?;
    parser.expect(TokenKind::OpenParen)?;
    let params = parse_params(parser)?;
    parser.expect(TokenKind::CloseParen)?;
    parser.expect(TokenKind::Colon)?;
    let body = parse_suite(parser)?;

    Ok(Stmt::Def(DefStmt {
        def: def.clone(),
        name,
        function: Function {
            start: def,
            params,
            body,
        },
    }))
}

/// Parses `if`, any `elif`s and an optional `else`.
///
/// Each `elif` becomes an `IfStmt` that is the sole statement of the
/// previous link's `false_body`.
pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let if_pos = parser.advance()?.span.start;
    let cond = parse_test(parser)?;
    parser.expect(TokenKind::Colon)?;
    let true_body = parse_suite(parser)?;

    let mut chain = vec![IfStmt {
        if_pos,
        cond,
        true_body,
        else_pos: None,
        false_body: vec![],
    }];

    while parser.current_token_kind() == TokenKind::Elif {
        let elif_pos = parser.advance()?.span.start;
        let cond = parse_test(parser)?;
        parser.expect(TokenKind::Colon)?;
        let true_body = parse_suite(parser)?;
        if let Some(tail) = chain.last_mut() {
            tail.else_pos = Some(elif_pos.clone());
        }
        chain.push(IfStmt {
            if_pos: elif_pos,
            cond,
            true_body,
            else_pos: None,
            false_body: vec![],
        });
    }

    if parser.current_token_kind() == TokenKind::Else {
        let else_pos = parser.advance()?.span.start;
        parser.expect(TokenKind::Colon)?;
        let false_body = parse_suite(parser)?;
        if let Some(tail) = chain.last_mut() {
            tail.else_pos = Some(else_pos);
            tail.false_body = false_body;
        }
    }

    // Link the chain from the tail up.
    let mut link = None;
    while let Some(mut if_stmt) = chain.pop() {
        if let Some(elif) = link.take() {
            if_stmt.false_body = vec![Stmt::If(elif)];
        }
        link = Some(if_stmt);
    }

    link.map(Stmt::If)
        .ok_or_else(|| parser.unexpected("if"))
}

pub fn parse_for_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let for_pos = parser.advance()?.span.start;
    let vars = parse_for_loop_variables(parser)?;
    parser.expect(TokenKind::In)?;
    let x = parse_expr(parser, false)?;
    parser.expect(TokenKind::Colon)?;
    let body = parse_suite(parser)?;

    Ok(Stmt::For(ForStmt {
        for_pos,
        vars,
        x,
        body,
    }))
}

/// Parses `small_stmt (';' small_stmt)* ';'? NEWLINE`.
///
/// EOF may stand in for the NEWLINE, as in `if x: pass` at end of input.
pub fn parse_simple_stmt(parser: &mut Parser, stmts: &mut Vec<Stmt>) -> Result<(), Error> {
    loop {
        stmts.push(parse_small_stmt(parser)?);
        if parser.current_token_kind() != TokenKind::Semicolon {
            break;
        }
        parser.advance()?;
        if matches!(parser.current_token_kind(), TokenKind::Newline | TokenKind::EOF) {
            break;
        }
    }

    if parser.current_token_kind() != TokenKind::EOF {
        parser.expect(TokenKind::Newline)?;
    }
    Ok(())
}

/// ```text
/// small_stmt = RETURN expr?
///            | PASS | BREAK | CONTINUE
///            | expr ('=' | '+=' | '-=' | '*=' | '/=' | '//=' | '%=') expr
///            | expr
/// ```
pub fn parse_small_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    match parser.current_token_kind() {
        TokenKind::Return => {
            let return_pos = parser.advance()?.span.start;
            let result = if matches!(
                parser.current_token_kind(),
                TokenKind::EOF | TokenKind::Newline | TokenKind::Semicolon
            ) {
                None
            } else {
                Some(parse_expr(parser, false)?)
            };
            return Ok(Stmt::Return(ReturnStmt { return_pos, result }));
        }
        TokenKind::Break | TokenKind::Continue | TokenKind::Pass => {
            let token = parser.advance()?;
            return Ok(Stmt::Branch(BranchStmt {
                token: token.kind,
                token_pos: token.span.start,
            }));
        }
        _ => {}
    }

    let x = parse_expr(parser, false)?;

    if parser.current_token_kind().is_assignment() {
        let op = parser.advance()?;
        let rhs = parse_expr(parser, false)?;
        return Ok(Stmt::Assign(AssignStmt {
            lhs: x,
            op_pos: op.span.start,
            op: op.kind,
            rhs,
        }));
    }

    // load(...) is parsed as a call wherever it appears as a statement.
    match x {
        Expr::Call(call) if is_load_call(&call) => Ok(Stmt::Load(convert_call_to_load(call)?)),
        x => Ok(Stmt::Expr(ExprStmt { x })),
    }
}

fn is_load_call(call: &CallExpr) -> bool {
    call.func.as_ident().is_some_and(|id| id.name == "load")
}

/// Rewrites a call `load("module", "a", b="c")` into a `LoadStmt`.
///
/// `load` is not a reserved word, so it cannot be told apart from an
/// ordinary call with one token of lookahead.
pub fn convert_call_to_load(call: CallExpr) -> Result<LoadStmt, Error> {
    let CallExpr {
        func,
        lparen,
        args,
        rparen,
    } = call;

    let load = func.get_span().start;

    if args.len() < 2 {
        return Err(Error::new(
            ErrorImpl::LoadOperandCount { got: args.len() },
            lparen,
        ));
    }

    let mut args = args.into_iter();
    let module = match args.next() {
        Some(Expr::Literal(literal)) if literal.as_str().is_some() => literal,
        Some(other) => {
            return Err(Error::new(ErrorImpl::LoadModuleNotString, other.get_span().start))
        }
        None => return Err(Error::new(ErrorImpl::LoadOperandCount { got: 0 }, lparen)),
    };

    let mut bindings = vec![];
    for arg in args {
        let binding = match &arg {
            // load("module", "id")
            Expr::Literal(literal) => literal.as_str().map(|name| {
                let id = Ident::synthesize(name.to_string(), literal.span.start.add_columns(1));
                LoadBinding { to: id.clone(), from: id }
            }),
            // load("module", to="from")
            Expr::Binary(binary) if binary.op == TokenKind::Assignment => {
                match (binary.x.as_ident(), binary.y.as_ref()) {
                    (Some(to), Expr::Literal(literal)) => literal.as_str().map(|name| LoadBinding {
                        to: to.clone(),
                        from: Ident::synthesize(name.to_string(), literal.span.start.add_columns(1)),
                    }),
                    _ => None,
                }
            }
            _ => None,
        };

        match binding {
            Some(binding) => bindings.push(binding),
            None => return Err(Error::new(ErrorImpl::LoadOperandForm, arg.get_span().start)),
        }
    }

    Ok(LoadStmt {
        load,
        module,
        bindings,
        lparen,
        rparen,
    })
}

/// Parses the block after a `:`.
///
/// ```text
/// suite = simple_stmt | NEWLINE INDENT stmt+ OUTDENT
/// ```
pub fn parse_suite(parser: &mut Parser) -> Result<Vec<Stmt>, Error> {
    parser.enter()?;
    let result = parse_block(parser);
    parser.leave();
    result
}

fn parse_block(parser: &mut Parser) -> Result<Vec<Stmt>, Error> {
    let mut stmts = vec![];

    if parser.current_token_kind() == TokenKind::Newline {
        parser.advance()?;
        parser.expect(TokenKind::Indent)?;
        while !matches!(parser.current_token_kind(), TokenKind::Outdent | TokenKind::EOF) {
            parse_stmt(parser, &mut stmts)?;
        }
        parser.expect(TokenKind::Outdent)?;
        return Ok(stmts);
    }

    parse_simple_stmt(parser, &mut stmts)?;
    Ok(stmts)
}
