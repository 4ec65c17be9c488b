//! Unit tests for the parser module.
//!
//! This module contains tests for parsing the language constructs including:
//! - Operator precedence and non-associative comparisons
//! - Tuples, parenthesized expressions, lists, dicts and comprehensions
//! - Calls, parameters, slices and lambdas
//! - def / if / elif / else / for statements and suites
//! - The load statement rewrite
//!
//! Shapes are compared through a compact s-expression rendering.

use crate::{
    ast::{
        ast::{Expr, Function, Stmt},
        expressions::Clause,
    },
    errors::errors::ErrorKind,
    lexer::tokens::{LiteralValue, TokenKind},
};

use super::parser::{parse_expression, parse_module, MAX_NESTING};

fn sexpr(expr: &Expr) -> String {
    match expr {
        Expr::Ident(ident) => ident.name.clone(),
        Expr::Literal(literal) => match &literal.value {
            LiteralValue::String(value) => format!("{:?}", value),
            _ => literal.raw.clone(),
        },
        Expr::Unary(unary) => format!("({} {})", unary.op, sexpr(&unary.x)),
        Expr::Binary(binary) => format!("({} {} {})", binary.op, sexpr(&binary.x), sexpr(&binary.y)),
        Expr::Cond(cond) => format!(
            "(if {} {} {})",
            sexpr(&cond.cond),
            sexpr(&cond.then_expr),
            sexpr(&cond.else_expr)
        ),
        Expr::Lambda(lambda) => format!("(lambda {})", function(&lambda.function)),
        Expr::Dot(dot) => format!("(. {} {})", sexpr(&dot.x), dot.name.name),
        Expr::Index(index) => format!("(index {} {})", sexpr(&index.x), sexpr(&index.y)),
        Expr::Slice(slice) => {
            let part = |e: &Option<Box<Expr>>| e.as_ref().map_or("_".to_string(), |e| sexpr(e));
            format!(
                "(slice {} {} {} {})",
                sexpr(&slice.x),
                part(&slice.lo),
                part(&slice.hi),
                part(&slice.step)
            )
        }
        Expr::Call(call) => {
            let mut out = format!("(call {}", sexpr(&call.func));
            for arg in &call.args {
                out.push(' ');
                out.push_str(&sexpr(arg));
            }
            out + ")"
        }
        Expr::Tuple(tuple) => list("tuple", &tuple.list),
        Expr::List(list_expr) => list("list", &list_expr.list),
        Expr::Dict(dict) => {
            let mut out = String::from("(dict");
            for entry in &dict.list {
                out.push_str(&format!(" ({} {})", sexpr(&entry.key), sexpr(&entry.value)));
            }
            out + ")"
        }
        Expr::DictEntry(entry) => format!("(entry {} {})", sexpr(&entry.key), sexpr(&entry.value)),
        Expr::Comprehension(comp) => {
            let mut out = format!(
                "({} {}",
                if comp.curly { "dictcomp" } else { "listcomp" },
                sexpr(&comp.body)
            );
            for clause in &comp.clauses {
                match clause {
                    Clause::For(f) => out.push_str(&format!(" (for {} {})", sexpr(&f.vars), sexpr(&f.x))),
                    Clause::If(i) => out.push_str(&format!(" (if {})", sexpr(&i.cond))),
                }
            }
            out + ")"
        }
    }
}

fn list(tag: &str, items: &[Expr]) -> String {
    let mut out = format!("({}", tag);
    for item in items {
        out.push(' ');
        out.push_str(&sexpr(item));
    }
    out + ")"
}

fn function(function: &Function) -> String {
    format!("{} {}", list("params", &function.params), block(&function.body))
}

fn block(stmts: &[Stmt]) -> String {
    let parts: Vec<String> = stmts.iter().map(stmt).collect();
    format!("{{{}}}", parts.join("; "))
}

fn stmt(stmt: &Stmt) -> String {
    match stmt {
        Stmt::Def(def) => format!("(def {} {})", def.name.name, function(&def.function)),
        Stmt::If(if_stmt) => format!(
            "(if {} {} {})",
            sexpr(&if_stmt.cond),
            block(&if_stmt.true_body),
            block(&if_stmt.false_body)
        ),
        Stmt::For(for_stmt) => format!(
            "(for {} {} {})",
            sexpr(&for_stmt.vars),
            sexpr(&for_stmt.x),
            block(&for_stmt.body)
        ),
        Stmt::Return(ret) => match &ret.result {
            Some(result) => format!("(return {})", sexpr(result)),
            None => String::from("(return)"),
        },
        Stmt::Branch(branch) => branch.token.to_string(),
        Stmt::Assign(assign) => format!("({} {} {})", assign.op, sexpr(&assign.lhs), sexpr(&assign.rhs)),
        Stmt::Load(load) => {
            let mut out = format!("(load {:?}", load.module.as_str().unwrap_or_default());
            for binding in &load.bindings {
                out.push_str(&format!(" ({} {})", binding.to.name, binding.from.name));
            }
            out + ")"
        }
        Stmt::Expr(expr) => sexpr(&expr.x),
    }
}

fn expr(source: &str) -> String {
    sexpr(&parse_expression("test.sky", source).unwrap())
}

fn module(source: &str) -> String {
    block(&parse_module("test.sky", source).unwrap().stmts)
}

fn expr_error(source: &str) -> String {
    parse_expression("test.sky", source).unwrap_err().message()
}

fn module_error(source: &str) -> String {
    parse_module("test.sky", source).unwrap_err().message()
}

// Precedence

#[test]
fn test_or_binds_looser_than_and() {
    assert_eq!(expr("a or b and c"), "(or a (and b c))");
    assert_eq!(expr("a and b or c"), "(or (and a b) c)");
}

#[test]
fn test_arithmetic_precedence() {
    assert_eq!(expr("a + b * c"), "(+ a (* b c))");
    assert_eq!(expr("a * b + c"), "(+ (* a b) c)");
    assert_eq!(expr("a - b - c"), "(- (- a b) c)");
    assert_eq!(expr("a // b % c"), "(% (// a b) c)");
    assert_eq!(expr("a | b & c"), "(| a (& b c))");
    assert_eq!(expr("a & b + c"), "(& a (+ b c))");
}

#[test]
fn test_unary_binds_tighter_than_binary() {
    assert_eq!(expr("-a * b"), "(* (- a) b)");
    assert_eq!(expr("a * -b"), "(* a (- b))");
    assert_eq!(expr("-a.b(c)"), "(- (call (. a b) c))");
    assert_eq!(expr("+1 - -2"), "(- (+ 1) (- 2))");
}

#[test]
fn test_not_precedence() {
    assert_eq!(expr("not a == b"), "(not (== a b))");
    assert_eq!(expr("not a and b"), "(and (not a) b)");
    assert_eq!(expr("a and not b"), "(and a (not b))");
    assert_eq!(expr("not (not a)"), "(not (not a))");
    assert_eq!(expr_error("not not a"), "got not, want primary expression");
}

#[test]
fn test_not_in() {
    assert_eq!(expr("a not in b"), "(not in a b)");
    assert_eq!(expr("a in b"), "(in a b)");
    assert_eq!(expr("a + 1 not in b or c"), "(or (not in (+ a 1) b) c)");
    assert_eq!(expr_error("a not b"), "got identifier, want in");
}

#[test]
fn test_conditional_expression() {
    assert_eq!(expr("x if c else y"), "(if c x y)");
    assert_eq!(expr("a or b if c else d"), "(if c (or a b) d)");
    assert_eq!(expr("x if a else y if b else z"), "(if a x (if b y z))");
    assert_eq!(expr_error("x if c"), "conditional expression without else clause");
}

// Non-associativity

#[test]
fn test_chained_comparison_is_error() {
    let error = parse_expression("test.sky", "a < b < c").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Syntax);
    assert_eq!(error.message(), "< does not associate with < (use parens)");
    assert_eq!(error.get_position().col, 7);

    assert_eq!(expr_error("a < b == c"), "< does not associate with == (use parens)");
    assert_eq!(expr_error("a in b not in c"), "in does not associate with not in (use parens)");
}

#[test]
fn test_parenthesized_comparison_is_fine() {
    assert_eq!(expr("(a < b) == c"), "(== (< a b) c)");
    assert_eq!(expr("a < b and b < c"), "(and (< a b) (< b c))");
    assert_eq!(expr("a | b < c & d"), "(< (| a b) (& c d))");
}

// Tuples and grouping

#[test]
fn test_parenthesized_expression_is_not_tuple() {
    assert_eq!(expr("(1)"), "1");
    assert_eq!(expr("((a + b))"), "(+ a b)");
}

#[test]
fn test_tuples() {
    assert_eq!(expr("(1,)"), "(tuple 1)");
    assert_eq!(expr("()"), "(tuple)");
    assert_eq!(expr("(1, 2, 3,)"), "(tuple 1 2 3)");
    assert_eq!(expr("((1, 2))"), "(tuple 1 2)");
}

#[test]
fn test_parenthesized_tuple_keeps_parens() {
    match parse_expression("test.sky", "(a, b)").unwrap() {
        Expr::Tuple(tuple) => {
            assert_eq!(tuple.lparen.map(|p| p.col), Some(1));
            assert_eq!(tuple.rparen.map(|p| p.col), Some(6));
        }
        other => panic!("expected tuple, got {:?}", other),
    }
}

#[test]
fn test_unparenthesized_tuple_statement() {
    assert_eq!(module("1, 2\n"), "{(tuple 1 2)}");
    assert_eq!(module("a, b = b, a\n"), "{(= (tuple a b) (tuple b a))}");
}

#[test]
fn test_unparenthesized_tuple_trailing_comma() {
    let error = parse_module("test.sky", "1, 2,\n").unwrap_err();
    assert_eq!(error.message(), "unparenthesized tuple with trailing comma");
    assert_eq!(error.get_position().col, 5);
    assert_eq!(module_error("x = 1, 2,\n"), "unparenthesized tuple with trailing comma");
}

// Primaries and suffixes

#[test]
fn test_literals() {
    assert_eq!(expr("42"), "42");
    assert_eq!(expr("0x10"), "0x10");
    assert_eq!(expr("1.5"), "1.5");
    assert_eq!(expr("'hi'"), "\"hi\"");

    match parse_expression("test.sky", "0x10").unwrap() {
        Expr::Literal(literal) => {
            assert_eq!(literal.token, TokenKind::Int);
            assert_eq!(literal.value, LiteralValue::Int(16));
        }
        other => panic!("expected literal, got {:?}", other),
    }
}

#[test]
fn test_string_concatenation_folds() {
    match parse_expression("test.sky", "\"a\" + \"b\"").unwrap() {
        Expr::Literal(literal) => {
            assert_eq!(literal.token, TokenKind::String);
            assert_eq!(literal.value, LiteralValue::String("ab".to_string()));
        }
        other => panic!("expected literal, got {:?}", other),
    }
    assert_eq!(expr("'a' + 'b' + 'c'"), "\"abc\"");
    assert_eq!(expr("'a' + b"), "(+ \"a\" b)");
    assert_eq!(expr("'a' * 'b'"), "(* \"a\" \"b\")");
    assert_eq!(expr("1 + 2"), "(+ 1 2)");
}

#[test]
fn test_suffix_chain() {
    assert_eq!(expr("a.b.c"), "(. (. a b) c)");
    assert_eq!(expr("f(x)(y)"), "(call (call f x) y)");
    assert_eq!(expr("a.b[0].c()"), "(call (. (index (. a b) 0) c))");
    assert_eq!(expr_error("a.(b)"), "not an identifier");
}

#[test]
fn test_index_and_slice() {
    assert_eq!(expr("x[a]"), "(index x a)");
    assert_eq!(expr("x[a, b]"), "(index x (tuple a b))");
    assert_eq!(expr("x[1:2]"), "(slice x 1 2 _)");
    assert_eq!(expr("x[:]"), "(slice x _ _ _)");
    assert_eq!(expr("x[::2]"), "(slice x _ _ 2)");
    assert_eq!(expr("x[1:]"), "(slice x 1 _ _)");
    assert_eq!(expr("x[:-1]"), "(slice x _ (- 1) _)");
    assert_eq!(expr("x[1:2:3]"), "(slice x 1 2 3)");
    assert_eq!(expr_error("x[1:2:3:4]"), "got :, want ]");
}

#[test]
fn test_call_arguments() {
    assert_eq!(expr("f()"), "(call f)");
    assert_eq!(expr("f(a, *b, **c)"), "(call f a (* b) (** c))");
    assert_eq!(expr("f(1, x=2,)"), "(call f 1 (= x 2))");
    assert_eq!(expr("f(x = a if b else c)"), "(call f (= x (if b a c)))");
    assert_eq!(expr("f((a, b))"), "(call f (tuple a b))");
}

#[test]
fn test_call_argument_errors() {
    assert_eq!(expr_error("f(*a,)"), "got ), want argument");
    assert_eq!(expr_error("f(**a,)"), "got ), want argument");
    assert_eq!(expr_error("f(a.b=1)"), "keyword argument must have form name=expr");
    assert_eq!(expr_error("f(a b)"), "got identifier, want ,");
}

#[test]
fn test_lists_and_dicts() {
    assert_eq!(expr("[]"), "(list)");
    assert_eq!(expr("[1, 2,]"), "(list 1 2)");
    assert_eq!(expr("{}"), "(dict)");
    assert_eq!(expr("{'a': 1, 'b': 2,}"), "(dict (\"a\" 1) (\"b\" 2))");
    assert_eq!(expr_error("{'a' 1}"), "got int literal, want :");
}

// Comprehensions

#[test]
fn test_list_comprehension() {
    assert_eq!(expr("[x for x in y if x]"), "(listcomp x (for x y) (if x))");
    assert_eq!(
        expr("[x * y for x in a if x for y in b]"),
        "(listcomp (* x y) (for x a) (if x) (for y b))"
    );
    assert_eq!(expr("[a for a.b in c]"), "(listcomp a (for (. a b) c))");
}

#[test]
fn test_comprehension_clause_order() {
    match parse_expression("test.sky", "[x for x in y if x if z]").unwrap() {
        Expr::Comprehension(comp) => {
            assert!(!comp.curly);
            assert!(matches!(comp.clauses[0], Clause::For(_)));
            assert!(matches!(comp.clauses[1], Clause::If(_)));
            assert!(matches!(comp.clauses[2], Clause::If(_)));
        }
        other => panic!("expected comprehension, got {:?}", other),
    }
}

#[test]
fn test_comprehension_if_clauses() {
    assert_eq!(expr("[x for x in y if x if z]"), "(listcomp x (for x y) (if x) (if z))");
    assert_eq!(
        expr("[x for x in y if (a if b else c)]"),
        "(listcomp x (for x y) (if (if b a c)))"
    );
    assert_eq!(
        expr("{k: v for k in y if k for v in z if v}"),
        "(dictcomp (entry k v) (for k y) (if k) (for v z) (if v))"
    );
}

#[test]
fn test_dict_comprehension() {
    assert_eq!(
        expr("{k: v for k, v in d.items()}"),
        "(dictcomp (entry k v) (for (tuple k v) (call (. d items))))"
    );
}

#[test]
fn test_comprehension_errors() {
    assert_eq!(expr_error("{x: for x in y}"), "got for, want primary expression");
    assert_eq!(expr_error("[x for x in a if b else c]"), "got else, want ']', for, or if");
    assert_eq!(expr_error("[x for x in a, b]"), "got ,, want ']', for, or if");
    assert_eq!(expr_error("[x for x y]"), "got identifier, want in");
}

#[test]
fn test_comprehension_iterable_excludes_conditional() {
    assert_eq!(expr("[x for x in a if b]"), "(listcomp x (for x a) (if b))");
    assert_eq!(expr("[x for x in (a if b else c)]"), "(listcomp x (for x (if b a c)))");
}

// Lambda

#[test]
fn test_lambda() {
    assert_eq!(expr("lambda: 1"), "(lambda (params) {(return 1)})");
    assert_eq!(
        expr("lambda x, y=1, *z: x + y"),
        "(lambda (params x (= y 1) (* z)) {(return (+ x y))})"
    );
    assert_eq!(expr("f(key = lambda x: x[0])"), "(call f (= key (lambda (params x) {(return (index x 0))})))");
}

// Entry points

#[test]
fn test_parse_expression_trailing_input() {
    let error = parse_expression("test.sky", "1 2").unwrap_err();
    assert_eq!(error.message(), "got int literal after expression, want EOF");
    assert_eq!(error.get_error_name(), "TrailingInput");
    assert_eq!(expr("1 + 2\n"), "(+ 1 2)");
}

#[test]
fn test_parse_expression_spanning_lines() {
    assert_eq!(expr("[\n  1,\n  2,\n]"), "(list 1 2)");
}

#[test]
fn test_missing_primary() {
    assert_eq!(expr_error(")"), "got ), want primary expression");
    assert_eq!(expr_error(""), "got end of file, want primary expression");
}

// Statements

#[test]
fn test_assignments() {
    assert_eq!(module("x = 1\n"), "{(= x 1)}");
    assert_eq!(module("x += 1\n"), "{(+= x 1)}");
    assert_eq!(module("x -= 1\nx *= 2\nx /= 3\nx //= 4\nx %= 5\n"), "{(-= x 1); (*= x 2); (/= x 3); (//= x 4); (%= x 5)}");
    assert_eq!(module("a.b[0] = f()\n"), "{(= (index (. a b) 0) (call f))}");
}

#[test]
fn test_simple_statement_sequence() {
    assert_eq!(module("a = 1; b = 2\n"), "{(= a 1); (= b 2)}");
    assert_eq!(module("a = 1; b = 2;\n"), "{(= a 1); (= b 2)}");
    assert_eq!(module("pass; break; continue\n"), "{pass; break; continue}");
    assert_eq!(module_error("a = 1 b = 2\n"), "got identifier, want newline");
}

#[test]
fn test_blank_lines_produce_no_statements() {
    assert_eq!(module("\n\nx = 1\n\n\ny = 2\n\n"), "{(= x 1); (= y 2)}");
    assert_eq!(module(""), "{}");
}

#[test]
fn test_def() {
    assert_eq!(
        module("def f(a, b=1, *c, **d):\n    return a\n"),
        "{(def f (params a (= b 1) (* c) (** d)) {(return a)})}"
    );
    assert_eq!(module("def f(a,): pass\n"), "{(def f (params a) {pass})}");
    assert_eq!(module("def f():\n  return\n"), "{(def f (params) {(return)})}");
}

#[test]
fn test_def_errors() {
    assert_eq!(module_error("def f(*a,): pass\n"), "got ), want parameter");
    assert_eq!(module_error("def f(**kw,): pass\n"), "got ), want parameter");
    assert_eq!(module_error("def f(1): pass\n"), "not an identifier");
    assert_eq!(module_error("def (): pass\n"), "not an identifier");
    assert_eq!(module_error("def f() pass\n"), "got pass, want :");
}

#[test]
fn test_same_line_suite_matches_indented_suite() {
    assert_eq!(module("def f(): return 1\n"), module("def f():\n    return 1\n"));
    assert_eq!(module("def f(): return 1\n"), "{(def f (params) {(return 1)})}");
}

#[test]
fn test_if_at_end_of_input_without_newline() {
    assert_eq!(module("if x: pass"), "{(if x {pass} {})}");
}

#[test]
fn test_elif_chain_nests() {
    let source = "if a:\n  x = 1\nelif b:\n  x = 2\nelif c:\n  x = 3\nelse:\n  x = 4\n";
    assert_eq!(
        module(source),
        "{(if a {(= x 1)} {(if b {(= x 2)} {(if c {(= x 3)} {(= x 4)})})})}"
    );

    let parsed = parse_module("test.sky", source).unwrap();
    let Stmt::If(outer) = &parsed.stmts[0] else {
        panic!("expected if");
    };
    assert_eq!(outer.else_pos.as_ref().map(|p| p.line), Some(3));
    assert_eq!(outer.false_body.len(), 1);
    let Stmt::If(elif) = &outer.false_body[0] else {
        panic!("expected elif");
    };
    assert_eq!(elif.if_pos.line, 3);
    assert_eq!(elif.else_pos.as_ref().map(|p| p.line), Some(5));
}

#[test]
fn test_if_without_else() {
    let parsed = parse_module("test.sky", "if a:\n  pass\n").unwrap();
    let Stmt::If(if_stmt) = &parsed.stmts[0] else {
        panic!("expected if");
    };
    assert!(if_stmt.else_pos.is_none());
    assert!(if_stmt.false_body.is_empty());
}

#[test]
fn test_for() {
    assert_eq!(module("for x in y:\n  pass\n"), "{(for x y {pass})}");
    assert_eq!(module("for k, v in d.items(): pass\n"), "{(for (tuple k v) (call (. d items)) {pass})}");
    assert_eq!(module("for x in 1, 2: pass\n"), "{(for x (tuple 1 2) {pass})}");
    assert_eq!(module("for (a, b) in c: pass\n"), "{(for (tuple a b) c {pass})}");
    assert_eq!(module("for a[0] in c: pass\n"), "{(for (index a 0) c {pass})}");
}

#[test]
fn test_for_errors() {
    assert_eq!(module_error("for x in 1, 2,: pass\n"), "got :, want primary expression");
    assert_eq!(module_error("for x in 1, 2,\n"), "unparenthesized tuple with trailing comma");
    assert_eq!(module_error("for x + 1 in y: pass\n"), "got +, want in");
}

#[test]
fn test_nested_blocks() {
    let source = "def f(xs):\n    for x in xs:\n        if x:\n            continue\n        break\n    return None\n";
    assert_eq!(
        module(source),
        "{(def f (params xs) {(for x xs {(if x {continue} {}); break}); (return None)})}"
    );
}

#[test]
fn test_docstring_and_call_statements() {
    assert_eq!(
        module("\"\"\"Doc.\"\"\"\ncc_library(name = 'x', srcs = glob(['*.cc']))\n"),
        "{\"Doc.\"; (call cc_library (= name \"x\") (= srcs (call glob (list \"*.cc\"))))}"
    );
}

#[test]
fn test_unexpected_indent() {
    assert_eq!(module_error("x = 1\n  y = 2\n"), "got indent, want primary expression");
}

#[test]
fn test_missing_indent() {
    assert_eq!(module_error("def f():\nreturn 1\n"), "got return, want indent");
}

// Load

#[test]
fn test_load_statement() {
    assert_eq!(module("load(\"m\", \"a\", b=\"c\")\n"), "{(load \"m\" (a a) (b c))}");
}

#[test]
fn test_load_binding_positions() {
    let parsed = parse_module("test.sky", "load(\"m\", \"a\", b=\"c\")\n").unwrap();
    let Stmt::Load(load) = &parsed.stmts[0] else {
        panic!("expected load");
    };

    assert_eq!(load.load.col, 1);
    assert_eq!(load.lparen.col, 5);
    assert_eq!(load.rparen.col, 21);
    assert_eq!(load.module.as_str(), Some("m"));

    let first = &load.bindings[0];
    assert_eq!(first.to.span.start.col, 12);
    assert_eq!(first.from.span.start.col, 12);
    assert_eq!(first.to, first.from);

    let second = &load.bindings[1];
    assert_eq!(second.to.name, "b");
    assert_eq!(second.to.span.start.col, 16);
    assert_eq!(second.from.name, "c");
    assert_eq!(second.from.span.start.col, 19);

    let span = parsed.stmts[0].get_span();
    assert_eq!(span.start.col, 1);
    assert_eq!(span.end.col, 22);
}

#[test]
fn test_load_errors() {
    let error = parse_module("test.sky", "load(\"m\")\n").unwrap_err();
    assert_eq!(error.message(), "load statement needs at least 2 operands, got 1");
    assert_eq!(error.get_position().col, 5);
    assert_eq!(error.kind(), ErrorKind::Syntax);

    assert_eq!(module_error("load()\n"), "load statement needs at least 2 operands, got 0");
    assert_eq!(
        module_error("load(m, \"a\")\n"),
        "first operand of load statement must be a string literal"
    );
    assert_eq!(module_error("load(\"m\", a)\n"), "load operand must be \"name\" or localname=\"name\"");
    assert_eq!(module_error("load(\"m\", a=b)\n"), "load operand must be \"name\" or localname=\"name\"");
    assert_eq!(module_error("load(\"m\", 1)\n"), "load operand must be \"name\" or localname=\"name\"");
    assert_eq!(module_error("load(\"m\", *a)\n"), "load operand must be \"name\" or localname=\"name\"");
}

#[test]
fn test_load_only_rewritten_as_statement() {
    assert_eq!(module("x = load(\"m\")\n"), "{(= x (call load \"m\"))}");
    assert_eq!(module("foo.load(\"m\")\n"), "{(call (. foo load) \"m\")}");
    assert_eq!(expr("load(\"m\")"), "(call load \"m\")");
}

#[test]
fn test_load_inside_block_is_rewritten() {
    assert_eq!(
        module("def f():\n    load(\"m\", \"a\")\n"),
        "{(def f (params) {(load \"m\" (a a))})}"
    );
}

// Whole module

#[test]
fn test_parsing_is_deterministic() {
    let source = "load(\"//rules:defs.bzl\", \"rule\")\n\ndef helper(name, deps = [], **kwargs):\n    \"\"\"Helper.\"\"\"\n    srcs = [s for s in deps if s.endswith(\".cc\")]\n    rule(name = name, srcs = srcs + [\"main.cc\"], **kwargs)\n\nhelper(\"app\", deps = [\"a.cc\", \"b.h\"])\n";
    let first = parse_module("BUILD", source).unwrap();
    let second = parse_module("BUILD", source).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.stmts.len(), 3);
    assert_eq!(first.path.as_str(), "BUILD");
}

#[test]
fn test_expression_spans() {
    let parsed = parse_expression("test.sky", "foo(a, b)[1]").unwrap();
    let span = parsed.get_span();
    assert_eq!(span.start.col, 1);
    assert_eq!(span.end.col, 13);

    let parsed = parse_expression("test.sky", "a + bc").unwrap();
    let span = parsed.get_span();
    assert_eq!(span.start.col, 1);
    assert_eq!(span.end.col, 7);
}

// Nesting

fn nested(open: &str, close: &str, depth: usize) -> String {
    format!("{}1{}", open.repeat(depth), close.repeat(depth))
}

#[test]
fn test_deep_parentheses_are_an_error() {
    let error = parse_expression("test.sky", nested("(", ")", 10_000)).unwrap_err();
    assert_eq!(error.get_error_name(), "NestingTooDeep");
    assert_eq!(error.kind(), ErrorKind::Syntax);
    assert_eq!(error.message(), format!("nesting exceeds {} levels", MAX_NESTING));
}

#[test]
fn test_deep_lists_and_unary_are_an_error() {
    let error = parse_expression("test.sky", nested("[", "]", 10_000)).unwrap_err();
    assert_eq!(error.get_error_name(), "NestingTooDeep");

    let error = parse_expression("test.sky", format!("{}1", "-".repeat(10_000))).unwrap_err();
    assert_eq!(error.get_error_name(), "NestingTooDeep");
}

#[test]
fn test_moderate_nesting_parses() {
    assert_eq!(expr(&nested("(", ")", 20)), "1");
    assert_eq!(expr(&nested("f(", ")", 10)), "(call f (call f (call f (call f (call f (call f (call f (call f (call f (call f 1))))))))))");
}

#[test]
fn test_nesting_depth_is_released() {
    let line = format!("x = {}\n", nested("(", ")", 20));
    let source = line.repeat(100);
    let parsed = parse_module("test.sky", source).unwrap();
    assert_eq!(parsed.stmts.len(), 100);
}

#[test]
fn test_deep_blocks_are_an_error() {
    let mut source = String::new();
    for level in 0..200 {
        source.push_str(&" ".repeat(level));
        source.push_str("if x:\n");
    }
    source.push_str(&" ".repeat(200));
    source.push_str("pass\n");

    let error = parse_module("test.sky", source).unwrap_err();
    assert_eq!(error.get_error_name(), "NestingTooDeep");

    let shallow = "if a:\n if b:\n  if c:\n   pass\n";
    assert_eq!(module(shallow), "{(if a {(if b {(if c {pass} {})} {})} {})}");
}
