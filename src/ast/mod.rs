/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The closed `Stmt` and `Expr` sum types, `Module` and `Function`
/// - expressions: Payloads of the expression variants
/// - statements: Payloads of the statement variants
pub mod ast;
pub mod expressions;
pub mod statements;
