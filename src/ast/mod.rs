/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The `Node` tagged union, the full catalog of node shapes
/// - expressions: Payload types for expression-family nodes
/// - statements: Payload types for forward and case constructs
/// - types: Type annotations, typed params, resource classification
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
