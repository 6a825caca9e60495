//! Type inference module.
//!
//! A pass that walks the AST after parsing and may fill in type
//! annotations on bindings. Narrow and best-effort by design: it never
//! blocks compilation, never overwrites a declared type, and silently
//! leaves alone anything it cannot classify.

pub mod infer;
