//! The type-inference pass.
//!
//! Walks the AST and fills in absent type annotations on bindings from
//! the shape of the bound value. Deliberately narrow and best-effort: a
//! declared type is never overwritten, anything it cannot classify is
//! left alone, and the pass never fails — parsing already succeeded, and
//! an unannotated binding is not an error.

use crate::ast::{ast::Node, types::TypeRef};

/// Annotates bindings in place. The only mutation any pass performs on a
/// parsed tree.
pub fn infer(node: &mut Node) {
    match node {
        Node::MainBlock(statements) | Node::Block(statements) => {
            for statement in statements {
                infer(statement);
            }
        }
        Node::MutableBind { ty, value, .. } | Node::FinalBind { ty, value, .. } => {
            infer(value);
            if ty.is_none() {
                *ty = value_type(value);
            }
        }
        Node::Function { body, .. } | Node::SimpleFunction { body, .. } => infer(body),
        Node::Forward { kind, .. } => {
            use crate::ast::statements::ForwardKind;
            match kind {
                ForwardKind::Run(body) | ForwardKind::Plain(body) => infer(body),
                ForwardKind::MatchValue { then_body, .. } => infer(then_body),
                ForwardKind::MatchCases(cases) => {
                    for (_, body) in &mut cases.arms {
                        infer(body);
                    }
                    infer(&mut cases.default_body);
                }
                ForwardKind::CheckIn { then_body, .. } => infer(then_body),
                ForwardKind::CondTrue { then_body, .. } => infer(then_body),
                ForwardKind::CondFalse { else_body, .. } => infer(else_body),
                ForwardKind::CondBoth {
                    then_body,
                    else_body,
                    ..
                } => {
                    infer(then_body);
                    infer(else_body);
                }
            }
        }
        Node::Cond {
            then_body,
            else_body,
            ..
        } => {
            if let Some(body) = then_body {
                infer(body);
            }
            if let Some(body) = else_body {
                infer(body);
            }
        }
        Node::Cases(cases) => {
            for (_, body) in &mut cases.arms {
                infer(body);
            }
            infer(&mut cases.default_body);
        }
        Node::Iterator { body, .. } => infer(body),
        Node::InfiniteLoop { body: Some(body) } => infer(body),
        _ => {}
    }
}

/// The builtin type a literal shape implies, if any.
fn value_type(value: &Node) -> Option<TypeRef> {
    let name = match value {
        Node::Int(_) => "Int",
        Node::Float(_) => "Float",
        Node::Bool(_) => "Bool",
        Node::Char(_) => "Char",
        Node::Str(_) | Node::FormatString { .. } => "Str",
        Node::List(_) => "List",
        Node::Tuple(_) => "Tuple",
        Node::Set(_) => "Set",
        Node::Range { .. } => "Range",
        _ => return None,
    };
    Some(TypeRef::new(name))
}
