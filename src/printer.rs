//! The pretty-printer: one exhaustive match that re-serializes a node to
//! source text.
//!
//! The output is canonical rather than faithful to the original layout —
//! re-parsing the printed text yields a structurally equal tree, which is
//! exactly the property the round-trip tests pin down.

use crate::ast::{
    ast::Node,
    expressions::{CodpStage, ListOpKind},
    statements::ForwardKind,
    types::TypedParam,
};

pub fn print_node(node: &Node) -> String {
    let mut out = String::new();
    write_node(node, &mut out, 0);
    out
}

const INDENT: &str = "    ";

fn write_node(node: &Node, out: &mut String, indent: usize) {
    match node {
        Node::None => out.push_str("none"),
        Node::Empty => out.push_str("()"),
        Node::Bool(value) => out.push_str(if *value { "true" } else { "false" }),
        Node::Int(value) => out.push_str(&value.to_string()),
        Node::Float(value) => {
            if value.fract() == 0.0 && value.is_finite() {
                out.push_str(&format!("{:.1}", value));
            } else {
                out.push_str(&format!("{}", value));
            }
        }
        Node::Char(value) => {
            out.push('\'');
            out.push(*value);
            out.push('\'');
        }
        Node::Str(value) => {
            out.push('"');
            out.push_str(value);
            out.push('"');
        }
        Node::FormatString { fragments, exprs } => {
            out.push_str("$\"");
            for (i, expr) in exprs.iter().enumerate() {
                out.push_str(&escape_fragment(&fragments[i]));
                out.push('{');
                write_node(expr, out, indent);
                out.push('}');
            }
            out.push_str(&escape_fragment(&fragments[exprs.len()]));
            out.push('"');
        }
        Node::Name(name) => out.push_str(name),
        Node::Tuple(elements) => {
            out.push('(');
            write_separated(elements, out, indent);
            if elements.len() == 1 {
                out.push(',');
            }
            out.push(')');
        }
        Node::List(elements) => {
            out.push('[');
            write_separated(elements, out, indent);
            out.push(']');
        }
        Node::Set(elements) => {
            out.push('{');
            write_separated(elements, out, indent);
            out.push('}');
        }
        Node::Range { start, end } => {
            out.push('[');
            write_node(start, out, indent);
            out.push_str("..");
            write_node(end, out, indent);
            out.push(']');
        }
        Node::ParamTuple(params) => out.push_str(&typed_params_text(params)),
        Node::BinOp { op, lhs, rhs } => {
            write_operand(lhs, out, indent);
            out.push(' ');
            out.push_str(op.symbol());
            out.push(' ');
            write_operand(rhs, out, indent);
        }
        Node::Comparison { op, lhs, rhs } => {
            write_operand(lhs, out, indent);
            out.push(' ');
            out.push_str(op.symbol());
            out.push(' ');
            write_operand(rhs, out, indent);
        }
        Node::Logic { op, lhs, rhs } => {
            write_operand(lhs, out, indent);
            out.push(' ');
            out.push_str(op.symbol());
            out.push(' ');
            write_operand(rhs, out, indent);
        }
        Node::Not(inner) => {
            out.push_str("!(");
            write_node(inner, out, indent);
            out.push(')');
        }
        Node::SizeOf(inner) => {
            out.push('|');
            write_node(inner, out, indent);
            out.push('|');
        }
        Node::Call { callee, args } => {
            write_node(callee, out, indent);
            out.push('(');
            write_separated(args, out, indent);
            out.push(')');
        }
        Node::Attribute { object, attr } => {
            write_node(object, out, indent);
            out.push('.');
            out.push_str(attr);
        }
        Node::ChainedCall { base, links } => {
            write_node(base, out, indent);
            for (attr, args) in links {
                out.push('.');
                out.push_str(attr);
                if let Some(args) = args {
                    out.push('(');
                    write_separated(args, out, indent);
                    out.push(')');
                }
            }
        }
        Node::ListOp { object, op } => {
            write_node(object, out, indent);
            out.push('[');
            write_list_op(op, out, indent);
            out.push(']');
        }
        Node::Codp { stages } => {
            for (i, stage) in stages.iter().enumerate() {
                if i > 0 {
                    out.push_str(" => ");
                }
                write_codp_stage(stage, out, indent);
            }
        }
        Node::MutableBind { name, ty, value } => {
            out.push_str(name);
            if let Some(ty) = ty {
                out.push_str(": ");
                out.push_str(&ty.name);
            }
            out.push_str(" = ");
            write_node(value, out, indent);
        }
        Node::FinalBind { name, ty, value } => {
            out.push_str(name);
            if let Some(ty) = ty {
                out.push_str(": ");
                out.push_str(&ty.name);
            }
            out.push_str(" := ");
            write_node(value, out, indent);
        }
        Node::Cond {
            cond,
            then_body,
            else_body,
        } => {
            out.push_str("?(");
            write_node(cond, out, indent);
            out.push(')');
            if let Some(body) = then_body {
                out.push_str(" \\t\\ ");
                write_node(body, out, indent);
            }
            if let Some(body) = else_body {
                out.push_str(" \\f\\ ");
                write_node(body, out, indent);
            }
        }
        Node::Cases(cases) => {
            out.push_str("?= ");
            write_cases(cases, out, indent);
        }
        Node::Forward { params, kind } => {
            out.push('#');
            if let Some(params) = params {
                out.push_str(&typed_params_text(params));
            }
            write_forward_suffix(kind, out, indent);
        }
        Node::InfiniteLoop { body } => {
            out.push_str("[...]");
            if let Some(body) = body {
                out.push_str(" >> ");
                write_node(body, out, indent);
            }
        }
        Node::Iterator {
            collection,
            params,
            body,
        } => {
            write_node(collection, out, indent);
            out.push_str(" >> ");
            if matches!(**body, Node::Block(_)) && params.is_none() {
                write_node(body, out, indent);
            } else {
                out.push('#');
                if let Some(params) = params {
                    out.push_str(&typed_params_text(params));
                }
                out.push_str(" => ");
                write_node(body, out, indent);
            }
        }
        Node::IteratorSequence { collection, stages } => {
            write_node(collection, out, indent);
            out.push_str(" >> [");
            for (i, stage) in stages.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push('#');
                out.push_str(stage);
            }
            out.push(']');
        }
        Node::Resource { entries } => {
            out.push_str("@(");
            write_separated(entries, out, indent);
            out.push(')');
        }
        Node::ResourceBind { name, value } => {
            out.push_str(name);
            out.push_str(" <- ");
            write_node(value, out, indent);
        }
        Node::LocalPath { value, ty, .. }
        | Node::RemotePath { value, ty, .. }
        | Node::WebUrl { value, ty, .. }
        | Node::DbUrl { value, ty, .. } => {
            out.push('"');
            out.push_str(value);
            out.push('"');
            if let Some(ty) = ty {
                out.push_str(": ");
                out.push_str(&ty.name);
            }
        }
        Node::ExternalPackageList(packages) => {
            out.push('[');
            for (i, package) in packages.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push('"');
                out.push_str(package);
                out.push('"');
            }
            out.push(']');
        }
        Node::Function {
            name,
            params,
            ret,
            body,
            is_final,
        } => {
            out.push('#');
            out.push_str(name);
            if let Some(params) = params {
                out.push_str(&typed_params_text(params));
            }
            if let Some(ret) = ret {
                out.push_str(" -> ");
                out.push_str(&ret.name);
            }
            match &**body {
                Node::Forward { kind, .. } => write_forward_suffix(kind, out, indent),
                Node::Block(_) if !is_final => {
                    out.push(' ');
                    write_node(body, out, indent);
                }
                _ => {
                    out.push_str(if *is_final { " := " } else { " = " });
                    write_node(body, out, indent);
                }
            }
        }
        Node::SimpleFunction {
            name,
            params,
            ret,
            body,
        } => {
            out.push('#');
            out.push_str(name);
            if let Some(params) = params {
                out.push_str(&typed_params_text(params));
            }
            if let Some(ret) = ret {
                out.push_str(" -> ");
                out.push_str(&ret.name);
            }
            out.push_str(" => ");
            write_node(body, out, indent);
        }
        Node::StructDef { name, fields } => {
            out.push('$');
            out.push_str(name);
            out.push_str(" { ");
            for (i, field) in fields.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&field.name);
                if let Some(ty) = &field.ty {
                    out.push_str(": ");
                    out.push_str(&ty.name);
                }
            }
            out.push_str(" }");
        }
        Node::Block(statements) => {
            out.push('{');
            for statement in statements {
                out.push('\n');
                out.push_str(&INDENT.repeat(indent + 1));
                write_node(statement, out, indent + 1);
            }
            out.push('\n');
            out.push_str(&INDENT.repeat(indent));
            out.push('}');
        }
        Node::MainBlock(statements) => {
            for (i, statement) in statements.iter().enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                write_node(statement, out, indent);
            }
        }
        Node::Print(args) => {
            out.push_str(">_(");
            write_separated(args, out, indent);
            out.push(')');
        }
        Node::ReadFile(path) => {
            out.push_str("<- ");
            write_node(path, out, indent);
        }
        Node::Return(value) => {
            out.push_str("<<");
            if let Some(value) = value {
                out.push(' ');
                write_node(value, out, indent);
            }
        }
        Node::Break => out.push('~'),
        Node::Pass => out.push_str("..."),
        Node::Comment(text) => {
            if text.starts_with("//") {
                out.push_str(text);
            } else {
                out.push_str("/*");
                out.push_str(text);
                out.push_str("*/");
            }
        }
        Node::Eof => {}
    }
}

/// Operands of binary/logic/comparison nodes are parenthesized when they
/// are themselves compound, so the printed text re-parses to the same
/// nesting regardless of precedence.
fn write_operand(node: &Node, out: &mut String, indent: usize) {
    match node {
        Node::BinOp { .. } | Node::Logic { .. } | Node::Comparison { .. } => {
            out.push('(');
            write_node(node, out, indent);
            out.push(')');
        }
        _ => write_node(node, out, indent),
    }
}

fn write_separated(nodes: &[Node], out: &mut String, indent: usize) {
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_node(node, out, indent);
    }
}

/// A value group for the `?^` many-value forms: always a tuple, with the
/// trailing comma that keeps a single value a tuple on re-parse.
fn write_value_group(values: &[Node], out: &mut String, indent: usize) {
    out.push('(');
    write_separated(values, out, indent);
    if values.len() == 1 {
        out.push(',');
    }
    out.push(')');
}

fn write_list_op(op: &ListOpKind, out: &mut String, indent: usize) {
    match op {
        ListOpKind::AccessByIndex(index) => write_node(index, out, indent),
        ListOpKind::AccessByName(name) => {
            out.push('"');
            out.push_str(name);
            out.push('"');
        }
        ListOpKind::GetIndexByValue(value) => {
            out.push_str("?= ");
            write_node(value, out, indent);
        }
        ListOpKind::GetIndicesByValues(values) => {
            out.push_str("?^ ");
            write_value_group(values, out, indent);
        }
        ListOpKind::Insert { index, value } => {
            out.push('^');
            write_node(index, out, indent);
            out.push_str(" <- ");
            write_node(value, out, indent);
        }
        ListOpKind::Append(value) => {
            out.push_str("+: ");
            write_node(value, out, indent);
        }
        ListOpKind::RemoveByIndex(index) => {
            out.push_str("-: ^");
            write_node(index, out, indent);
        }
        ListOpKind::RemoveByIndices(indices) => {
            out.push_str("-: ^");
            write_value_group(indices, out, indent);
        }
        ListOpKind::RemoveByValue(value) => {
            out.push_str("-: ?= ");
            write_node(value, out, indent);
        }
        ListOpKind::RemoveByValues(values) => {
            out.push_str("-: ?^ ");
            write_value_group(values, out, indent);
        }
        ListOpKind::Reversed => out.push('<'),
    }
}

fn write_codp_stage(stage: &CodpStage, out: &mut String, indent: usize) {
    out.push_str(stage.name());
    out.push('{');
    match stage {
        CodpStage::Filter(cond) => write_node(cond, out, indent),
        CodpStage::Sort(args) | CodpStage::Map(args) | CodpStage::Slice(args) => {
            write_separated(args, out, indent)
        }
    }
    out.push('}');
}

fn write_cases(cases: &crate::ast::statements::CasesBlock, out: &mut String, indent: usize) {
    out.push_str("{ ");
    for (pattern, body) in &cases.arms {
        write_node(pattern, out, indent);
        out.push_str(" => ");
        write_node(body, out, indent);
        out.push_str(", ");
    }
    out.push_str("_ => ");
    write_node(&cases.default_body, out, indent);
    out.push_str(" }");
}

fn write_forward_suffix(kind: &ForwardKind, out: &mut String, indent: usize) {
    match kind {
        ForwardKind::Run(body) => {
            out.push(' ');
            write_node(body, out, indent);
        }
        ForwardKind::Plain(body) => {
            out.push_str(" => ");
            write_node(body, out, indent);
        }
        ForwardKind::MatchValue { pattern, then_body } => {
            out.push_str(" ?= ");
            write_node(pattern, out, indent);
            out.push_str(" => ");
            write_node(then_body, out, indent);
        }
        ForwardKind::MatchCases(cases) => {
            out.push_str(" ?= ");
            write_cases(cases, out, indent);
        }
        ForwardKind::CheckIn {
            iterable,
            then_body,
        } => {
            out.push_str(" ?^ ");
            write_node(iterable, out, indent);
            out.push_str(" => ");
            write_node(then_body, out, indent);
        }
        ForwardKind::CondTrue { cond, then_body } => {
            out.push_str(" ?(");
            write_node(cond, out, indent);
            out.push_str(") \\t\\ ");
            write_node(then_body, out, indent);
        }
        ForwardKind::CondFalse { cond, else_body } => {
            out.push_str(" ?(");
            write_node(cond, out, indent);
            out.push_str(") \\f\\ ");
            write_node(else_body, out, indent);
        }
        ForwardKind::CondBoth {
            cond,
            then_body,
            else_body,
        } => {
            out.push_str(" ?(");
            write_node(cond, out, indent);
            out.push_str(") \\t\\ ");
            write_node(then_body, out, indent);
            out.push_str(" \\f\\ ");
            write_node(else_body, out, indent);
        }
    }
}

fn escape_fragment(fragment: &str) -> String {
    fragment.replace('{', "{{").replace('}', "}}")
}

fn typed_params_text(params: &[TypedParam]) -> String {
    let mut out = String::from("(");
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&param.name);
        if let Some(ty) = &param.ty {
            out.push_str(": ");
            out.push_str(&ty.name);
        }
    }
    out.push(')');
    out
}
