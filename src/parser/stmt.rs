//! Statement parsing: bindings, functions and forwards, pattern-matching
//! cases, conditionals, resources, print/return/break/pass, and statement
//! sequencing into blocks.
//!
//! Every rule that begins with a fixed marker token (`@`, `#`, `$`, `[`,
//! `{`, `(`) consumes it unconditionally as its first action; it is only
//! ever entered when the caller has already verified the marker is
//! present.

use crate::{
    ast::{
        ast::Node,
        statements::{CasesBlock, ForwardKind},
        types::{classify_resource, TypedParam, TypeRef},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{
    cursor::Cursor,
    expr,
    types::{parse_param_tuple, parse_type, parse_typed_fields},
};

pub fn parse_stmt(cursor: &mut Cursor) -> Result<Node, Error> {
    cursor.skip_blank();

    match cursor.current_kind() {
        TokenKind::EOF => Ok(Node::Eof),
        TokenKind::LineComment | TokenKind::BlockComment => {
            let text = cursor.current().text.clone();
            cursor.advance(1);
            Ok(Node::Comment(text))
        }
        TokenKind::At => parse_resource(cursor),
        TokenKind::Hash => parse_hash(cursor),
        TokenKind::Dollar => parse_dollar_stmt(cursor),
        TokenKind::PrintArrow => parse_print(cursor),
        TokenKind::ShiftLeft => parse_return(cursor),
        TokenKind::Tilde => {
            cursor.advance(1);
            Ok(Node::Break)
        }
        TokenKind::Ellipsis => {
            cursor.advance(1);
            Ok(Node::Pass)
        }
        TokenKind::OpenCurly => parse_block(cursor),
        TokenKind::Question => parse_cond_flow(cursor),
        TokenKind::QuestionEquals => parse_cases_stmt(cursor),
        TokenKind::Name => parse_binding_or_expr(cursor),
        _ => expr::parse_expr(cursor),
    }
}

/// A statement starting with a name is a binding iff the lookahead shows a
/// binding operator (with an optional `: Type` in between); everything
/// else is an expression statement.
fn parse_binding_or_expr(cursor: &mut Cursor) -> Result<Node, Error> {
    match cursor.nth_significant_kind(1) {
        TokenKind::Assignment | TokenKind::ColonEquals => parse_binding(cursor),
        TokenKind::Colon
            if cursor.nth_significant_kind(2) == TokenKind::Name
                && matches!(
                    cursor.nth_significant_kind(3),
                    TokenKind::Assignment | TokenKind::ColonEquals
                ) =>
        {
            parse_binding(cursor)
        }
        _ => expr::parse_expr(cursor),
    }
}

/// `name = expr`, `name := expr`, `name : Type = expr`, `name : Type := expr`.
fn parse_binding(cursor: &mut Cursor) -> Result<Node, Error> {
    let name = cursor.current().text.clone();
    cursor.advance(1);

    cursor.skip_insignificant();
    let ty = if cursor.consume_if(TokenKind::Colon) {
        Some(parse_type(cursor)?)
    } else {
        None
    };

    cursor.skip_insignificant();
    let is_final = match cursor.current_kind() {
        TokenKind::ColonEquals => {
            cursor.advance(1);
            true
        }
        TokenKind::Assignment => {
            cursor.advance(1);
            false
        }
        _ => return Err(cursor.unexpected()),
    };

    let value = Box::new(expr::parse_expr(cursor)?);

    Ok(if is_final {
        Node::FinalBind { name, ty, value }
    } else {
        Node::MutableBind { name, ty, value }
    })
}

/// The single entry point for every `#` construct. Dispatches on what
/// follows the optional name, parameter tuple and return type:
///
/// - `{ block }`            plain run
/// - `=> expr-or-block`     plain forward / simple function
/// - `= body`, `:= body`    named function, non-final / final
/// - `?= value => then`     equality guard
/// - `?= { cases }`         cases guard
/// - `?^ iterable => then`  membership guard
/// - `?(cond) \t\ .. \f\ ..` conditional guard
/// - `>> iterable => body`  delegates into the iterator grammar
pub fn parse_hash(cursor: &mut Cursor) -> Result<Node, Error> {
    cursor.take_marker(TokenKind::Hash);
    cursor.skip_insignificant();

    let name = if cursor.check(TokenKind::Name) {
        let text = cursor.current().text.clone();
        cursor.advance(1);
        Some(text)
    } else {
        None
    };

    cursor.skip_insignificant();
    let params = if cursor.check(TokenKind::OpenParen) {
        Some(parse_param_tuple(cursor)?)
    } else {
        None
    };

    cursor.skip_insignificant();
    let ret = if cursor.consume_if(TokenKind::Arrow) {
        Some(parse_type(cursor)?)
    } else {
        None
    };

    cursor.skip_insignificant();
    match cursor.current_kind() {
        TokenKind::FatArrow => {
            cursor.advance(1);
            let body = Box::new(parse_body(cursor)?);
            Ok(match name {
                Some(name) => Node::SimpleFunction {
                    name,
                    params,
                    ret,
                    body,
                },
                None => Node::Forward {
                    params,
                    kind: ForwardKind::Plain(body),
                },
            })
        }
        TokenKind::Assignment | TokenKind::ColonEquals => {
            let is_final = cursor.current_kind() == TokenKind::ColonEquals;
            let name = match name {
                Some(name) => name,
                None => return Err(cursor.unexpected()),
            };
            cursor.advance(1);
            let body = Box::new(parse_body(cursor)?);
            Ok(Node::Function {
                name,
                params,
                ret,
                body,
                is_final,
            })
        }
        TokenKind::OpenCurly => {
            let body = Box::new(parse_block(cursor)?);
            Ok(match name {
                Some(name) => Node::Function {
                    name,
                    params,
                    ret,
                    body,
                    is_final: false,
                },
                None => Node::Forward {
                    params,
                    kind: ForwardKind::Run(body),
                },
            })
        }
        TokenKind::QuestionEquals => {
            cursor.advance(1);
            cursor.skip_insignificant();
            let kind = if cursor.check(TokenKind::OpenCurly) {
                ForwardKind::MatchCases(parse_cases_block(cursor)?)
            } else {
                let pattern = Box::new(expr::parse_expr(cursor)?);
                cursor.find_consume_or_error(TokenKind::FatArrow)?;
                let then_body = Box::new(parse_body(cursor)?);
                ForwardKind::MatchValue { pattern, then_body }
            };
            Ok(wrap_forward(name, params, ret, kind))
        }
        TokenKind::QuestionHat => {
            cursor.advance(1);
            let iterable = Box::new(expr::parse_expr(cursor)?);
            cursor.find_consume_or_error(TokenKind::FatArrow)?;
            let then_body = Box::new(parse_body(cursor)?);
            Ok(wrap_forward(
                name,
                params,
                ret,
                ForwardKind::CheckIn {
                    iterable,
                    then_body,
                },
            ))
        }
        TokenKind::Question => {
            let (cond, then_body, else_body) = parse_cond_parts(cursor)?;
            let cond = Box::new(cond);
            let kind = match (then_body, else_body) {
                (Some(t), Some(e)) => ForwardKind::CondBoth {
                    cond,
                    then_body: Box::new(t),
                    else_body: Box::new(e),
                },
                (Some(t), None) => ForwardKind::CondTrue {
                    cond,
                    then_body: Box::new(t),
                },
                (None, Some(e)) => ForwardKind::CondFalse {
                    cond,
                    else_body: Box::new(e),
                },
                (None, None) => unreachable!("parse_cond_parts rejects branchless conditionals"),
            };
            Ok(wrap_forward(name, params, ret, kind))
        }
        TokenKind::ShiftRight => {
            cursor.advance(1);
            let collection = Box::new(expr::parse_expr(cursor)?);
            cursor.find_consume_or_error(TokenKind::FatArrow)?;
            let body = Box::new(parse_body(cursor)?);
            Ok(match name {
                Some(name) => Node::Function {
                    name,
                    params,
                    ret,
                    body: Box::new(Node::Iterator {
                        collection,
                        params: None,
                        body,
                    }),
                    is_final: false,
                },
                None => Node::Iterator {
                    collection,
                    params,
                    body,
                },
            })
        }
        _ => Err(cursor.unexpected()),
    }
}

/// A guarded `#` construct: anonymous it is a Forward, named it is a
/// Function whose body is that forward.
fn wrap_forward(
    name: Option<String>,
    params: Option<Vec<TypedParam>>,
    ret: Option<TypeRef>,
    kind: ForwardKind,
) -> Node {
    match name {
        Some(name) => Node::Function {
            name,
            params,
            ret,
            body: Box::new(Node::Forward { params: None, kind }),
            is_final: false,
        },
        None => Node::Forward { params, kind },
    }
}

/// A body is either a braced block or a single statement-like form:
/// an expression, a print, a return, a break or a pass.
pub fn parse_body(cursor: &mut Cursor) -> Result<Node, Error> {
    cursor.skip_insignificant();
    match cursor.current_kind() {
        TokenKind::OpenCurly => parse_block(cursor),
        TokenKind::PrintArrow => parse_print(cursor),
        TokenKind::ShiftLeft => parse_return(cursor),
        TokenKind::Tilde => {
            cursor.advance(1);
            Ok(Node::Break)
        }
        TokenKind::Ellipsis => {
            cursor.advance(1);
            Ok(Node::Pass)
        }
        _ => expr::parse_expr(cursor),
    }
}

/// `{ stmt* }`. Nested blocks keep comment statements.
pub fn parse_block(cursor: &mut Cursor) -> Result<Node, Error> {
    cursor.take_marker(TokenKind::OpenCurly);

    let mut statements = Vec::new();
    loop {
        cursor.skip_blank();
        if cursor.consume_if(TokenKind::CloseCurly) {
            break;
        }
        if cursor.at_eof() {
            return Err(Error::new(ErrorImpl::UnexpectedEndOfInput, cursor.mark()));
        }
        statements.push(parse_stmt(cursor)?);
    }

    Ok(Node::Block(statements))
}

/// `?(cond) \t\ { then } \f\ { else }` as a statement.
fn parse_cond_flow(cursor: &mut Cursor) -> Result<Node, Error> {
    let (cond, then_body, else_body) = parse_cond_parts(cursor)?;
    Ok(Node::Cond {
        cond: Box::new(cond),
        then_body: then_body.map(Box::new),
        else_body: else_body.map(Box::new),
    })
}

/// The shared `?(cond)` grammar: the condition, then one or two `\t\` /
/// `\f\` branches in either order. At least one branch is required.
fn parse_cond_parts(cursor: &mut Cursor) -> Result<(Node, Option<Node>, Option<Node>), Error> {
    let label = cursor.mark();
    cursor.take_marker(TokenKind::Question);
    cursor.find_consume_or_error(TokenKind::OpenParen)?;

    let cond = expr::parse_condition(cursor)?;
    cursor.skip_insignificant();
    cursor.expect(TokenKind::CloseParen)?;

    let mut then_body = None;
    let mut else_body = None;

    while cursor.find_consume(TokenKind::Backslash) {
        cursor.skip_insignificant();
        let branch_label = cursor.mark();
        if !cursor.check(TokenKind::Name) {
            return Err(cursor.unexpected());
        }
        let which = cursor.current().text.clone();
        cursor.advance(1);
        cursor.skip_insignificant();
        cursor.expect(TokenKind::Backslash)?;

        let body = parse_body(cursor)?;
        match which.as_str() {
            "t" => then_body = Some(body),
            "f" => else_body = Some(body),
            _ => {
                return Err(Error::new(
                    ErrorImpl::UnexpectedToken { token: which },
                    branch_label,
                ))
            }
        }
    }

    if then_body.is_none() && else_body.is_none() {
        return Err(Error::new(ErrorImpl::EmptyConditional, label));
    }

    Ok((cond, then_body, else_body))
}

/// Standalone `?= { pattern => body, ..., _ => default }`.
fn parse_cases_stmt(cursor: &mut Cursor) -> Result<Node, Error> {
    cursor.take_marker(TokenKind::QuestionEquals);
    cursor.skip_insignificant();
    if !cursor.check(TokenKind::OpenCurly) {
        return Err(cursor.unexpected());
    }
    Ok(Node::Cases(parse_cases_block(cursor)?))
}

/// The ordered (pattern, body) arms plus the mandatory `_` default.
pub fn parse_cases_block(cursor: &mut Cursor) -> Result<CasesBlock, Error> {
    let label = cursor.mark();
    cursor.take_marker(TokenKind::OpenCurly);

    let mut arms = Vec::new();
    let mut default_body = None;

    loop {
        cursor.skip_insignificant();
        if cursor.consume_if(TokenKind::CloseCurly) {
            break;
        }
        if cursor.consume_if(TokenKind::Comma) {
            continue;
        }

        let is_default = cursor.check(TokenKind::Name) && cursor.current().text == "_";
        if is_default {
            cursor.advance(1);
            cursor.find_consume_or_error(TokenKind::FatArrow)?;
            default_body = Some(parse_body(cursor)?);
        } else {
            let pattern = expr::parse_expr(cursor)?;
            cursor.find_consume_or_error(TokenKind::FatArrow)?;
            let body = parse_body(cursor)?;
            arms.push((pattern, body));
        }
    }

    match default_body {
        Some(default_body) => Ok(CasesBlock {
            arms,
            default_body: Box::new(default_body),
        }),
        None => Err(Error::new(ErrorImpl::MissingDefaultCase, label)),
    }
}

/// `@( entry* )` — a resource declaration. Entries are classified path
/// literals (with an optional `: Type`), `name <- expr` bindings, or a
/// bracketed external package list.
fn parse_resource(cursor: &mut Cursor) -> Result<Node, Error> {
    cursor.take_marker(TokenKind::At);
    cursor.find_consume_or_error(TokenKind::OpenParen)?;

    let mut entries = Vec::new();
    loop {
        cursor.skip_insignificant();
        if cursor.consume_if(TokenKind::CloseParen) {
            break;
        }
        if cursor.consume_if(TokenKind::Comma) {
            continue;
        }

        match cursor.current_kind() {
            TokenKind::String => {
                let raw = cursor.current().text.clone();
                cursor.advance(1);
                cursor.skip_insignificant();
                let ty = if cursor.consume_if(TokenKind::Colon) {
                    Some(parse_type(cursor)?)
                } else {
                    None
                };
                entries.push(classify_resource(&raw, ty));
            }
            TokenKind::OpenBracket => {
                cursor.advance(1);
                let mut packages = Vec::new();
                loop {
                    cursor.skip_insignificant();
                    if cursor.consume_if(TokenKind::CloseBracket) {
                        break;
                    }
                    if cursor.consume_if(TokenKind::Comma) {
                        continue;
                    }
                    if !cursor.check(TokenKind::String) {
                        return Err(cursor.unexpected());
                    }
                    packages.push(cursor.current().text.clone());
                    cursor.advance(1);
                }
                entries.push(Node::ExternalPackageList(packages));
            }
            TokenKind::Name => {
                let name = cursor.current().text.clone();
                cursor.advance(1);
                cursor.find_consume_or_error(TokenKind::BackArrow)?;
                let value = Box::new(expr::parse_expr(cursor)?);
                entries.push(Node::ResourceBind { name, value });
            }
            _ => return Err(cursor.unexpected()),
        }
    }

    Ok(Node::Resource { entries })
}

/// `$` at statement position: `$Name { fields }` defines a struct,
/// `$"..."` is a format-string expression statement.
fn parse_dollar_stmt(cursor: &mut Cursor) -> Result<Node, Error> {
    cursor.take_marker(TokenKind::Dollar);
    cursor.skip_insignificant();

    match cursor.current_kind() {
        TokenKind::Name => {
            let name = cursor.current().text.clone();
            cursor.advance(1);
            cursor.skip_insignificant();
            if !cursor.check(TokenKind::OpenCurly) {
                return Err(cursor.unexpected());
            }
            let fields = parse_typed_fields(cursor)?;
            Ok(Node::StructDef { name, fields })
        }
        TokenKind::String => expr::finish_format_string(cursor),
        _ => Err(cursor.unexpected()),
    }
}

/// `>_(args)`.
fn parse_print(cursor: &mut Cursor) -> Result<Node, Error> {
    cursor.take_marker(TokenKind::PrintArrow);
    cursor.find_consume_or_error(TokenKind::OpenParen)?;
    let args = expr::parse_call_args(cursor)?;
    Ok(Node::Print(args))
}

/// `<< expr?`. The value, when present, must start on the same line.
fn parse_return(cursor: &mut Cursor) -> Result<Node, Error> {
    cursor.take_marker(TokenKind::ShiftLeft);
    cursor.skip_spaces();

    let value = match cursor.current_kind() {
        TokenKind::EOF
        | TokenKind::LineFeed
        | TokenKind::CarriageReturn
        | TokenKind::CloseCurly
        | TokenKind::LineComment
        | TokenKind::BlockComment => None,
        _ => Some(Box::new(expr::parse_expr(cursor)?)),
    };

    Ok(Node::Return(value))
}
