//! Expression parsing: precedence climbing plus the expression-level
//! grammar (collections, postfix chains, list operations, format strings,
//! pipelines, iteration).
//!
//! `parse_primary` parses one atomic operand. `parse_binary_rhs` is the
//! precedence climber: given a parsed left operand and the operator that
//! introduced it, it builds the correctly nested tree from the cursor-owned
//! binding-power table, folding left on ties. `parse_condition` is the
//! structurally separate grammar for boolean expressions over its own,
//! smaller table.

use crate::{
    ast::{
        ast::Node,
        expressions::{BinOpKind, CodpStage, CompareOp, ListOpKind, LogicOp},
        types::classify_resource,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::{lexer::tokenize, tokens::TokenKind},
    SourceLabel,
};

use super::{cursor::Cursor, lookups::create_token_lookups, stmt, types::parse_param_tuple};

pub fn parse_expr(cursor: &mut Cursor) -> Result<Node, Error> {
    cursor.skip_insignificant();
    let lhs = parse_primary(cursor)?;
    parse_expr_rest(cursor, lhs)
}

/// Continues an expression after its first operand: binary operators
/// first, then the loosest-binding `>>` iteration forms.
fn parse_expr_rest(cursor: &mut Cursor, lhs: Node) -> Result<Node, Error> {
    let mut node = lhs;

    while let Some(op) = peek_binary_op(cursor) {
        consume_operator(cursor, op);
        node = parse_binary_rhs(cursor, node, op)?;
    }

    while cursor.peek_significant_kind() == TokenKind::ShiftRight {
        consume_operator(cursor, TokenKind::ShiftRight);
        node = parse_iteration(cursor, node)?;
    }

    Ok(node)
}

/// Precedence climbing. `op` has already been consumed and applies between
/// `lhs` and the operand parsed here. A tighter-binding next operator owns
/// the new operand, so the right subtree is built first; an equal-power
/// next operator folds now, which is what makes ties left-associative
/// (`**` included). A looser operator is left for the caller.
pub fn parse_binary_rhs(cursor: &mut Cursor, lhs: Node, op: TokenKind) -> Result<Node, Error> {
    cursor.skip_insignificant();
    let mut rhs = parse_primary(cursor)?;

    while let Some(next) = peek_binary_op(cursor) {
        if power(cursor, next) <= power(cursor, op) {
            break;
        }
        consume_operator(cursor, next);
        rhs = parse_binary_rhs(cursor, rhs, next)?;
    }

    let folded = fold_binary(op, lhs, rhs);

    match peek_binary_op(cursor) {
        Some(next) if power(cursor, next) == power(cursor, op) => {
            consume_operator(cursor, next);
            parse_binary_rhs(cursor, folded, next)
        }
        _ => Ok(folded),
    }
}

fn power(cursor: &Cursor, kind: TokenKind) -> u8 {
    cursor.binary_power(kind).unwrap_or(0)
}

fn peek_binary_op(cursor: &Cursor) -> Option<TokenKind> {
    let kind = cursor.peek_significant_kind();
    cursor.binary_power(kind).map(|_| kind)
}

/// Consumes an operator the caller has just peeked, together with any
/// insignificant tokens in front of it.
fn consume_operator(cursor: &mut Cursor, kind: TokenKind) {
    let found = cursor.find_consume(kind);
    debug_assert!(found, "peeked operator vanished");
}

fn fold_binary(op: TokenKind, lhs: Node, rhs: Node) -> Node {
    let op = match op {
        TokenKind::Plus => BinOpKind::Add,
        TokenKind::Dash => BinOpKind::Sub,
        TokenKind::Star => BinOpKind::Mul,
        TokenKind::Slash => BinOpKind::Div,
        TokenKind::Percent => BinOpKind::Mod,
        TokenKind::Power => BinOpKind::Pow,
        other => panic!("`{}` is not a binary operator", other.symbol()),
    };
    Node::BinOp {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

/// Parses one atomic operand, with its tight postfix forms (call, index,
/// attribute chain) already attached.
pub fn parse_primary(cursor: &mut Cursor) -> Result<Node, Error> {
    cursor.skip_insignificant();

    let node = match cursor.current_kind() {
        TokenKind::Integer => {
            let label = cursor.mark();
            let text = cursor.current().text.clone();
            cursor.advance(1);
            match text.parse::<i64>() {
                Ok(value) => Node::Int(value),
                Err(_) => {
                    return Err(Error::new(ErrorImpl::NumberParseError { token: text }, label))
                }
            }
        }
        TokenKind::Decimal => {
            let label = cursor.mark();
            let text = cursor.current().text.clone();
            cursor.advance(1);
            match text.parse::<f64>() {
                Ok(value) => Node::Float(value),
                Err(_) => {
                    return Err(Error::new(ErrorImpl::NumberParseError { token: text }, label))
                }
            }
        }
        TokenKind::String => {
            let text = cursor.current().text.clone();
            cursor.advance(1);
            Node::Str(text)
        }
        TokenKind::Char => {
            let text = cursor.current().text.clone();
            cursor.advance(1);
            let c = text
                .chars()
                .next()
                .expect("lexer produces Char tokens with exactly one character");
            Node::Char(c)
        }
        TokenKind::Name => parse_name(cursor)?,
        TokenKind::OpenParen => parse_paren(cursor)?,
        TokenKind::OpenBracket => parse_bracket(cursor)?,
        TokenKind::OpenCurly => parse_set(cursor)?,
        TokenKind::Pipe => parse_sizeof(cursor)?,
        TokenKind::Dollar => parse_dollar(cursor)?,
        TokenKind::BackArrow => parse_read_file(cursor)?,
        TokenKind::Hash => stmt::parse_hash(cursor)?,
        TokenKind::Not => parse_not(cursor)?,
        _ => return Err(cursor.unexpected()),
    };

    parse_postfix(cursor, node)
}

/// Known pipeline stage names. Any other name followed by `{` at a stage
/// position is recognized but unsupported.
const CODP_STAGES: [&str; 4] = ["filter", "sort", "map", "slice"];

fn parse_name(cursor: &mut Cursor) -> Result<Node, Error> {
    let text = cursor.current().text.clone();
    cursor.advance(1);

    match text.as_str() {
        "true" => Ok(Node::Bool(true)),
        "false" => Ok(Node::Bool(false)),
        "none" => Ok(Node::None),
        _ => {
            if CODP_STAGES.contains(&text.as_str())
                && cursor.peek_significant_kind() == TokenKind::OpenCurly
            {
                parse_codp(cursor, text)
            } else {
                Ok(Node::Name(text))
            }
        }
    }
}

/// `(` → the unit literal, a parenthesized expression, a tuple, or a
/// parameter tuple (when a `name :` follows the paren).
fn parse_paren(cursor: &mut Cursor) -> Result<Node, Error> {
    if cursor.nth_significant_kind(1) == TokenKind::Name
        && cursor.nth_significant_kind(2) == TokenKind::Colon
    {
        let params = parse_param_tuple(cursor)?;
        return Ok(Node::ParamTuple(params));
    }

    cursor.take_marker(TokenKind::OpenParen);
    cursor.skip_insignificant();

    if cursor.consume_if(TokenKind::CloseParen) {
        return Ok(Node::Empty);
    }

    let first = parse_expr(cursor)?;
    cursor.skip_insignificant();

    if cursor.check(TokenKind::Comma) {
        let mut elements = vec![first];
        while cursor.consume_if(TokenKind::Comma) {
            cursor.skip_insignificant();
            if cursor.check(TokenKind::CloseParen) {
                break;
            }
            elements.push(parse_expr(cursor)?);
            cursor.skip_insignificant();
        }
        cursor.expect(TokenKind::CloseParen)?;
        Ok(Node::Tuple(elements))
    } else {
        cursor.expect(TokenKind::CloseParen)?;
        Ok(first)
    }
}

/// `[` → an empty list, the `[...]` infinite-loop marker, a range, or a
/// list literal. Resolved by parsing the first element eagerly and
/// branching on what follows it.
fn parse_bracket(cursor: &mut Cursor) -> Result<Node, Error> {
    cursor.take_marker(TokenKind::OpenBracket);
    cursor.skip_insignificant();

    if cursor.consume_if(TokenKind::CloseBracket) {
        return Ok(Node::List(vec![]));
    }

    if cursor.consume_if(TokenKind::Ellipsis) {
        cursor.skip_insignificant();
        cursor.expect(TokenKind::CloseBracket)?;
        return Ok(Node::InfiniteLoop { body: None });
    }

    let first = parse_expr(cursor)?;
    cursor.skip_insignificant();

    if cursor.consume_if(TokenKind::DotDot) {
        let end = parse_expr(cursor)?;
        cursor.skip_insignificant();
        cursor.expect(TokenKind::CloseBracket)?;
        return Ok(Node::Range {
            start: Box::new(first),
            end: Box::new(end),
        });
    }

    let mut elements = vec![first];
    while cursor.consume_if(TokenKind::Comma) {
        cursor.skip_insignificant();
        if cursor.check(TokenKind::CloseBracket) {
            break;
        }
        elements.push(parse_expr(cursor)?);
        cursor.skip_insignificant();
    }
    cursor.expect(TokenKind::CloseBracket)?;
    Ok(Node::List(elements))
}

/// `{a, b}` in expression position is a set literal.
fn parse_set(cursor: &mut Cursor) -> Result<Node, Error> {
    cursor.take_marker(TokenKind::OpenCurly);

    let mut elements = Vec::new();
    loop {
        cursor.skip_insignificant();
        if cursor.consume_if(TokenKind::CloseCurly) {
            break;
        }
        if cursor.consume_if(TokenKind::Comma) {
            continue;
        }
        elements.push(parse_expr(cursor)?);
    }

    Ok(Node::Set(elements))
}

/// `|expr|`.
fn parse_sizeof(cursor: &mut Cursor) -> Result<Node, Error> {
    cursor.take_marker(TokenKind::Pipe);
    let inner = parse_expr(cursor)?;
    cursor.skip_insignificant();
    cursor.expect(TokenKind::Pipe)?;
    Ok(Node::SizeOf(Box::new(inner)))
}

/// `<- "path"`: reads the classified resource.
fn parse_read_file(cursor: &mut Cursor) -> Result<Node, Error> {
    cursor.take_marker(TokenKind::BackArrow);
    cursor.skip_insignificant();
    if !cursor.check(TokenKind::String) {
        return Err(cursor.unexpected());
    }
    let raw = cursor.current().text.clone();
    cursor.advance(1);
    Ok(Node::ReadFile(Box::new(classify_resource(&raw, None))))
}

/// `$` in expression position: only a format string can follow.
fn parse_dollar(cursor: &mut Cursor) -> Result<Node, Error> {
    cursor.take_marker(TokenKind::Dollar);
    finish_format_string(cursor)
}

/// Parses the string token of a `$"..."` format string into alternating
/// literal fragments and embedded expressions. `{{` and `}}` are literal
/// braces; an unescaped `}` with no matching `{` is a hard error. The
/// `$` has already been consumed.
pub fn finish_format_string(cursor: &mut Cursor) -> Result<Node, Error> {
    cursor.skip_insignificant();
    if !cursor.check(TokenKind::String) {
        return Err(cursor.unexpected());
    }
    let label = cursor.mark();
    let raw = cursor.current().text.clone();
    cursor.advance(1);

    let mut fragments = Vec::new();
    let mut exprs = Vec::new();
    let mut current = String::new();
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                current.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                current.push('}');
            }
            '}' => return Err(Error::new(ErrorImpl::UnmatchedFormatBrace, label)),
            '{' => {
                let mut inner = String::new();
                let mut depth = 1;
                loop {
                    match chars.next() {
                        Some('{') => {
                            depth += 1;
                            inner.push('{');
                        }
                        Some('}') => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                            inner.push('}');
                        }
                        Some(inner_char) => inner.push(inner_char),
                        None => {
                            return Err(Error::new(ErrorImpl::UnmatchedFormatBrace, label));
                        }
                    }
                }
                fragments.push(std::mem::take(&mut current));
                exprs.push(parse_embedded_expr(&inner, &label)?);
            }
            _ => current.push(c),
        }
    }
    fragments.push(current);

    Ok(Node::FormatString { fragments, exprs })
}

/// Sub-parses one `{expr}` embed through the ordinary pipeline. Errors
/// inside the embed are reported at the format string's own label.
fn parse_embedded_expr(inner: &str, label: &SourceLabel) -> Result<Node, Error> {
    let tokens = tokenize(inner);
    let mut sub = Cursor::new(tokens, inner, label.file.clone());
    create_token_lookups(&mut sub);
    let expr = parse_expr(&mut sub)?;
    sub.skip_insignificant();
    if !sub.at_eof() {
        return Err(Error::new(
            ErrorImpl::UnexpectedToken {
                token: sub.current().text.clone(),
            },
            label.clone(),
        ));
    }
    Ok(expr)
}

/// `!(cond)` — negation over the condition grammar.
pub fn parse_not(cursor: &mut Cursor) -> Result<Node, Error> {
    cursor.take_marker(TokenKind::Not);
    cursor.find_consume_or_error(TokenKind::OpenParen)?;
    let cond = parse_condition(cursor)?;
    cursor.skip_insignificant();
    cursor.expect(TokenKind::CloseParen)?;
    Ok(Node::Not(Box::new(cond)))
}

fn is_callable(node: &Node) -> bool {
    matches!(
        node,
        Node::Name(_) | Node::Attribute { .. } | Node::ChainedCall { .. } | Node::Call { .. }
    )
}

fn is_indexable(node: &Node) -> bool {
    matches!(
        node,
        Node::Name(_)
            | Node::List(_)
            | Node::ListOp { .. }
            | Node::Attribute { .. }
            | Node::Call { .. }
            | Node::ChainedCall { .. }
    )
}

fn is_accessible(node: &Node) -> bool {
    is_indexable(node) || matches!(node, Node::Str(_))
}

/// The tight postfix forms: `f(...)`, `a[...]`, `a.b`, `a.b(1).c(2)`.
fn parse_postfix(cursor: &mut Cursor, base: Node) -> Result<Node, Error> {
    let mut node = base;
    loop {
        match cursor.peek_significant_kind() {
            TokenKind::OpenParen if is_callable(&node) => {
                consume_operator(cursor, TokenKind::OpenParen);
                let args = parse_call_args(cursor)?;
                node = Node::Call {
                    callee: Box::new(node),
                    args,
                };
            }
            TokenKind::OpenBracket if is_indexable(&node) => {
                consume_operator(cursor, TokenKind::OpenBracket);
                let op = parse_list_op_body(cursor)?;
                node = Node::ListOp {
                    object: Box::new(node),
                    op,
                };
            }
            TokenKind::Dot if is_accessible(&node) => {
                consume_operator(cursor, TokenKind::Dot);
                cursor.skip_insignificant();
                if !cursor.check(TokenKind::Name) {
                    return Err(cursor.unexpected());
                }
                let attr = cursor.current().text.clone();
                cursor.advance(1);

                if cursor.peek_significant_kind() == TokenKind::OpenParen {
                    consume_operator(cursor, TokenKind::OpenParen);
                    let args = parse_call_args(cursor)?;
                    node = match node {
                        Node::ChainedCall { base, mut links } => {
                            links.push((attr, Some(args)));
                            Node::ChainedCall { base, links }
                        }
                        other => Node::ChainedCall {
                            base: Box::new(other),
                            links: vec![(attr, Some(args))],
                        },
                    };
                } else {
                    node = match node {
                        Node::ChainedCall { base, mut links } => {
                            links.push((attr, None));
                            Node::ChainedCall { base, links }
                        }
                        other => Node::Attribute {
                            object: Box::new(other),
                            attr,
                        },
                    };
                }
            }
            _ => break,
        }
    }
    Ok(node)
}

/// Comma-separated arguments up to and including the closing `)`. The
/// opening `(` has already been consumed.
pub fn parse_call_args(cursor: &mut Cursor) -> Result<Vec<Node>, Error> {
    let mut args = Vec::new();
    loop {
        cursor.skip_insignificant();
        if cursor.check(TokenKind::CloseParen) {
            break;
        }
        if cursor.consume_if(TokenKind::Comma) {
            continue;
        }
        args.push(parse_expr(cursor)?);
    }
    cursor.expect(TokenKind::CloseParen)?;
    Ok(args)
}

/// The bracket mini-language, after the `[` has been consumed. Single
/// dispatch on the first significant token.
fn parse_list_op_body(cursor: &mut Cursor) -> Result<ListOpKind, Error> {
    cursor.skip_insignificant();

    let op = match cursor.current_kind() {
        TokenKind::Less => {
            cursor.advance(1);
            ListOpKind::Reversed
        }
        TokenKind::String => {
            let name = cursor.current().text.clone();
            cursor.advance(1);
            ListOpKind::AccessByName(name)
        }
        TokenKind::QuestionEquals => {
            cursor.advance(1);
            let value = parse_expr(cursor)?;
            ListOpKind::GetIndexByValue(Box::new(value))
        }
        TokenKind::QuestionHat => {
            cursor.advance(1);
            ListOpKind::GetIndicesByValues(parse_value_group(cursor)?)
        }
        TokenKind::Caret => {
            cursor.advance(1);
            let index = parse_expr(cursor)?;
            if cursor.find_consume(TokenKind::BackArrow) {
                let value = parse_expr(cursor)?;
                ListOpKind::Insert {
                    index: Box::new(index),
                    value: Box::new(value),
                }
            } else {
                ListOpKind::AccessByIndex(Box::new(index))
            }
        }
        TokenKind::AppendColon => {
            cursor.advance(1);
            let value = parse_expr(cursor)?;
            ListOpKind::Append(Box::new(value))
        }
        TokenKind::RemoveColon => {
            cursor.advance(1);
            cursor.skip_insignificant();
            match cursor.current_kind() {
                TokenKind::Caret => {
                    cursor.advance(1);
                    let target = parse_expr(cursor)?;
                    match target {
                        Node::Tuple(indices) | Node::List(indices) => {
                            ListOpKind::RemoveByIndices(indices)
                        }
                        single => ListOpKind::RemoveByIndex(Box::new(single)),
                    }
                }
                TokenKind::QuestionEquals => {
                    cursor.advance(1);
                    let value = parse_expr(cursor)?;
                    ListOpKind::RemoveByValue(Box::new(value))
                }
                TokenKind::QuestionHat => {
                    cursor.advance(1);
                    ListOpKind::RemoveByValues(parse_value_group(cursor)?)
                }
                _ => return Err(cursor.unexpected()),
            }
        }
        _ => {
            let index = parse_expr(cursor)?;
            ListOpKind::AccessByIndex(Box::new(index))
        }
    };

    cursor.skip_insignificant();
    cursor.expect(TokenKind::CloseBracket)?;
    Ok(op)
}

/// A group of values for the `?^` many-value forms: a tuple or list is
/// flattened into its elements, anything else is a group of one.
fn parse_value_group(cursor: &mut Cursor) -> Result<Vec<Node>, Error> {
    let group = parse_expr(cursor)?;
    Ok(match group {
        Node::Tuple(elements) | Node::List(elements) => elements,
        single => vec![single],
    })
}

/// Everything after a consumed `>>`: an iterator body, a hashtag pipeline,
/// or the body of an infinite loop.
fn parse_iteration(cursor: &mut Cursor, collection: Node) -> Result<Node, Error> {
    cursor.skip_insignificant();

    let is_infinite = matches!(collection, Node::InfiniteLoop { body: None });

    match cursor.current_kind() {
        TokenKind::Hash => {
            cursor.take_marker(TokenKind::Hash);
            cursor.skip_insignificant();
            let params = if cursor.check(TokenKind::OpenParen) {
                Some(parse_param_tuple(cursor)?)
            } else {
                None
            };
            cursor.find_consume_or_error(TokenKind::FatArrow)?;
            let body = stmt::parse_body(cursor)?;

            if is_infinite {
                Ok(Node::InfiniteLoop {
                    body: Some(Box::new(Node::Forward {
                        params,
                        kind: crate::ast::statements::ForwardKind::Plain(Box::new(body)),
                    })),
                })
            } else {
                Ok(Node::Iterator {
                    collection: Box::new(collection),
                    params,
                    body: Box::new(body),
                })
            }
        }
        TokenKind::OpenBracket => {
            cursor.take_marker(TokenKind::OpenBracket);
            let mut stages = Vec::new();
            loop {
                cursor.skip_insignificant();
                if cursor.consume_if(TokenKind::CloseBracket) {
                    break;
                }
                if cursor.consume_if(TokenKind::Comma) {
                    continue;
                }
                cursor.expect(TokenKind::Hash)?;
                cursor.skip_insignificant();
                if !cursor.check(TokenKind::Name) {
                    return Err(cursor.unexpected());
                }
                stages.push(cursor.current().text.clone());
                cursor.advance(1);
            }
            Ok(Node::IteratorSequence {
                collection: Box::new(collection),
                stages,
            })
        }
        TokenKind::OpenCurly => {
            let body = stmt::parse_block(cursor)?;
            if is_infinite {
                Ok(Node::InfiniteLoop {
                    body: Some(Box::new(body)),
                })
            } else {
                Ok(Node::Iterator {
                    collection: Box::new(collection),
                    params: None,
                    body: Box::new(body),
                })
            }
        }
        _ => Err(cursor.unexpected()),
    }
}

/// A chain-of-data-processing pipeline, entered at the first stage name
/// (already consumed). Stages link by `=>`.
fn parse_codp(cursor: &mut Cursor, first: String) -> Result<Node, Error> {
    let mut stages = vec![parse_codp_stage(cursor, first)?];

    while cursor.peek_significant_kind() == TokenKind::FatArrow {
        consume_operator(cursor, TokenKind::FatArrow);
        cursor.skip_insignificant();
        if !cursor.check(TokenKind::Name) {
            return Err(cursor.unexpected());
        }
        let name = cursor.current().text.clone();
        cursor.advance(1);
        stages.push(parse_codp_stage(cursor, name)?);
    }

    Ok(Node::Codp { stages })
}

/// One pipeline stage. The stage name fixes the argument shape; a name
/// outside the known four is recognized but not implemented.
fn parse_codp_stage(cursor: &mut Cursor, name: String) -> Result<CodpStage, Error> {
    let label = cursor.mark();
    cursor.find_consume_or_error(TokenKind::OpenCurly)?;

    match name.as_str() {
        "filter" => {
            let cond = parse_condition(cursor)?;
            cursor.skip_insignificant();
            cursor.expect(TokenKind::CloseCurly)?;
            Ok(CodpStage::Filter(Box::new(cond)))
        }
        "sort" | "map" | "slice" => {
            let mut args = Vec::new();
            loop {
                cursor.skip_insignificant();
                if cursor.check(TokenKind::CloseCurly) {
                    break;
                }
                if cursor.consume_if(TokenKind::Comma) {
                    continue;
                }
                args.push(parse_expr(cursor)?);
            }
            if args.is_empty() {
                return Err(cursor.unexpected());
            }
            cursor.expect(TokenKind::CloseCurly)?;
            Ok(match name.as_str() {
                "sort" => CodpStage::Sort(args),
                "map" => CodpStage::Map(args),
                _ => CodpStage::Slice(args),
            })
        }
        other => Err(Error::new(
            ErrorImpl::UnsupportedConstruct {
                construct: format!("pipeline stage `{}`", other),
            },
            label,
        )),
    }
}

/// The structurally separate grammar for boolean expressions: `&&`, `||`,
/// `^` (logical xor), `!(...)` and the six comparison operators, built the
/// same way as the arithmetic engine but over its own smaller table.
/// Terminates naturally at `)`, `=>` or a `\` branch marker, none of which
/// are operators in either table.
pub fn parse_condition(cursor: &mut Cursor) -> Result<Node, Error> {
    cursor.skip_insignificant();
    let mut node = parse_cond_operand(cursor)?;

    while let Some(op) = peek_condition_op(cursor) {
        consume_operator(cursor, op);
        node = parse_condition_rhs(cursor, node, op)?;
    }

    Ok(node)
}

fn parse_condition_rhs(cursor: &mut Cursor, lhs: Node, op: TokenKind) -> Result<Node, Error> {
    cursor.skip_insignificant();
    let mut rhs = parse_cond_operand(cursor)?;

    while let Some(next) = peek_condition_op(cursor) {
        if cond_power(cursor, next) <= cond_power(cursor, op) {
            break;
        }
        consume_operator(cursor, next);
        rhs = parse_condition_rhs(cursor, rhs, next)?;
    }

    let folded = fold_condition(op, lhs, rhs);

    match peek_condition_op(cursor) {
        Some(next) if cond_power(cursor, next) == cond_power(cursor, op) => {
            consume_operator(cursor, next);
            parse_condition_rhs(cursor, folded, next)
        }
        _ => Ok(folded),
    }
}

fn cond_power(cursor: &Cursor, kind: TokenKind) -> u8 {
    cursor.condition_power(kind).unwrap_or(0)
}

fn peek_condition_op(cursor: &Cursor) -> Option<TokenKind> {
    let kind = cursor.peek_significant_kind();
    cursor.condition_power(kind).map(|_| kind)
}

fn fold_condition(op: TokenKind, lhs: Node, rhs: Node) -> Node {
    let op = match op {
        TokenKind::And => LogicOp::And,
        TokenKind::Or => LogicOp::Or,
        TokenKind::Caret => LogicOp::Xor,
        other => panic!("`{}` is not a condition operator", other.symbol()),
    };
    Node::Logic {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

fn peek_comparison(cursor: &Cursor) -> Option<CompareOp> {
    match cursor.peek_significant_kind() {
        TokenKind::Equals => Some(CompareOp::Eq),
        TokenKind::NotEquals => Some(CompareOp::Ne),
        TokenKind::Greater => Some(CompareOp::Gt),
        TokenKind::GreaterEquals => Some(CompareOp::Ge),
        TokenKind::Less => Some(CompareOp::Lt),
        TokenKind::LessEquals => Some(CompareOp::Le),
        _ => None,
    }
}

fn comparison_token(op: CompareOp) -> TokenKind {
    match op {
        CompareOp::Eq => TokenKind::Equals,
        CompareOp::Ne => TokenKind::NotEquals,
        CompareOp::Gt => TokenKind::Greater,
        CompareOp::Ge => TokenKind::GreaterEquals,
        CompareOp::Lt => TokenKind::Less,
        CompareOp::Le => TokenKind::LessEquals,
    }
}

/// One operand of the condition grammar: a negation, a parenthesized
/// condition (which may still be the left side of arithmetic or a
/// comparison), or an arithmetic expression optionally compared against
/// another.
fn parse_cond_operand(cursor: &mut Cursor) -> Result<Node, Error> {
    cursor.skip_insignificant();

    if cursor.check(TokenKind::Not) {
        return parse_not(cursor);
    }

    let lhs = if cursor.check(TokenKind::OpenParen)
        && cursor.nth_significant_kind(1) != TokenKind::CloseParen
    {
        cursor.take_marker(TokenKind::OpenParen);
        let inner = parse_condition(cursor)?;
        cursor.skip_insignificant();
        cursor.expect(TokenKind::CloseParen)?;

        // `(a + 1) * 2` — the group can still be an arithmetic operand.
        let mut node = inner;
        while let Some(op) = peek_binary_op(cursor) {
            consume_operator(cursor, op);
            node = parse_binary_rhs(cursor, node, op)?;
        }
        node
    } else {
        parse_expr(cursor)?
    };

    if let Some(op) = peek_comparison(cursor) {
        consume_operator(cursor, comparison_token(op));
        cursor.skip_insignificant();
        let rhs = parse_expr(cursor)?;
        return Ok(Node::Comparison {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        });
    }

    Ok(lhs)
}
