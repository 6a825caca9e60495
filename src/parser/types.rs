//! Type-annotation parsing.
//!
//! Handles the `: Type` annotations on bindings, parameters, struct
//! fields and function return types. Types are plain names; nothing here
//! validates that a type exists — that is the inference pass's problem.

use crate::{
    ast::types::{TypeRef, TypedParam},
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::cursor::Cursor;

pub fn parse_type(cursor: &mut Cursor) -> Result<TypeRef, Error> {
    cursor.skip_insignificant();
    if !cursor.check(TokenKind::Name) {
        return Err(cursor.unexpected());
    }
    let name = cursor.current().text.clone();
    cursor.advance(1);
    Ok(TypeRef { name })
}

/// Parses `(a, b: Int, ...)`. The caller has already verified the `(`.
pub fn parse_param_tuple(cursor: &mut Cursor) -> Result<Vec<TypedParam>, Error> {
    cursor.take_marker(TokenKind::OpenParen);

    let mut params = Vec::new();
    loop {
        cursor.skip_insignificant();
        if cursor.consume_if(TokenKind::CloseParen) {
            break;
        }
        if cursor.consume_if(TokenKind::Comma) {
            continue;
        }
        if !cursor.check(TokenKind::Name) {
            return Err(cursor.unexpected());
        }
        let name = cursor.current().text.clone();
        cursor.advance(1);

        cursor.skip_insignificant();
        let ty = if cursor.consume_if(TokenKind::Colon) {
            Some(parse_type(cursor)?)
        } else {
            None
        };

        params.push(TypedParam { name, ty });
    }

    Ok(params)
}

/// Parses `{ field: Type, ... }` for struct definitions. Field types are
/// mandatory. The caller has already verified the `{`.
pub fn parse_typed_fields(cursor: &mut Cursor) -> Result<Vec<TypedParam>, Error> {
    cursor.take_marker(TokenKind::OpenCurly);

    let mut fields = Vec::new();
    loop {
        cursor.skip_insignificant();
        if cursor.consume_if(TokenKind::CloseCurly) {
            break;
        }
        if cursor.consume_if(TokenKind::Comma) {
            continue;
        }
        if !cursor.check(TokenKind::Name) {
            return Err(cursor.unexpected());
        }
        let name = cursor.current().text.clone();
        cursor.advance(1);

        cursor.skip_insignificant();
        cursor.expect(TokenKind::Colon)?;
        let ty = parse_type(cursor)?;

        fields.push(TypedParam { name, ty: Some(ty) });
    }

    Ok(fields)
}
