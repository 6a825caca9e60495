//! The top-level parse entry point.
//!
//! Builds a cursor over the token stream, installs the operator lookup
//! tables, and folds statements into the braceless main block. The first
//! error anywhere aborts the whole parse — there is no recovery.

use std::rc::Rc;

use crate::{ast::ast::Node, errors::errors::Error, lexer::tokens::Token};

use super::{cursor::Cursor, lookups::create_token_lookups, stmt::parse_stmt};

/// Parses a token stream into the root AST node. `source` is the exact
/// text the tokens were lexed from; it is only used to render error
/// excerpts. The main block terminates at the explicit end-of-file token
/// and drops comment-only statements.
pub fn parse(tokens: Vec<Token>, source: &str, file: Rc<String>) -> Result<Node, Error> {
    let mut cursor = Cursor::new(tokens, source, file);
    create_token_lookups(&mut cursor);

    let mut body = Vec::new();
    loop {
        match parse_stmt(&mut cursor)? {
            Node::Eof => break,
            Node::Comment(_) => {}
            stmt => body.push(stmt),
        }
    }

    Ok(Node::MainBlock(body))
}
