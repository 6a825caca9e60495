//! The cursor: a stateful view over the token stream.
//!
//! All grammar rules share one cursor through `&mut` and use its
//! primitives for lookahead, consumption and source-position bookkeeping.
//! Positions are derived by summing the lengths of consumed tokens, which
//! is why `Token::length` is authoritative.

use std::collections::HashMap;
use std::rc::Rc;

use crate::{
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    LineTable, SourceLabel,
};

pub struct Cursor {
    /// The token stream, always terminated by an EOF token.
    tokens: Vec<Token>,
    /// Current position in the token stream. Never exceeds the index of
    /// the EOF token.
    index: usize,
    /// Byte offset of the current token in the source text. Used for
    /// diagnostics only.
    byte_offset: usize,
    /// The full source text, kept for error excerpts.
    source: String,
    /// Byte offset -> (line, column), built once at construction.
    line_table: LineTable,
    /// The name of the source file being parsed.
    file: Rc<String>,
    /// Binding powers for the arithmetic expression grammar.
    bp_lookup: HashMap<TokenKind, u8>,
    /// Binding powers for the boolean condition grammar.
    cond_bp_lookup: HashMap<TokenKind, u8>,
}

impl Cursor {
    pub fn new(tokens: Vec<Token>, source: &str, file: Rc<String>) -> Self {
        let line_table = LineTable::new(source);
        Cursor {
            tokens,
            index: 0,
            byte_offset: 0,
            source: String::from(source),
            line_table,
            file,
            bp_lookup: HashMap::new(),
            cond_bp_lookup: HashMap::new(),
        }
    }

    /// Returns the current token without consuming it.
    pub fn current(&self) -> &Token {
        &self.tokens[self.index]
    }

    /// Returns the kind of the current token.
    pub fn current_kind(&self) -> TokenKind {
        self.tokens[self.index].kind
    }

    pub fn at_eof(&self) -> bool {
        self.current_kind() == TokenKind::EOF
    }

    /// Consumes `n` tokens. Advancing past the end is a parser bug.
    pub fn advance(&mut self, n: usize) {
        for _ in 0..n {
            assert!(
                self.index + 1 < self.tokens.len(),
                "cursor advanced past end of input"
            );
            self.byte_offset += self.tokens[self.index].length;
            self.index += 1;
        }
    }

    /// Advances past any run of whitespace, newline and comment tokens.
    /// Idempotent.
    pub fn skip_insignificant(&mut self) {
        while self.current_kind().is_insignificant() {
            self.advance(1);
        }
    }

    /// Advances past whitespace and newlines only. Comments stay put, so
    /// statement dispatch can turn them into `Comment` nodes.
    pub fn skip_blank(&mut self) {
        while matches!(
            self.current_kind(),
            TokenKind::Space | TokenKind::CarriageReturn | TokenKind::LineFeed
        ) {
            self.advance(1);
        }
    }

    /// Advances past spaces and tabs only; newlines stay put.
    pub fn skip_spaces(&mut self) {
        while self.current_kind() == TokenKind::Space {
            self.advance(1);
        }
    }

    /// True iff the current token (no skip) has the given kind.
    pub fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Consumes the current token and returns true iff it has the given
    /// kind.
    pub fn consume_if(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance(1);
            true
        } else {
            false
        }
    }

    /// Like `consume_if`, but a mismatch is a descriptive error carrying a
    /// caret-annotated source excerpt.
    pub fn expect(&mut self, kind: TokenKind) -> Result<(), Error> {
        if self.check(kind) {
            self.advance(1);
            Ok(())
        } else if self.at_eof() {
            Err(Error::new(ErrorImpl::UnexpectedEndOfInput, self.mark()))
        } else {
            Err(Error::new(
                ErrorImpl::ExpectedToken {
                    expected: String::from(kind.symbol()),
                    found: self.current().text.clone(),
                },
                self.mark(),
            ))
        }
    }

    /// Scans forward through insignificant tokens looking for `kind`.
    /// Consumes everything up to and including it on success; consumes
    /// nothing on failure. This is what lets arbitrary blank lines and
    /// comments sit between a construct and its continuation.
    pub fn find_consume(&mut self, kind: TokenKind) -> bool {
        let mut probe = self.index;
        while self.tokens[probe].kind.is_insignificant() {
            probe += 1;
        }
        if self.tokens[probe].kind == kind {
            self.advance(probe - self.index + 1);
            true
        } else {
            false
        }
    }

    pub fn find_consume_or_error(&mut self, kind: TokenKind) -> Result<(), Error> {
        if self.find_consume(kind) {
            return Ok(());
        }

        // Report at the first significant token, where the expected one
        // should have been.
        let mut probe = self.index;
        let mut offset = self.byte_offset;
        while self.tokens[probe].kind.is_insignificant() {
            offset += self.tokens[probe].length;
            probe += 1;
        }

        if self.tokens[probe].kind == TokenKind::EOF {
            Err(Error::new(
                ErrorImpl::UnexpectedEndOfInput,
                self.label_at(offset),
            ))
        } else {
            Err(Error::new(
                ErrorImpl::ExpectedToken {
                    expected: String::from(kind.symbol()),
                    found: self.tokens[probe].text.clone(),
                },
                self.label_at(offset),
            ))
        }
    }

    /// Captures line, column and the physical source line for the current
    /// token, for error messages.
    pub fn mark(&self) -> SourceLabel {
        self.label_at(self.byte_offset)
    }

    fn label_at(&self, offset: usize) -> SourceLabel {
        SourceLabel {
            pos: self.line_table.locate(offset),
            line_text: String::from(self.line_table.line_text(&self.source, offset)),
            file: Rc::clone(&self.file),
        }
    }

    /// Kind of the next significant token, without consuming anything.
    pub fn peek_significant_kind(&self) -> TokenKind {
        let mut probe = self.index;
        while self.tokens[probe].kind.is_insignificant() {
            probe += 1;
        }
        self.tokens[probe].kind
    }

    /// Kind of the n-th significant token from the current position
    /// (0 = the current one if significant). Lookahead only.
    pub fn nth_significant_kind(&self, n: usize) -> TokenKind {
        let mut probe = self.index;
        let mut seen = 0;
        loop {
            while self.tokens[probe].kind.is_insignificant() {
                probe += 1;
            }
            if seen == n || self.tokens[probe].kind == TokenKind::EOF {
                return self.tokens[probe].kind;
            }
            probe += 1;
            seen += 1;
        }
    }

    /// Consumes a marker token the caller has already verified is present.
    /// Entering a rule without its marker is a bug in the parser itself,
    /// not a recoverable parse error.
    pub fn take_marker(&mut self, kind: TokenKind) {
        assert!(
            self.check(kind),
            "grammar rule entered without its `{}` marker",
            kind.symbol()
        );
        self.advance(1);
    }

    /// An unexpected-token error at the current position.
    pub fn unexpected(&self) -> Error {
        if self.at_eof() {
            Error::new(ErrorImpl::UnexpectedEndOfInput, self.mark())
        } else {
            Error::new(
                ErrorImpl::UnexpectedToken {
                    token: self.current().text.clone(),
                },
                self.mark(),
            )
        }
    }

    /// Registers a binary operator with its binding power.
    pub fn binary_op(&mut self, kind: TokenKind, binding_power: u8) {
        self.bp_lookup.insert(kind, binding_power);
    }

    /// Registers a condition-grammar operator with its binding power.
    pub fn condition_op(&mut self, kind: TokenKind, binding_power: u8) {
        self.cond_bp_lookup.insert(kind, binding_power);
    }

    pub fn binary_power(&self, kind: TokenKind) -> Option<u8> {
        self.bp_lookup.get(&kind).copied()
    }

    pub fn condition_power(&self, kind: TokenKind) -> Option<u8> {
        self.cond_bp_lookup.get(&kind).copied()
    }
}
