//! Lexical analysis module for the compiler front end.
//!
//! This module contains the lexer (tokenizer) that converts source code
//! into a flat, order-preserving token stream for parsing. It handles:
//!
//! - Tokenization of source code using an ordered regex pattern table
//! - Recognition of names, literals, and multi-character operators
//!   (merged by maximal munch)
//! - Whitespace, line breaks and comments as first-class tokens
//! - Unrecognized bytes as `Unknown` tokens — tokenizing never fails

pub mod lexer;
pub mod tokens;
