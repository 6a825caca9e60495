//! Unit tests for error handling.
//!
//! This module contains tests for error types and error reporting.

use std::rc::Rc;

use crate::errors::errors::{Error, ErrorImpl, ErrorTip};
use crate::{SourceLabel, SourcePos};

fn label_at(line: usize, column: usize, text: &str) -> SourceLabel {
    SourceLabel {
        pos: SourcePos { line, column },
        line_text: text.to_string(),
        file: Rc::new("test.dft".to_string()),
    }
}

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "@".to_string(),
        },
        label_at(1, 1, "@"),
    );

    assert_eq!(error.get_error_name(), "UnexpectedToken");
}

#[test]
fn test_error_label() {
    let error = Error::new(
        ErrorImpl::UnexpectedEndOfInput,
        label_at(3, 7, "f(1, 2"),
    );

    assert_eq!(error.get_label().pos.line, 3);
    assert_eq!(error.get_label().pos.column, 7);
    assert_eq!(error.get_label().line_text, "f(1, 2");
}

#[test]
fn test_expected_token_error() {
    let error = Error::new(
        ErrorImpl::ExpectedToken {
            expected: ")".to_string(),
            found: "EOF".to_string(),
        },
        label_at(1, 7, "f(1, 2"),
    );

    assert_eq!(error.get_error_name(), "ExpectedToken");

    match error.get_tip() {
        ErrorTip::Suggestion(tip) => {
            assert!(tip.contains("`)`"));
            assert!(tip.contains("`EOF`"));
        }
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_number_parse_error() {
    let error = Error::new(
        ErrorImpl::NumberParseError {
            token: "99999999999999999999".to_string(),
        },
        label_at(1, 1, "99999999999999999999"),
    );

    assert_eq!(error.get_error_name(), "NumberParseError");
}

#[test]
fn test_missing_default_case_error() {
    let error = Error::new(ErrorImpl::MissingDefaultCase, label_at(2, 4, "?= {"));

    assert_eq!(error.get_error_name(), "MissingDefaultCase");
    assert!(!error.is_unsupported());
}

#[test]
fn test_empty_conditional_error() {
    let error = Error::new(ErrorImpl::EmptyConditional, label_at(1, 1, "?(x > 1)"));

    assert_eq!(error.get_error_name(), "EmptyConditional");
}

#[test]
fn test_unmatched_format_brace_error() {
    let error = Error::new(ErrorImpl::UnmatchedFormatBrace, label_at(1, 5, "$\"a } b\""));

    assert_eq!(error.get_error_name(), "UnmatchedFormatBrace");
}

#[test]
fn test_unsupported_construct_is_distinguishable() {
    let error = Error::new(
        ErrorImpl::UnsupportedConstruct {
            construct: "pipeline stage `reduce`".to_string(),
        },
        label_at(1, 1, "reduce{x}"),
    );

    assert_eq!(error.get_error_name(), "UnsupportedConstruct");
    assert!(error.is_unsupported());

    let syntax = Error::new(
        ErrorImpl::UnexpectedToken {
            token: ";".to_string(),
        },
        label_at(1, 1, ";"),
    );
    assert!(!syntax.is_unsupported());
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}
