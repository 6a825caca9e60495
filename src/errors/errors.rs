use std::fmt::Display;

use thiserror::Error;

use crate::SourceLabel;

/// A parse error: what went wrong plus where. The label is captured when
/// the error is raised and carries everything `display_error` needs.
#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    label: SourceLabel,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, label: SourceLabel) -> Self {
        Error {
            internal_error: error_impl,
            label,
        }
    }

    pub fn get_label(&self) -> &SourceLabel {
        &self.label
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::ExpectedToken { .. } => "ExpectedToken",
            ErrorImpl::UnexpectedEndOfInput => "UnexpectedEndOfInput",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::MissingDefaultCase => "MissingDefaultCase",
            ErrorImpl::EmptyConditional => "EmptyConditional",
            ErrorImpl::UnmatchedFormatBrace => "UnmatchedFormatBrace",
            ErrorImpl::UnsupportedConstruct { .. } => "UnsupportedConstruct",
        }
    }

    /// True for constructs the grammar recognizes but the compiler does
    /// not implement yet, so tooling can distinguish "your code is wrong"
    /// from "the compiler is incomplete".
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self.internal_error,
            ErrorImpl::UnsupportedConstruct { .. }
        )
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, is the previous statement complete?",
                token
            )),
            ErrorImpl::ExpectedToken { expected, found } => ErrorTip::Suggestion(format!(
                "Expected `{}` here, found `{}`",
                expected, found
            )),
            ErrorImpl::UnexpectedEndOfInput => ErrorTip::Suggestion(String::from(
                "The source ended in the middle of a construct",
            )),
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::MissingDefaultCase => ErrorTip::Suggestion(String::from(
                "Every case block needs a `_ => ...` arm",
            )),
            ErrorImpl::EmptyConditional => ErrorTip::Suggestion(String::from(
                "A conditional needs a `\\t\\ {..}` branch, a `\\f\\ {..}` branch, or both",
            )),
            ErrorImpl::UnmatchedFormatBrace => ErrorTip::Suggestion(String::from(
                "Use `{{` and `}}` for literal braces inside a format string",
            )),
            ErrorImpl::UnsupportedConstruct { construct } => ErrorTip::Suggestion(format!(
                "`{}` is recognized, but has not been implemented yet",
                construct
            )),
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum ErrorImpl {
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("expected {expected:?}, found {found:?}")]
    ExpectedToken { expected: String, found: String },
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("case block has no default arm")]
    MissingDefaultCase,
    #[error("conditional has no branches")]
    EmptyConditional,
    #[error("unmatched closing brace in format string")]
    UnmatchedFormatBrace,
    #[error("unsupported construct: {construct}")]
    UnsupportedConstruct { construct: String },
}
