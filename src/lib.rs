#![allow(clippy::module_inception)]

use std::rc::Rc;

use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod errors;
pub mod infer;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod printer;

extern crate regex;

/// A resolved source position, 1-based for both fields.
#[derive(Debug, Clone, PartialEq)]
pub struct SourcePos {
    pub line: usize,
    pub column: usize,
}

/// Everything an error needs to render a caret excerpt: the position, the
/// physical text of the offending line, and the file it came from. Captured
/// when the error is raised, so rendering never re-reads the source.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceLabel {
    pub pos: SourcePos,
    pub line_text: String,
    pub file: Rc<String>,
}

/// Maps byte offsets to (line, column), built once per source text.
#[derive(Debug, Clone)]
pub struct LineTable {
    /// Byte offset at which each line starts.
    starts: Vec<usize>,
}

impl LineTable {
    pub fn new(source: &str) -> Self {
        let mut starts = vec![0];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                starts.push(i + 1);
            }
        }
        LineTable { starts }
    }

    fn line_index(&self, offset: usize) -> usize {
        match self.starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        }
    }

    pub fn locate(&self, offset: usize) -> SourcePos {
        let line = self.line_index(offset);
        SourcePos {
            line: line + 1,
            column: offset - self.starts[line] + 1,
        }
    }

    /// The full text of the line containing `offset`, without the newline.
    pub fn line_text<'a>(&self, source: &'a str, offset: usize) -> &'a str {
        let line = self.line_index(offset);
        let start = self.starts[line];
        let end = match self.starts.get(line + 1) {
            Some(next) => next - 1,
            None => source.len(),
        };
        source[start..end.max(start)].trim_end_matches('\r')
    }
}

pub fn display_error(error: &Error) {
    /*
        Error: message
        -> main.dft
           |
        20 | f(1, 2
           | ------^
    */

    let label = error.get_label();
    let line_string = label.pos.line.to_string();
    let padding = line_string.len() + 2;

    if let ErrorTip::None = error.get_tip() {
        println!("Error: {}", error.get_error_name());
    } else {
        println!("Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    println!("-> {}", label.file);
    println!("{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&label.line_text);
    println!("{} | {}", line_string, line_text_removed.trim_end());

    let arrows = label.pos.column.saturating_sub(removed_whitespace).max(1);

    println!("{:>padding$} {:->arrows$}", "|", "^");
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}
