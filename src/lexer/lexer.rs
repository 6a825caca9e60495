use regex::Regex;

use crate::{MK_DEFAULT_HANDLER, MK_TOKEN};

use super::tokens::{Token, TokenKind};

pub type RegexHandler = fn(&mut Lexer, Regex);

#[derive(Clone)]
pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

pub struct Lexer {
    patterns: Vec<RegexPattern>,
    tokens: Vec<Token>,
    source: String,
    pos: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Lexer {
        Lexer {
            pos: 0,
            tokens: vec![],
            // Order is load-bearing: longer spellings must come before
            // their prefixes, so merged operators win by maximal munch.
            patterns: vec![
                RegexPattern { regex: Regex::new(" ").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Space, " ")},
                RegexPattern { regex: Regex::new("\t").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Space, "\t")},
                RegexPattern { regex: Regex::new("\r").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CarriageReturn, "\r")},
                RegexPattern { regex: Regex::new("\n").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LineFeed, "\n")},
                RegexPattern { regex: Regex::new("//[^\n]*").unwrap(), handler: line_comment_handler},
                RegexPattern { regex: Regex::new(r"(?s)/\*.*?\*/").unwrap(), handler: block_comment_handler},
                RegexPattern { regex: Regex::new("[a-zA-Z_][a-zA-Z0-9_]*").unwrap(), handler: symbol_handler},
                RegexPattern { regex: Regex::new("[0-9]+(\\.[0-9]+)?").unwrap(), handler: number_handler},
                RegexPattern { regex: Regex::new("\"[^\"]*\"").unwrap(), handler: string_handler},
                RegexPattern { regex: Regex::new("'[^']'").unwrap(), handler: char_handler},
                RegexPattern { regex: Regex::new("\\.\\.\\.").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Ellipsis, "...")},
                RegexPattern { regex: Regex::new("\\.\\.").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::DotDot, "..")},
                RegexPattern { regex: Regex::new("\\*\\*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Power, "**")},
                RegexPattern { regex: Regex::new("==").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Equals, "==")},
                RegexPattern { regex: Regex::new("!=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=")},
                RegexPattern { regex: Regex::new("<=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=")},
                RegexPattern { regex: Regex::new(">=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=")},
                RegexPattern { regex: Regex::new("&&").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::And, "&&")},
                RegexPattern { regex: Regex::new("\\|\\|").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Or, "||")},
                RegexPattern { regex: Regex::new("->").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Arrow, "->")},
                RegexPattern { regex: Regex::new("<-").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::BackArrow, "<-")},
                RegexPattern { regex: Regex::new("=>").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::FatArrow, "=>")},
                RegexPattern { regex: Regex::new(":=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::ColonEquals, ":=")},
                RegexPattern { regex: Regex::new("\\?=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::QuestionEquals, "?=")},
                RegexPattern { regex: Regex::new("\\?\\^").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::QuestionHat, "?^")},
                RegexPattern { regex: Regex::new(">>").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::ShiftRight, ">>")},
                RegexPattern { regex: Regex::new("<<").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::ShiftLeft, "<<")},
                RegexPattern { regex: Regex::new(">_").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::PrintArrow, ">_")},
                RegexPattern { regex: Regex::new("\\+:").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::AppendColon, "+:")},
                RegexPattern { regex: Regex::new("-:").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::RemoveColon, "-:")},
                RegexPattern { regex: Regex::new("\\(").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(")},
                RegexPattern { regex: Regex::new("\\)").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")")},
                RegexPattern { regex: Regex::new("\\[").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenBracket, "[")},
                RegexPattern { regex: Regex::new("\\]").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseBracket, "]")},
                RegexPattern { regex: Regex::new("\\{").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{")},
                RegexPattern { regex: Regex::new("\\}").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}")},
                RegexPattern { regex: Regex::new("!").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Not, "!")},
                RegexPattern { regex: Regex::new("#").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Hash, "#")},
                RegexPattern { regex: Regex::new("\\$").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dollar, "$")},
                RegexPattern { regex: Regex::new("%").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Percent, "%")},
                RegexPattern { regex: Regex::new("&").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Ampersand, "&")},
                RegexPattern { regex: Regex::new("'").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::SingleQuote, "'")},
                RegexPattern { regex: Regex::new("\\*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Star, "*")},
                RegexPattern { regex: Regex::new("\\+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Plus, "+")},
                RegexPattern { regex: Regex::new(",").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Comma, ",")},
                RegexPattern { regex: Regex::new("-").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dash, "-")},
                RegexPattern { regex: Regex::new("\\.").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dot, ".")},
                RegexPattern { regex: Regex::new("/").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Slash, "/")},
                RegexPattern { regex: Regex::new(":").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Colon, ":")},
                RegexPattern { regex: Regex::new(";").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";")},
                RegexPattern { regex: Regex::new("<").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Less, "<")},
                RegexPattern { regex: Regex::new("=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=")},
                RegexPattern { regex: Regex::new(">").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Greater, ">")},
                RegexPattern { regex: Regex::new("\\?").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Question, "?")},
                RegexPattern { regex: Regex::new("@").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::At, "@")},
                RegexPattern { regex: Regex::new("\\\\").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Backslash, "\\")},
                RegexPattern { regex: Regex::new("\\^").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Caret, "^")},
                RegexPattern { regex: Regex::new("`").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Backtick, "`")},
                RegexPattern { regex: Regex::new("\\|").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Pipe, "|")},
                RegexPattern { regex: Regex::new("~").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Tilde, "~")},
            ],
            source: String::from(source),
        }
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn at(&self) -> char {
        self.source[self.pos..].chars().next().unwrap()
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }
}

fn symbol_handler(lexer: &mut Lexer, regex: Regex) {
    let matched = regex.find(lexer.remainder()).unwrap().as_str().to_string();
    let length = matched.len();

    lexer.push(MK_TOKEN!(TokenKind::Name, matched, length));
    lexer.advance_n(length);
}

fn number_handler(lexer: &mut Lexer, regex: Regex) {
    let matched = regex.find(lexer.remainder()).unwrap().as_str().to_string();
    let length = matched.len();

    // A trailing `.` never matches here: the fractional group requires a
    // digit, so `3.` stays an Integer and leaves the `.` for the parser.
    let kind = if matched.contains('.') {
        TokenKind::Decimal
    } else {
        TokenKind::Integer
    };

    lexer.push(MK_TOKEN!(kind, matched, length));
    lexer.advance_n(length);
}

fn string_handler(lexer: &mut Lexer, regex: Regex) {
    let matched = regex.find(lexer.remainder()).unwrap().as_str().to_string();
    let length = matched.len();

    // The quotes count towards `length` but not `text`. The interior is
    // kept verbatim: escape processing is not the lexer's job.
    let text = String::from(&matched[1..length - 1]);

    lexer.push(MK_TOKEN!(TokenKind::String, text, length));
    lexer.advance_n(length);
}

fn char_handler(lexer: &mut Lexer, regex: Regex) {
    let matched = regex.find(lexer.remainder()).unwrap().as_str().to_string();
    let length = matched.len();

    let text = String::from(&matched[1..length - 1]);

    lexer.push(MK_TOKEN!(TokenKind::Char, text, length));
    lexer.advance_n(length);
}

fn line_comment_handler(lexer: &mut Lexer, regex: Regex) {
    let matched = regex.find(lexer.remainder()).unwrap().as_str().to_string();
    let length = matched.len();

    lexer.push(MK_TOKEN!(TokenKind::LineComment, matched, length));
    lexer.advance_n(length);
}

fn block_comment_handler(lexer: &mut Lexer, regex: Regex) {
    let matched = regex.find(lexer.remainder()).unwrap().as_str().to_string();
    let length = matched.len();

    // Both delimiters are consumed into `length` but not `text`.
    let text = String::from(&matched[2..length - 2]);

    lexer.push(MK_TOKEN!(TokenKind::BlockComment, text, length));
    lexer.advance_n(length);
}

/// Tokenizes the whole source. Total: an unrecognized byte becomes an
/// `Unknown` token rather than a failure, so the parser is the single
/// point of syntax-error reporting. The stream always ends with `EOF`.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut lex = Lexer::new(source);
    let patterns = lex.patterns.clone();

    while !lex.at_eof() {
        let mut matched = false;

        for pattern in patterns.iter() {
            let starts_here = pattern
                .regex
                .find(lex.remainder())
                .map(|found| found.start() == 0)
                .unwrap_or(false);

            if starts_here {
                (pattern.handler)(&mut lex, pattern.regex.clone());
                matched = true;
                break;
            }
        }

        if !matched {
            let text = lex.at().to_string();
            let length = text.len();
            lex.push(MK_TOKEN!(TokenKind::Unknown, text, length));
            lex.advance_n(length);
        }
    }

    lex.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), 0));
    lex.tokens
}
