use std::fmt::Display;

/// The closed set of token kinds the lexer can produce.
///
/// Layout and comments are first-class tokens: the lexer never filters
/// them out, the cursor skips them where the grammar tolerates layout.
/// Multi-character operators are merged here, by maximal munch; the parser
/// never has to reassemble them from single-character tokens.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    /// A byte the lexer does not recognize. Surfaced later as an
    /// unexpected-token parse error, never as a lexer failure.
    Unknown,

    Name,
    Integer,
    Decimal,
    String,
    Char,

    Space,
    CarriageReturn,
    LineFeed,
    LineComment,
    BlockComment,

    Ellipsis,       // ...
    DotDot,         // ..
    Power,          // **
    Equals,         // ==
    NotEquals,      // !=
    LessEquals,     // <=
    GreaterEquals,  // >=
    And,            // &&
    Or,             // ||
    Arrow,          // ->
    BackArrow,      // <-
    FatArrow,       // =>
    ColonEquals,    // :=
    QuestionEquals, // ?=
    QuestionHat,    // ?^
    ShiftRight,     // >>
    ShiftLeft,      // <<
    PrintArrow,     // >_
    AppendColon,    // +:
    RemoveColon,    // -:

    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,

    Not,         // !
    Hash,        // #
    Dollar,      // $
    Percent,     // %
    Ampersand,   // &
    SingleQuote, // '
    Star,        // *
    Plus,        // +
    Comma,       // ,
    Dash,        // -
    Dot,         // .
    Slash,       // /
    Colon,       // :
    Semicolon,   // ;
    Less,        // <
    Assignment,  // =
    Greater,     // >
    Question,    // ?
    At,          // @
    Backslash,   // \
    Caret,       // ^
    Backtick,    // `
    Pipe,        // |
    Tilde,       // ~
}

impl TokenKind {
    /// Whitespace, line breaks and comments: the tokens
    /// `Cursor::skip_insignificant` steps over.
    pub fn is_insignificant(&self) -> bool {
        matches!(
            self,
            TokenKind::Space
                | TokenKind::CarriageReturn
                | TokenKind::LineFeed
                | TokenKind::LineComment
                | TokenKind::BlockComment
        )
    }

    /// The canonical spelling of the kind, for error messages and display.
    pub fn symbol(&self) -> &'static str {
        match self {
            TokenKind::EOF => "end of file",
            TokenKind::Unknown => "unknown",
            TokenKind::Name => "name",
            TokenKind::Integer => "integer",
            TokenKind::Decimal => "decimal",
            TokenKind::String => "string",
            TokenKind::Char => "char",
            TokenKind::Space => "space",
            TokenKind::CarriageReturn => "\\r",
            TokenKind::LineFeed => "\\n",
            TokenKind::LineComment => "line comment",
            TokenKind::BlockComment => "block comment",
            TokenKind::Ellipsis => "...",
            TokenKind::DotDot => "..",
            TokenKind::Power => "**",
            TokenKind::Equals => "==",
            TokenKind::NotEquals => "!=",
            TokenKind::LessEquals => "<=",
            TokenKind::GreaterEquals => ">=",
            TokenKind::And => "&&",
            TokenKind::Or => "||",
            TokenKind::Arrow => "->",
            TokenKind::BackArrow => "<-",
            TokenKind::FatArrow => "=>",
            TokenKind::ColonEquals => ":=",
            TokenKind::QuestionEquals => "?=",
            TokenKind::QuestionHat => "?^",
            TokenKind::ShiftRight => ">>",
            TokenKind::ShiftLeft => "<<",
            TokenKind::PrintArrow => ">_",
            TokenKind::AppendColon => "+:",
            TokenKind::RemoveColon => "-:",
            TokenKind::OpenParen => "(",
            TokenKind::CloseParen => ")",
            TokenKind::OpenBracket => "[",
            TokenKind::CloseBracket => "]",
            TokenKind::OpenCurly => "{",
            TokenKind::CloseCurly => "}",
            TokenKind::Not => "!",
            TokenKind::Hash => "#",
            TokenKind::Dollar => "$",
            TokenKind::Percent => "%",
            TokenKind::Ampersand => "&",
            TokenKind::SingleQuote => "'",
            TokenKind::Star => "*",
            TokenKind::Plus => "+",
            TokenKind::Comma => ",",
            TokenKind::Dash => "-",
            TokenKind::Dot => ".",
            TokenKind::Slash => "/",
            TokenKind::Colon => ":",
            TokenKind::Semicolon => ";",
            TokenKind::Less => "<",
            TokenKind::Assignment => "=",
            TokenKind::Greater => ">",
            TokenKind::Question => "?",
            TokenKind::At => "@",
            TokenKind::Backslash => "\\",
            TokenKind::Caret => "^",
            TokenKind::Backtick => "`",
            TokenKind::Pipe => "|",
            TokenKind::Tilde => "~",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// One lexed token. `length` is the byte length consumed from the source,
/// including any delimiters (the quotes of a string, the `/* */` of a
/// block comment), and is authoritative for cursor position bookkeeping.
/// Tokens are immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub length: usize,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token {{ kind: {}, text: {:?} }}", self.kind, self.text)
    }
}
