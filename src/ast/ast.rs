use super::expressions::{BinOpKind, CodpStage, CompareOp, ListOpKind, LogicOp};
use super::statements::{CasesBlock, ForwardKind};
use super::types::{DbKind, PathKind, RemoteKind, TypeRef, TypedParam, UrlKind};

/// One AST node. A single tagged union over every node shape the grammar
/// can produce; downstream passes (printing, inference) are free functions
/// that pattern-match on the variant.
///
/// Every variant carries only the semantic payload needed to reconstruct
/// source meaning: ownership is tree-shaped, children are fully built
/// before their parent, and nothing mutates a node after parsing except
/// the inference pass filling in absent type annotations.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    // Literals
    None,
    /// The unit literal `()`.
    Empty,
    Bool(bool),
    Int(i64),
    Float(f64),
    Char(char),
    Str(String),
    /// `$"... {expr} ..."`. Fragments are the literal runs between the
    /// embedded expressions, brace escapes already resolved; there is
    /// always exactly one more fragment than expressions.
    FormatString {
        fragments: Vec<String>,
        exprs: Vec<Node>,
    },

    // Names
    Name(String),

    // Collections
    Tuple(Vec<Node>),
    List(Vec<Node>),
    Set(Vec<Node>),
    Range {
        start: Box<Node>,
        end: Box<Node>,
    },
    /// `(x: Int, y)` in expression position.
    ParamTuple(Vec<TypedParam>),

    // Expressions
    BinOp {
        op: BinOpKind,
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
    Comparison {
        op: CompareOp,
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
    Logic {
        op: LogicOp,
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
    /// `!(cond)`.
    Not(Box<Node>),
    /// `|expr|`.
    SizeOf(Box<Node>),
    Call {
        callee: Box<Node>,
        args: Vec<Node>,
    },
    Attribute {
        object: Box<Node>,
        attr: String,
    },
    /// `a.b(1).c(2)` — a method-call chain. A link with `None` arguments
    /// is a plain attribute step inside the chain.
    ChainedCall {
        base: Box<Node>,
        links: Vec<(String, Option<Vec<Node>>)>,
    },
    /// The bracket mini-language: `list[...]`.
    ListOp {
        object: Box<Node>,
        op: ListOpKind,
    },
    /// Chain-of-data-processing: `filter{..} => sort{..} => ...`.
    /// Stages are an ordered sequence, not a linked pair of pointers.
    Codp {
        stages: Vec<CodpStage>,
    },

    // Bindings
    MutableBind {
        name: String,
        ty: Option<TypeRef>,
        value: Box<Node>,
    },
    FinalBind {
        name: String,
        ty: Option<TypeRef>,
        value: Box<Node>,
    },

    // Control flow
    Cond {
        cond: Box<Node>,
        then_body: Option<Box<Node>>,
        else_body: Option<Box<Node>>,
    },
    Cases(CasesBlock),
    Forward {
        params: Option<Vec<TypedParam>>,
        kind: ForwardKind,
    },
    InfiniteLoop {
        body: Option<Box<Node>>,
    },
    Iterator {
        collection: Box<Node>,
        params: Option<Vec<TypedParam>>,
        body: Box<Node>,
    },
    /// `coll >> [#f, #g]` — an ordered hashtag pipeline.
    IteratorSequence {
        collection: Box<Node>,
        stages: Vec<String>,
    },

    // Resources
    Resource {
        entries: Vec<Node>,
    },
    /// `name <- expr` inside `@(...)`.
    ResourceBind {
        name: String,
        value: Box<Node>,
    },
    LocalPath {
        kind: PathKind,
        value: String,
        ty: Option<TypeRef>,
    },
    RemotePath {
        kind: RemoteKind,
        value: String,
        ty: Option<TypeRef>,
    },
    WebUrl {
        kind: UrlKind,
        value: String,
        ty: Option<TypeRef>,
    },
    DbUrl {
        kind: DbKind,
        value: String,
        ty: Option<TypeRef>,
    },
    ExternalPackageList(Vec<String>),

    // Structure
    Function {
        name: String,
        params: Option<Vec<TypedParam>>,
        ret: Option<TypeRef>,
        body: Box<Node>,
        is_final: bool,
    },
    /// The `=>` expression-bodied named form: `#name(params) => expr`.
    SimpleFunction {
        name: String,
        params: Option<Vec<TypedParam>>,
        ret: Option<TypeRef>,
        body: Box<Node>,
    },
    StructDef {
        name: String,
        fields: Vec<TypedParam>,
    },
    Block(Vec<Node>),
    /// The braceless top-level block; terminates only at end of file.
    MainBlock(Vec<Node>),
    Print(Vec<Node>),
    ReadFile(Box<Node>),
    Return(Option<Box<Node>>),
    Break,
    Pass,
    Comment(String),
    Eof,
}
