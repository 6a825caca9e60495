use super::ast::Node;

/// An ordered list of (pattern-expression, body) pairs plus the mandatory
/// default body. Used standalone (`?= { ... }`) and as the payload of a
/// cases-guarded forward.
#[derive(Debug, Clone, PartialEq)]
pub struct CasesBlock {
    pub arms: Vec<(Node, Node)>,
    pub default_body: Box<Node>,
}

/// The guard shapes of the forward family. The optional parameter tuple
/// lives on the `Forward` node itself: it is orthogonal to the guard and
/// would otherwise double the variant count without changing any
/// decision logic.
#[derive(Debug, Clone, PartialEq)]
pub enum ForwardKind {
    /// `{ block }` — a plain run.
    Run(Box<Node>),
    /// `=> expr-or-block`.
    Plain(Box<Node>),
    /// `?= value => then`.
    MatchValue {
        pattern: Box<Node>,
        then_body: Box<Node>,
    },
    /// `?= { pattern => body, ..., _ => default }`.
    MatchCases(CasesBlock),
    /// `?^ iterable => then`.
    CheckIn {
        iterable: Box<Node>,
        then_body: Box<Node>,
    },
    /// `?(cond) \t\ { ... }`.
    CondTrue {
        cond: Box<Node>,
        then_body: Box<Node>,
    },
    /// `?(cond) \f\ { ... }`.
    CondFalse {
        cond: Box<Node>,
        else_body: Box<Node>,
    },
    /// `?(cond) \t\ { ... } \f\ { ... }`.
    CondBoth {
        cond: Box<Node>,
        then_body: Box<Node>,
        else_body: Box<Node>,
    },
}
