//! Unit tests for the parser module.
//!
//! This module contains tests for parsing various language constructs
//! including:
//! - Operator precedence and fold direction
//! - Bindings, functions and forwards
//! - List-operation dispatch
//! - Resource classification, format strings
//! - Error reporting and locality

use std::rc::Rc;

use super::parser::parse;
use crate::{
    ast::{
        ast::Node,
        expressions::{BinOpKind, CompareOp, ListOpKind, LogicOp},
        statements::ForwardKind,
        types::{PathKind, RemoteKind, UrlKind},
    },
    errors::errors::Error,
    lexer::lexer::tokenize,
};

fn parse_src(source: &str) -> Node {
    let tokens = tokenize(source);
    parse(tokens, source, Rc::new("test.dft".to_string())).unwrap()
}

fn parse_err(source: &str) -> Error {
    let tokens = tokenize(source);
    parse(tokens, source, Rc::new("test.dft".to_string())).unwrap_err()
}

fn first_stmt(source: &str) -> Node {
    match parse_src(source) {
        Node::MainBlock(mut statements) => {
            assert!(!statements.is_empty(), "no statements in {:?}", source);
            statements.remove(0)
        }
        other => panic!("expected a main block, got {:?}", other),
    }
}

fn bound_value(source: &str) -> Node {
    match first_stmt(source) {
        Node::MutableBind { value, .. } | Node::FinalBind { value, .. } => *value,
        other => panic!("expected a binding, got {:?}", other),
    }
}

fn binop(op: BinOpKind, lhs: Node, rhs: Node) -> Node {
    Node::BinOp {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

#[test]
fn test_precedence_mul_binds_tighter_on_the_right() {
    assert_eq!(
        bound_value("x = 2 + 3 * 4"),
        binop(
            BinOpKind::Add,
            Node::Int(2),
            binop(BinOpKind::Mul, Node::Int(3), Node::Int(4)),
        )
    );
}

#[test]
fn test_precedence_mul_binds_tighter_on_the_left() {
    assert_eq!(
        bound_value("x = 2 * 3 + 4"),
        binop(
            BinOpKind::Add,
            binop(BinOpKind::Mul, Node::Int(2), Node::Int(3)),
            Node::Int(4),
        )
    );
}

#[test]
fn test_equal_precedence_folds_left() {
    assert_eq!(
        bound_value("x = 10 - 2 - 1"),
        binop(
            BinOpKind::Sub,
            binop(BinOpKind::Sub, Node::Int(10), Node::Int(2)),
            Node::Int(1),
        )
    );
}

#[test]
fn test_power_chain_folds_left_like_everything_else() {
    // The documented fold-on-tie rule applies to `**` too: no special
    // right-associativity.
    assert_eq!(
        bound_value("x = 2 ** 3 ** 2"),
        binop(
            BinOpKind::Pow,
            binop(BinOpKind::Pow, Node::Int(2), Node::Int(3)),
            Node::Int(2),
        )
    );
}

#[test]
fn test_power_binds_tighter_than_mul() {
    assert_eq!(
        bound_value("x = 2 * 3 ** 2"),
        binop(
            BinOpKind::Mul,
            Node::Int(2),
            binop(BinOpKind::Pow, Node::Int(3), Node::Int(2)),
        )
    );
}

#[test]
fn test_mixed_precedence_across_levels() {
    // 1 * 2 + 3 * 4 => (1 * 2) + (3 * 4)
    assert_eq!(
        bound_value("x = 1 * 2 + 3 * 4"),
        binop(
            BinOpKind::Add,
            binop(BinOpKind::Mul, Node::Int(1), Node::Int(2)),
            binop(BinOpKind::Mul, Node::Int(3), Node::Int(4)),
        )
    );
}

#[test]
fn test_parenthesized_expression_is_not_a_tuple() {
    assert_eq!(bound_value("x = (5)"), Node::Int(5));
    assert_eq!(bound_value("x = (5,)"), Node::Tuple(vec![Node::Int(5)]));
}

#[test]
fn test_bracket_disambiguation() {
    assert_eq!(bound_value("x = [5]"), Node::List(vec![Node::Int(5)]));
    assert_eq!(
        bound_value("x = [1..5]"),
        Node::Range {
            start: Box::new(Node::Int(1)),
            end: Box::new(Node::Int(5)),
        }
    );
    assert_eq!(bound_value("x = []"), Node::List(vec![]));
    assert_eq!(bound_value("x = [...]"), Node::InfiniteLoop { body: None });
}

#[test]
fn test_bindings() {
    assert!(matches!(
        first_stmt("x = 5"),
        Node::MutableBind { ty: None, .. }
    ));
    assert!(matches!(
        first_stmt("x := 5"),
        Node::FinalBind { ty: None, .. }
    ));

    match first_stmt("x: Int = 5") {
        Node::MutableBind { name, ty, .. } => {
            assert_eq!(name, "x");
            assert_eq!(ty.unwrap().name, "Int");
        }
        other => panic!("expected a typed binding, got {:?}", other),
    }

    match first_stmt("pi: Float := 3.14") {
        Node::FinalBind { ty, .. } => assert_eq!(ty.unwrap().name, "Float"),
        other => panic!("expected a final binding, got {:?}", other),
    }
}

#[test]
fn test_list_op_dispatch() {
    let cases: Vec<(&str, fn(&ListOpKind) -> bool)> = vec![
        ("a[1]", |op| {
            matches!(op, ListOpKind::AccessByIndex(idx) if **idx == Node::Int(1))
        }),
        ("a[\"k\"]", |op| {
            matches!(op, ListOpKind::AccessByName(name) if name == "k")
        }),
        ("a[?= 5]", |op| {
            matches!(op, ListOpKind::GetIndexByValue(v) if **v == Node::Int(5))
        }),
        ("a[?^ (5, 6)]", |op| {
            matches!(op, ListOpKind::GetIndicesByValues(vs) if vs.len() == 2)
        }),
        ("a[^2]", |op| {
            matches!(op, ListOpKind::AccessByIndex(idx) if **idx == Node::Int(2))
        }),
        ("a[^2 <- 7]", |op| matches!(op, ListOpKind::Insert { .. })),
        ("a[+: 9]", |op| {
            matches!(op, ListOpKind::Append(v) if **v == Node::Int(9))
        }),
        ("a[-: ^2]", |op| {
            matches!(op, ListOpKind::RemoveByIndex(idx) if **idx == Node::Int(2))
        }),
        ("a[-: ^(1, 2)]", |op| {
            matches!(op, ListOpKind::RemoveByIndices(idxs) if idxs.len() == 2)
        }),
        ("a[-: ?= 5]", |op| {
            matches!(op, ListOpKind::RemoveByValue(v) if **v == Node::Int(5))
        }),
        ("a[-: ?^ (5, 6)]", |op| {
            matches!(op, ListOpKind::RemoveByValues(vs) if vs.len() == 2)
        }),
        ("a[<]", |op| matches!(op, ListOpKind::Reversed)),
    ];

    for (source, check) in cases {
        match first_stmt(source) {
            Node::ListOp { object, op } => {
                assert_eq!(*object, Node::Name("a".to_string()), "in {:?}", source);
                assert!(check(&op), "wrong dispatch for {:?}: {:?}", source, op);
            }
            other => panic!("expected a list op for {:?}, got {:?}", source, other),
        }
    }
}

#[test]
fn test_list_ops_chain() {
    match first_stmt("a[1][2]") {
        Node::ListOp { object, .. } => {
            assert!(matches!(*object, Node::ListOp { .. }));
        }
        other => panic!("expected a chained list op, got {:?}", other),
    }
}

#[test]
fn test_call_attribute_and_chained_call() {
    assert_eq!(
        first_stmt("f(1, 2)"),
        Node::Call {
            callee: Box::new(Node::Name("f".to_string())),
            args: vec![Node::Int(1), Node::Int(2)],
        }
    );

    assert_eq!(
        bound_value("x = a.b.c"),
        Node::Attribute {
            object: Box::new(Node::Attribute {
                object: Box::new(Node::Name("a".to_string())),
                attr: "b".to_string(),
            }),
            attr: "c".to_string(),
        }
    );

    match bound_value("x = a.b(1).c(2)") {
        Node::ChainedCall { base, links } => {
            assert_eq!(*base, Node::Name("a".to_string()));
            assert_eq!(links.len(), 2);
            assert_eq!(links[0].0, "b");
            assert_eq!(links[1].0, "c");
            assert!(links[0].1.is_some());
        }
        other => panic!("expected a chained call, got {:?}", other),
    }
}

#[test]
fn test_sizeof() {
    assert_eq!(
        bound_value("x = |items|"),
        Node::SizeOf(Box::new(Node::Name("items".to_string())))
    );
}

#[test]
fn test_forward_shapes() {
    match first_stmt("#(x) => x + 1") {
        Node::Forward { params, kind } => {
            assert_eq!(params.unwrap().len(), 1);
            assert!(matches!(kind, ForwardKind::Plain(_)));
        }
        other => panic!("expected a forward, got {:?}", other),
    }

    match first_stmt("# { >_(1) }") {
        Node::Forward { params, kind } => {
            assert!(params.is_none());
            assert!(matches!(kind, ForwardKind::Run(_)));
        }
        other => panic!("expected a plain run, got {:?}", other),
    }

    match first_stmt("#(x) ?= 0 => \"zero\"") {
        Node::Forward { kind, .. } => {
            assert!(matches!(kind, ForwardKind::MatchValue { .. }));
        }
        other => panic!("expected an equality guard, got {:?}", other),
    }

    match first_stmt("#(x) ?^ [1, 2] => \"member\"") {
        Node::Forward { kind, .. } => {
            assert!(matches!(kind, ForwardKind::CheckIn { .. }));
        }
        other => panic!("expected a membership guard, got {:?}", other),
    }

    match first_stmt("#(x) ?(x > 1) \\t\\ { >_(x) }") {
        Node::Forward { kind, .. } => {
            assert!(matches!(kind, ForwardKind::CondTrue { .. }));
        }
        other => panic!("expected a true-guarded forward, got {:?}", other),
    }

    match first_stmt("#(x) ?(x > 1) \\f\\ { >_(x) }") {
        Node::Forward { kind, .. } => {
            assert!(matches!(kind, ForwardKind::CondFalse { .. }));
        }
        other => panic!("expected a false-guarded forward, got {:?}", other),
    }

    match first_stmt("#(x) ?(x > 1) \\t\\ { >_(1) } \\f\\ { >_(2) }") {
        Node::Forward { kind, .. } => {
            assert!(matches!(kind, ForwardKind::CondBoth { .. }));
        }
        other => panic!("expected a both-guarded forward, got {:?}", other),
    }

    match first_stmt("#(x) ?= { 1 => \"one\", _ => \"many\" }") {
        Node::Forward { kind, .. } => match kind {
            ForwardKind::MatchCases(cases) => {
                assert_eq!(cases.arms.len(), 1);
            }
            other => panic!("expected a cases guard, got {:?}", other),
        },
        other => panic!("expected a forward, got {:?}", other),
    }
}

#[test]
fn test_functions() {
    match first_stmt("#add(a: Int, b: Int) -> Int => a + b") {
        Node::SimpleFunction {
            name, params, ret, ..
        } => {
            assert_eq!(name, "add");
            let params = params.unwrap();
            assert_eq!(params.len(), 2);
            assert_eq!(params[0].ty.as_ref().unwrap().name, "Int");
            assert_eq!(ret.unwrap().name, "Int");
        }
        other => panic!("expected a simple function, got {:?}", other),
    }

    match first_stmt("#tick := 1") {
        Node::Function { is_final, .. } => assert!(is_final),
        other => panic!("expected a final function, got {:?}", other),
    }

    match first_stmt("#run(n) { >_(n) }") {
        Node::Function { body, is_final, .. } => {
            assert!(!is_final);
            assert!(matches!(*body, Node::Block(_)));
        }
        other => panic!("expected a block-bodied function, got {:?}", other),
    }

    match first_stmt("#classify(n) ?= { 0 => \"zero\", _ => \"other\" }") {
        Node::Function { body, .. } => {
            assert!(matches!(
                *body,
                Node::Forward {
                    kind: ForwardKind::MatchCases(_),
                    ..
                }
            ));
        }
        other => panic!("expected a guarded function, got {:?}", other),
    }
}

#[test]
fn test_cases_standalone_requires_default() {
    match first_stmt("?= { 1 => \"one\", 2 => \"two\", _ => \"many\" }") {
        Node::Cases(cases) => {
            assert_eq!(cases.arms.len(), 2);
            assert_eq!(*cases.default_body, Node::Str("many".to_string()));
        }
        other => panic!("expected a cases block, got {:?}", other),
    }

    let error = parse_err("?= { 1 => \"one\" }");
    assert_eq!(error.get_error_name(), "MissingDefaultCase");
}

#[test]
fn test_conditional_branches() {
    match first_stmt("?(x > 1) \\t\\ { y = 2 }") {
        Node::Cond {
            then_body,
            else_body,
            ..
        } => {
            assert!(then_body.is_some());
            assert!(else_body.is_none());
        }
        other => panic!("expected a conditional, got {:?}", other),
    }

    match first_stmt("?(x > 1) \\f\\ { y = 2 }") {
        Node::Cond {
            then_body,
            else_body,
            ..
        } => {
            assert!(then_body.is_none());
            assert!(else_body.is_some());
        }
        other => panic!("expected a conditional, got {:?}", other),
    }

    let error = parse_err("?(x > 1)");
    assert_eq!(error.get_error_name(), "EmptyConditional");
}

#[test]
fn test_condition_grammar() {
    let cond = match first_stmt("?(a > 1 && b < 2 || !(c == 3)) \\t\\ { ... }") {
        Node::Cond { cond, .. } => *cond,
        other => panic!("expected a conditional, got {:?}", other),
    };

    // || binds loosest: Or(And(a > 1, b < 2), Not(c == 3))
    match cond {
        Node::Logic { op, lhs, rhs } => {
            assert_eq!(op, LogicOp::Or);
            assert!(matches!(
                *lhs,
                Node::Logic {
                    op: LogicOp::And,
                    ..
                }
            ));
            assert!(matches!(*rhs, Node::Not(_)));
        }
        other => panic!("expected a logic node, got {:?}", other),
    }
}

#[test]
fn test_condition_xor_and_comparisons() {
    let cond = match first_stmt("?(a == 1 ^ b != 2) \\t\\ { ... }") {
        Node::Cond { cond, .. } => *cond,
        other => panic!("expected a conditional, got {:?}", other),
    };

    match cond {
        Node::Logic { op, lhs, rhs } => {
            assert_eq!(op, LogicOp::Xor);
            assert!(matches!(
                *lhs,
                Node::Comparison {
                    op: CompareOp::Eq,
                    ..
                }
            ));
            assert!(matches!(
                *rhs,
                Node::Comparison {
                    op: CompareOp::Ne,
                    ..
                }
            ));
        }
        other => panic!("expected a logic node, got {:?}", other),
    }
}

#[test]
fn test_iterator_forms() {
    match first_stmt("items >> #(x) => >_(x)") {
        Node::Iterator {
            collection, params, ..
        } => {
            assert_eq!(*collection, Node::Name("items".to_string()));
            assert_eq!(params.unwrap().len(), 1);
        }
        other => panic!("expected an iterator, got {:?}", other),
    }

    match first_stmt("items >> { >_(1) }") {
        Node::Iterator { params, body, .. } => {
            assert!(params.is_none());
            assert!(matches!(*body, Node::Block(_)));
        }
        other => panic!("expected an iterator, got {:?}", other),
    }

    match first_stmt("rows >> [#clean, #dedup]") {
        Node::IteratorSequence { stages, .. } => {
            assert_eq!(stages, vec!["clean".to_string(), "dedup".to_string()]);
        }
        other => panic!("expected an iterator sequence, got {:?}", other),
    }

    match first_stmt("[...] >> { ~ }") {
        Node::InfiniteLoop { body } => {
            assert!(matches!(*body.unwrap(), Node::Block(_)));
        }
        other => panic!("expected an infinite loop, got {:?}", other),
    }
}

#[test]
fn test_codp_chain() {
    match first_stmt("filter{age > 18} => sort{name} => slice{10, 20}") {
        Node::Codp { stages } => {
            assert_eq!(stages.len(), 3);
            assert_eq!(stages[0].name(), "filter");
            assert_eq!(stages[1].name(), "sort");
            assert_eq!(stages[2].name(), "slice");
        }
        other => panic!("expected a pipeline, got {:?}", other),
    }
}

#[test]
fn test_codp_unknown_stage_is_unsupported() {
    let error = parse_err("filter{age > 18} => reduce{total}");
    assert_eq!(error.get_error_name(), "UnsupportedConstruct");
    assert!(error.is_unsupported());
}

#[test]
fn test_resource_entries() {
    let entries = match first_stmt("@(\"/etc/x\", \"https://x.com\" : Conn, db <- 5, [\"numpy\", \"pandas\"])") {
        Node::Resource { entries } => entries,
        other => panic!("expected a resource, got {:?}", other),
    };

    assert_eq!(entries.len(), 4);
    assert!(matches!(
        entries[0],
        Node::LocalPath {
            kind: PathKind::Unix,
            ..
        }
    ));
    match &entries[1] {
        Node::WebUrl { kind, ty, .. } => {
            assert_eq!(*kind, UrlKind::Https);
            assert_eq!(ty.as_ref().unwrap().name, "Conn");
        }
        other => panic!("expected a web url, got {:?}", other),
    }
    assert!(matches!(entries[2], Node::ResourceBind { .. }));
    match &entries[3] {
        Node::ExternalPackageList(packages) => {
            assert_eq!(packages, &vec!["numpy".to_string(), "pandas".to_string()]);
        }
        other => panic!("expected a package list, got {:?}", other),
    }
}

#[test]
fn test_read_file_classifies_path() {
    match bound_value("x = <- \"./rel/x\"") {
        Node::ReadFile(path) => {
            assert!(matches!(
                *path,
                Node::LocalPath {
                    kind: PathKind::Relative,
                    ..
                }
            ));
        }
        other => panic!("expected a read, got {:?}", other),
    }

    match bound_value("x = <- \"192.168.0.1\"") {
        Node::ReadFile(path) => {
            assert!(matches!(
                *path,
                Node::RemotePath {
                    kind: RemoteKind::Ipv4,
                    ..
                }
            ));
        }
        other => panic!("expected a read, got {:?}", other),
    }
}

#[test]
fn test_format_string_fragments_and_escapes() {
    match bound_value("x = $\"a {{literal}} {1 + 1}\"") {
        Node::FormatString { fragments, exprs } => {
            assert_eq!(fragments, vec!["a {literal} ".to_string(), "".to_string()]);
            assert_eq!(exprs.len(), 1);
            assert_eq!(
                exprs[0],
                binop(BinOpKind::Add, Node::Int(1), Node::Int(1))
            );
        }
        other => panic!("expected a format string, got {:?}", other),
    }
}

#[test]
fn test_format_string_unmatched_brace_is_an_error() {
    let error = parse_err("x = $\"a } b\"");
    assert_eq!(error.get_error_name(), "UnmatchedFormatBrace");
}

#[test]
fn test_struct_definition() {
    match first_stmt("$Point { x: Int, y: Float }") {
        Node::StructDef { name, fields } => {
            assert_eq!(name, "Point");
            assert_eq!(fields.len(), 2);
            assert_eq!(fields[0].name, "x");
            assert_eq!(fields[0].ty.as_ref().unwrap().name, "Int");
        }
        other => panic!("expected a struct definition, got {:?}", other),
    }
}

#[test]
fn test_print_return_break_pass() {
    assert!(matches!(first_stmt(">_(\"hi\", x)"), Node::Print(args) if args.len() == 2));
    assert_eq!(
        first_stmt("<< 5"),
        Node::Return(Some(Box::new(Node::Int(5))))
    );
    assert_eq!(first_stmt("<<"), Node::Return(None));
    assert_eq!(first_stmt("~"), Node::Break);
    assert_eq!(first_stmt("..."), Node::Pass);
}

#[test]
fn test_empty_program() {
    assert_eq!(parse_src(""), Node::MainBlock(vec![]));
}

#[test]
fn test_main_block_drops_comments_nested_blocks_keep_them() {
    let ast = parse_src("// top\nx = 1");
    match ast {
        Node::MainBlock(statements) => {
            assert_eq!(statements.len(), 1);
            assert!(matches!(statements[0], Node::MutableBind { .. }));
        }
        other => panic!("expected a main block, got {:?}", other),
    }

    match first_stmt("{ x = 1 // note\n }") {
        Node::Block(statements) => {
            assert_eq!(statements.len(), 2);
            assert!(matches!(&statements[1], Node::Comment(text) if text == "// note"));
        }
        other => panic!("expected a block, got {:?}", other),
    }
}

#[test]
fn test_whitespace_transparency() {
    let plain = parse_src("x = 1 + 2\n#f(a) => a * 2\nitems >> #(i) => >_(i)");
    let noisy = parse_src(
        "x  =  1   +   2 /* mid */\n\n// standalone comment\n\n#f( a ) =>  a  *  2\n\nitems  >>  #( i )  =>  >_( i )",
    );

    assert_eq!(plain, noisy);
}

#[test]
fn test_error_locality_at_end_of_input() {
    // The missing `)` is reported at the position immediately following
    // the last token, never anywhere else.
    let error = parse_err("f(1, 2");

    assert_eq!(error.get_error_name(), "UnexpectedEndOfInput");
    assert_eq!(error.get_label().pos.line, 1);
    assert_eq!(error.get_label().pos.column, 7);
    assert_eq!(error.get_label().line_text, "f(1, 2");
}

#[test]
fn test_unknown_byte_is_a_parse_error_not_a_lexer_failure() {
    let error = parse_err("x = \u{1}");
    assert_eq!(error.get_error_name(), "UnexpectedToken");
}

#[test]
fn test_number_overflow_is_reported() {
    let error = parse_err("x = 99999999999999999999");
    assert_eq!(error.get_error_name(), "NumberParseError");
}

#[test]
fn test_unexpected_token_aborts_parse() {
    let error = parse_err("x = ;");
    assert_eq!(error.get_error_name(), "UnexpectedToken");
}
