//! Tests for the filter parser.

use std::sync::Arc;

use super::*;

struct Record {
    id: i64,
    level: i64,
    name: &'static str,
}

const RECORD: Record = Record {
    id: 3,
    level: 8,
    name: "Cherry",
};

fn config() -> ParseConfig<Record> {
    ParseConfig::new()
        .with_str_method("rec", |r: &Record, field: &str| match field {
            "ID" => Ok(Value::Int(r.id)),
            "Level" => Ok(Value::Int(r.level)),
            "Name" => Ok(Value::from(r.name)),
            other => Err(format!("unknown field: {}", other).into()),
        })
        .with_str_method("arg", |_: &Record, name: &str| match name {
            "uid" => Ok(Value::Int(5)),
            "sources" => Ok(Value::IntList(vec![1, 3])),
            other => Err(format!("unknown arg: {}", other).into()),
        })
        .with_int_method("level_at_least", |r: &Record, n: i64| {
            Ok(Value::Bool(r.level >= n))
        })
}

fn compile(query: &str) -> Condition<Record> {
    Parser::compile(query, &config()).unwrap()
}

fn compile_err(query: &str) -> ParseError {
    Parser::compile(query, &config()).unwrap_err()
}

fn holds(query: &str) -> bool {
    compile(query).matches(&RECORD).unwrap()
}

// ==================== Structure Tests ====================

#[test]
fn test_parse_bare_call() {
    match compile("level_at_least(5)") {
        Condition::Call(call) => {
            assert_eq!(call.name(), "level_at_least");
            assert_eq!(call.arg(), Literal::Int(5));
            assert!(!call.is_negated());
        }
        other => panic!("expected Call, got {:?}", other),
    }
}

#[test]
fn test_parse_compare_literals() {
    match compile("rec('ID') >= 3") {
        Condition::CompareInt(cmp) => {
            assert_eq!(cmp.call().name(), "rec");
            assert_eq!(cmp.call().arg(), Literal::Str("ID".to_string()));
            assert_eq!(cmp.op(), CompareOp::Ge);
            assert_eq!(*cmp.target(), 3);
        }
        other => panic!("expected CompareInt, got {:?}", other),
    }
    match compile("rec('Name') <> 'Fig'") {
        Condition::CompareStr(cmp) => {
            assert_eq!(cmp.op(), CompareOp::Ne);
            assert_eq!(cmp.target(), "Fig");
        }
        other => panic!("expected CompareStr, got {:?}", other),
    }
}

#[test]
fn test_parse_every_operator() {
    for op in CompareOp::ALL {
        let query = format!("rec('ID') {} 1", op.symbol());
        assert!(
            matches!(compile(&query), Condition::CompareInt(c) if c.op() == op),
            "{}",
            query
        );
    }
}

#[test]
fn test_parse_compare_calls() {
    assert!(matches!(
        compile("rec('ID') < arg('uid')"),
        Condition::CompareCalls(c) if c.op() == CompareOp::Lt
    ));
}

#[test]
fn test_parse_membership() {
    match compile("rec('ID') in (1, 2, 3)") {
        Condition::InInts(set) => {
            assert_eq!(set.choices(), [1, 2, 3]);
            assert!(!set.is_negated());
        }
        other => panic!("expected InInts, got {:?}", other),
    }
    match compile("rec('Name') IN ('Egg', 'Fig')") {
        Condition::InStrs(set) => assert_eq!(set.choices(), ["Egg", "Fig"]),
        other => panic!("expected InStrs, got {:?}", other),
    }
    assert!(matches!(
        compile("rec('ID') in arg('sources')"),
        Condition::InCall(set) if !set.is_negated()
    ));
}

#[test]
fn test_single_choice_becomes_equality() {
    match compile("rec('ID') in (7)") {
        Condition::CompareInt(cmp) => {
            assert_eq!(cmp.op(), CompareOp::Eq);
            assert_eq!(*cmp.target(), 7);
        }
        other => panic!("expected CompareInt, got {:?}", other),
    }
    assert!(matches!(
        compile("not rec('Name') in ('Egg')"),
        Condition::CompareStr(c) if c.op() == CompareOp::Ne
    ));
}

#[test]
fn test_and_binds_tighter_than_or() {
    match compile("rec('ID') = 1 or rec('ID') = 2 and rec('Level') = 3") {
        Condition::Or(children) => {
            assert_eq!(children.len(), 2);
            assert!(matches!(children[0], Condition::CompareInt(_)));
            assert!(matches!(&children[1], Condition::And(inner) if inner.len() == 2));
        }
        other => panic!("expected Or, got {:?}", other),
    }
}

#[test]
fn test_chains_are_flat() {
    assert!(matches!(
        compile("rec('ID') = 1 and rec('ID') = 2 and rec('ID') = 3"),
        Condition::And(children) if children.len() == 3
    ));
    assert!(matches!(
        compile("rec('ID') = 1 or rec('ID') = 2 or rec('ID') = 3"),
        Condition::Or(children) if children.len() == 3
    ));
}

#[test]
fn test_parentheses_collapse() {
    assert!(matches!(compile("((rec('ID') = 1))"), Condition::CompareInt(_)));
}

#[test]
fn test_keywords_case_insensitive() {
    assert!(matches!(
        compile("rec('ID') = 1 AnD NoT rec('ID') In (2, 3) oR level_at_least(1)"),
        Condition::Or(_)
    ));
}

// ==================== Negation Tests ====================

#[test]
fn test_not_reverses_operator() {
    assert!(matches!(
        compile("not rec('ID') < 3"),
        Condition::CompareInt(c) if c.op() == CompareOp::Ge
    ));
}

#[test]
fn test_not_pushes_through_and() {
    match compile("not (rec('ID') = 1 and rec('Name') in ('a', 'b'))") {
        Condition::Or(children) => {
            assert!(matches!(&children[0], Condition::CompareInt(c) if c.op() == CompareOp::Ne));
            assert!(matches!(&children[1], Condition::InStrs(s) if s.is_negated()));
        }
        other => panic!("expected Or, got {:?}", other),
    }
}

#[test]
fn test_not_toggles_call() {
    assert!(matches!(
        compile("not level_at_least(1)"),
        Condition::Call(c) if c.is_negated()
    ));
    assert!(matches!(
        compile("not rec('ID') in arg('sources')"),
        Condition::InCall(s) if s.is_negated()
    ));
}

#[test]
fn test_double_not_is_identity() {
    assert!(matches!(
        compile("not not rec('ID') = 1"),
        Condition::CompareInt(c) if c.op() == CompareOp::Eq
    ));
    assert!(matches!(
        compile("not (not (rec('ID') = 1 or rec('ID') = 2))"),
        Condition::Or(_)
    ));
}

#[test]
fn test_parsed_tree_has_no_not_nodes() {
    let dump = compile("not (rec('ID') = 1 or not (rec('Level') > 2 and level_at_least(4)))").to_string();
    assert!(!dump.contains("NOT ("), "{}", dump);
}

// ==================== Literal Tests ====================

#[test]
fn test_negative_integer() {
    assert!(matches!(
        compile("rec('ID') > -10"),
        Condition::CompareInt(c) if *c.target() == -10
    ));
}

#[test]
fn test_string_escapes() {
    assert!(matches!(
        compile(r"rec('Name') = 'it\'s\tok'"),
        Condition::CompareStr(c) if c.target() == "it's\tok"
    ));
}

// ==================== Evaluation Tests ====================

#[test]
fn test_evaluate_parsed() {
    assert!(holds("rec('ID') = 3"));
    assert!(holds("rec('Name') = 'Cherry' and rec('Level') >= 8"));
    assert!(!holds("rec('Name') = 'Cherry' and rec('Level') > 8"));
    assert!(holds("rec('ID') in arg('sources')"));
    assert!(!holds("rec('ID') = arg('uid')"));
    assert!(holds("level_at_least(8)"));
    assert!(!holds("not level_at_least(8)"));
}

#[test]
fn test_fallback_binds_unknown_names() {
    let config = config().with_default_int_method(|name: &str, r: &Record, n: i64| {
        Ok(Value::Bool(name == "is" && r.id == n))
    });
    let cond = Parser::compile("is(3) and not whatever(3)", &config).unwrap();
    assert!(cond.matches(&RECORD).unwrap());
}

#[test]
fn test_bindings_are_captured_at_parse_time() {
    let before = config();
    let cond = Parser::compile("rec('ID') = 3", &before).unwrap();

    let after = before
        .clone()
        .with_str_method("rec", |_: &Record, _: &str| Ok(Value::Int(0)));
    assert!(cond.matches(&RECORD).unwrap());
    assert!(!Parser::compile("rec('ID') = 3", &after)
        .unwrap()
        .matches(&RECORD)
        .unwrap());
}

// ==================== Cache Tests ====================

#[test]
fn test_parse_without_cache_builds_fresh_trees() {
    let config = config();
    let first = parse("rec('ID') = 1", &config).unwrap();
    let second = parse("rec('ID') = 1", &config).unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
}

#[test]
fn test_parse_with_cache_reuses_tree() {
    let config = config().with_cache_config(&CacheConfig::Unbounded);
    let first = parse("rec('ID') = 1", &config).unwrap();
    let second = config.parse("rec('ID') = 1").unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    // Keys are not normalized
    let spaced = parse("rec('ID')  = 1", &config).unwrap();
    assert!(!Arc::ptr_eq(&first, &spaced));
}

#[test]
fn test_failed_parse_is_not_cached() {
    let cache = Arc::new(MapCache::<Record>::new());
    let config = config().with_cache(cache.clone());
    assert!(parse("rec('ID') =", &config).is_err());
    assert!(cache.is_empty());
    assert!(parse("rec('ID') = 1", &config).is_ok());
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_compile_skips_cache() {
    let cache = Arc::new(LruCache::<Record>::new(4));
    let config = config().with_cache(cache.clone());
    config.compile("rec('ID') = 1").unwrap();
    assert!(cache.is_empty());
}

#[test]
fn test_clone_does_not_share_cache() {
    let base = config().with_cache_config(&CacheConfig::Unbounded);
    let cached = base.parse("rec('ID') = 3").unwrap();
    assert!(cached.matches(&RECORD).unwrap());

    let rebound = base
        .clone()
        .with_str_method("rec", |_: &Record, _: &str| Ok(Value::Int(0)));
    assert!(rebound.cache().is_none());

    let fresh = rebound.parse("rec('ID') = 3").unwrap();
    assert!(!Arc::ptr_eq(&cached, &fresh));
    assert!(!fresh.matches(&RECORD).unwrap());

    // The original keeps its cache
    assert!(Arc::ptr_eq(&cached, &base.parse("rec('ID') = 3").unwrap()));
}

// ==================== Error Tests ====================

#[test]
fn test_empty_input() {
    assert_eq!(compile_err(""), ParseError::unexpected_end(0));
    assert_eq!(compile_err("   "), ParseError::unexpected_end(3));
}

#[test]
fn test_unexpected_end() {
    assert_eq!(compile_err("rec('ID') ="), ParseError::unexpected_end(11));
    assert_eq!(compile_err("rec('ID') = 1 and"), ParseError::unexpected_end(17));
    assert_eq!(compile_err("(rec('ID') = 1"), ParseError::unexpected_end(14));
    assert_eq!(compile_err("rec('ID'"), ParseError::unexpected_end(8));
}

#[test]
fn test_unterminated_string_is_unexpected_end() {
    assert_eq!(compile_err("rec('Name') = 'abc"), ParseError::unexpected_end(18));
}

#[test]
fn test_trailing_tokens_rejected() {
    assert_eq!(
        compile_err("rec('ID') = 1)"),
        ParseError::unexpected_token(TokenKind::RightParen, 13)
    );
    assert_eq!(
        compile_err("rec('ID') = 1 rec('ID') = 2"),
        ParseError::unexpected_token(TokenKind::Ident, 14)
    );
}

#[test]
fn test_illegal_character() {
    assert_eq!(
        compile_err("rec('ID') ! 1"),
        ParseError::unexpected_token(TokenKind::Illegal, 10)
    );
}

#[test]
fn test_call_argument_must_be_literal() {
    assert_eq!(
        compile_err("rec(rec('ID'))"),
        ParseError::unexpected_token(TokenKind::Ident, 4)
    );
    assert_eq!(
        compile_err("rec() = 1"),
        ParseError::unexpected_token(TokenKind::RightParen, 4)
    );
}

#[test]
fn test_mixed_membership_types() {
    assert_eq!(
        compile_err("rec('ID') in (1, 'a')"),
        ParseError::unexpected_token(TokenKind::Str, 17)
    );
    assert_eq!(
        compile_err("rec('ID') in ()"),
        ParseError::unexpected_token(TokenKind::RightParen, 14)
    );
}

#[test]
fn test_no_such_method() {
    let err = compile_err("rec('ID') = 1 or recc('ID') = 2");
    assert_eq!(err.offset, 17);
    assert_eq!(
        err.kind,
        ParseErrorKind::NoSuchMethod {
            name: "recc".to_string(),
            arg: LiteralKind::Str,
            suggestion: Some("rec".to_string()),
        }
    );
}

#[test]
fn test_no_such_method_wrong_argument_type() {
    // `rec` only takes strings
    let err = compile_err("rec(1) = 1");
    assert_eq!(
        err.kind,
        ParseErrorKind::NoSuchMethod {
            name: "rec".to_string(),
            arg: LiteralKind::Int,
            suggestion: None,
        }
    );
}

#[test]
fn test_invalid_integer() {
    assert_eq!(
        compile_err("rec('ID') = 99999999999999999999"),
        ParseError::invalid_integer("99999999999999999999", 12)
    );
}

// ==================== Nesting Tests ====================

fn nested(depth: usize, inner: &str) -> String {
    format!("{}{}{}", "(".repeat(depth), inner, ")".repeat(depth))
}

#[test]
fn test_nesting_at_limit_parses() {
    assert!(holds(&nested(MAX_NESTING_DEPTH, "rec('ID') = 3")));
}

#[test]
fn test_nesting_past_limit_is_rejected() {
    let err = compile_err(&nested(MAX_NESTING_DEPTH + 1, "rec('ID') = 3"));
    assert_eq!(err, ParseError::too_deep(MAX_NESTING_DEPTH, MAX_NESTING_DEPTH));

    // Unbalanced input deep enough to exhaust the stack without a limit
    let err = compile_err(&"(".repeat(20_000));
    assert_eq!(err.kind, ParseErrorKind::TooDeep { limit: MAX_NESTING_DEPTH });
    assert_eq!(err.offset, MAX_NESTING_DEPTH);
}

#[test]
fn test_negated_groups_count_against_limit() {
    let err = compile_err(&"not (".repeat(100));
    // Each "not (" is five chars; the paren is the last of them
    assert_eq!(err.offset, MAX_NESTING_DEPTH * 5 + 4);
    assert_eq!(err.kind, ParseErrorKind::TooDeep { limit: MAX_NESTING_DEPTH });
}

#[test]
fn test_long_not_chain() {
    let even = format!("{}rec('ID') = 1", "not ".repeat(20_000));
    match compile(&even) {
        Condition::CompareInt(cmp) => assert_eq!(cmp.op(), CompareOp::Eq),
        other => panic!("expected CompareInt, got {:?}", other),
    }

    let odd = format!("{}rec('ID') = 1", "not ".repeat(20_001));
    match compile(&odd) {
        Condition::CompareInt(cmp) => assert_eq!(cmp.op(), CompareOp::Ne),
        other => panic!("expected CompareInt, got {:?}", other),
    }
    assert!(holds(&odd));
}

#[test]
fn test_not_chain_before_group() {
    assert!(holds("not not (rec('ID') = 3 and level_at_least(8))"));
    assert!(!holds("not not not (rec('ID') = 3 and level_at_least(8))"));
}
