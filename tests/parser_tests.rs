use p5x::{
    ast::IteratorGroup, Dna, ErrorKind, ExpressionError, Lexer, LogicalKind, MatchType,
    NodeIterator, ParsedExpression, Parser, Value,
};

fn parse(input: &str) -> Result<ParsedExpression, ExpressionError> {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer)?;
    parser.parse()
}

/// Iterators of the first logical of the top-level group.
fn pipeline(input: &str) -> Vec<NodeIterator> {
    let parsed = parse(input).unwrap();
    parsed.group.logicals[0].iterators.clone()
}

fn single(input: &str) -> NodeIterator {
    let mut iterators = pipeline(input);
    assert_eq!(iterators.len(), 1, "expected one iterator for {}", input);
    iterators.remove(0)
}

fn error_kind(input: &str) -> ErrorKind {
    parse(input).unwrap_err().kind
}

fn kinds(group: &IteratorGroup) -> Vec<LogicalKind> {
    group.logicals.iter().map(|logical| logical.kind).collect()
}

// ============================================================================
// Structure
// ============================================================================

#[test]
fn test_empty_expression() {
    let parsed = parse("").unwrap();
    assert_eq!(parsed.match_type, MatchType::Node);
    assert_eq!(parsed.group.logicals.len(), 1);
    assert!(parsed.group.logicals[0].iterators.is_empty());
}

#[test]
fn test_group_is_unseeded() {
    let parsed = parse("/*").unwrap();
    assert!(matches!(parsed.group.root, NodeIterator::LeftParent));
    assert!(!parsed.group.is_evaluated());
}

#[test]
fn test_pipeline_order() {
    let iterators = pipeline("/*/_data/*");
    assert!(matches!(
        &iterators[..],
        [NodeIterator::Children, NodeIterator::Named(name), NodeIterator::Children] if name == "_data"
    ));
}

#[test]
fn test_logicals() {
    let parsed = parse("/a|/b&/c^/d!/e").unwrap();
    assert_eq!(
        kinds(&parsed.group),
        vec![
            LogicalKind::Or,
            LogicalKind::Or,
            LogicalKind::And,
            LogicalKind::Xor,
            LogicalKind::Not,
        ]
    );
    for logical in &parsed.group.logicals {
        assert_eq!(logical.iterators.len(), 1);
    }
}

#[test]
fn test_nested_group() {
    let iterators = pipeline("/*(/a|/b)/*");
    assert_eq!(iterators.len(), 3);
    let NodeIterator::Group(nested) = &iterators[1] else {
        panic!("expected a nested group, got {:?}", iterators[1]);
    };
    assert!(matches!(nested.root, NodeIterator::LeftParent));
    assert_eq!(kinds(nested), vec![LogicalKind::Or, LogicalKind::Or]);
}

#[test]
fn test_deeply_nested_groups() {
    let iterators = pipeline("/*(/a(/b(/c)))");
    let NodeIterator::Group(outer) = &iterators[1] else {
        panic!("expected a group");
    };
    let NodeIterator::Group(middle) = &outer.logicals[0].iterators[1] else {
        panic!("expected a group");
    };
    assert!(matches!(middle.logicals[0].iterators[1], NodeIterator::Group(_)));
}

// ============================================================================
// Empty names
// ============================================================================

#[test]
fn test_double_slash() {
    assert!(matches!(
        &pipeline("/a//")[..],
        [NodeIterator::Named(a), NodeIterator::Named(empty)] if a == "a" && empty.is_empty()
    ));
}

#[test]
fn test_slash_before_type() {
    let parsed = parse("/a/?name").unwrap();
    assert_eq!(parsed.match_type, MatchType::Name);
    assert_eq!(parsed.group.logicals[0].iterators.len(), 2);
}

#[test]
fn test_slash_before_logical() {
    let parsed = parse("/a/|/b").unwrap();
    assert_eq!(parsed.group.logicals[0].iterators.len(), 2);
    assert_eq!(parsed.group.logicals[1].iterators.len(), 1);
}

#[test]
fn test_quoted_empty_name() {
    assert!(matches!(single(r#"/"""#), NodeIterator::Named(name) if name.is_empty()));
}

// ============================================================================
// Iterator tokens
// ============================================================================

#[test]
fn test_structural_tokens() {
    assert!(matches!(single("/*"), NodeIterator::Children));
    assert!(matches!(single("/**"), NodeIterator::Flatten));
    assert!(matches!(single("/."), NodeIterator::Parent));
    assert!(matches!(single("/.."), NodeIterator::Root));
    assert!(matches!(single("/#"), NodeIterator::Reference));
    assert!(matches!(single("/<"), NodeIterator::ShiftLeft));
    assert!(matches!(single("/>"), NodeIterator::ShiftRight));
}

#[test]
fn test_named_tokens() {
    assert!(matches!(single("/foo"), NodeIterator::Named(name) if name == "foo"));
    assert!(matches!(single("/..foo"), NodeIterator::NamedAncestor(name) if name == "foo"));
    assert!(matches!(single(r"/\*"), NodeIterator::Named(name) if name == "*"));
    assert!(matches!(single(r"/\12"), NodeIterator::Named(name) if name == "12"));
}

#[test]
fn test_numbered() {
    assert!(matches!(single("/12"), NodeIterator::Numbered(12)));
}

#[test]
fn test_siblings() {
    assert!(matches!(single("/+"), NodeIterator::Sibling(1)));
    assert!(matches!(single("/-"), NodeIterator::Sibling(-1)));
    assert!(matches!(single("/+3"), NodeIterator::Sibling(3)));
    assert!(matches!(single("/-2"), NodeIterator::Sibling(-2)));
}

#[test]
fn test_modulo() {
    assert!(matches!(single("/%3"), NodeIterator::Modulo(3)));
}

#[test]
fn test_ranges() {
    assert!(matches!(single("/[1,3]"), NodeIterator::Range { start: 1, end: Some(3) }));
    assert!(matches!(single("/[,2]"), NodeIterator::Range { start: 0, end: Some(2) }));
    assert!(matches!(single("/[2,]"), NodeIterator::Range { start: 2, end: None }));
    assert!(matches!(single("/[ 1 , 4 ]"), NodeIterator::Range { start: 1, end: Some(4) }));
}

#[test]
fn test_valued() {
    assert!(matches!(
        single("/=foo"),
        NodeIterator::Valued(Value::String(text)) if text == "foo"
    ));
    assert!(matches!(
        single(r"/=\:foo"),
        NodeIterator::Valued(Value::String(text)) if text == ":foo"
    ));
    assert!(matches!(single("/=:int:5"), NodeIterator::Valued(Value::Integer(5))));
    assert!(matches!(single("/=:bool:true"), NodeIterator::Valued(Value::Boolean(true))));
    assert!(matches!(
        single("/=:path:0-1"),
        NodeIterator::Valued(Value::Path(dna)) if dna == Dna::new(vec![0, 1])
    ));
    assert!(matches!(
        single("/=:string:a:b"),
        NodeIterator::Valued(Value::String(text)) if text == "a:b"
    ));
}

#[test]
fn test_regex_tokens() {
    let NodeIterator::NamedRegex(regex) = single(r#"/"/^foo/id""#) else {
        panic!("expected a named regex");
    };
    assert!(regex.distinct);
    assert!(regex.is_match("FOOBAR"));

    let NodeIterator::ValuedRegex(regex) = single(r#"/"=/bar$/""#) else {
        panic!("expected a valued regex");
    };
    assert!(!regex.distinct);
    assert!(regex.is_match("foobar"));
}

// ============================================================================
// Types
// ============================================================================

#[test]
fn test_match_types() {
    assert_eq!(parse("/*?node").unwrap().match_type, MatchType::Node);
    assert_eq!(parse("/*?name").unwrap().match_type, MatchType::Name);
    assert_eq!(parse("/*?value").unwrap().match_type, MatchType::Value);
    assert_eq!(parse("/*?count").unwrap().match_type, MatchType::Count);
    assert_eq!(parse("/*?path").unwrap().match_type, MatchType::Path);
    assert_eq!(parse("?count").unwrap().match_type, MatchType::Count);
}

#[test]
fn test_cast() {
    let parsed = parse("/*?value.int").unwrap();
    assert_eq!(parsed.match_type, MatchType::Value);
    assert_eq!(parsed.cast.as_deref(), Some("int"));
    assert_eq!(parse("/*?value").unwrap().cast, None);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_missing_iterator_declaration() {
    assert!(matches!(error_kind("_data"), ErrorKind::Syntax(message) if message.contains("missing iterator")));
    assert!(matches!(error_kind("*/foo"), ErrorKind::Syntax(_)));
    assert!(matches!(error_kind("|/foo"), ErrorKind::Syntax(_)));
}

#[test]
fn test_unknown_type() {
    assert_eq!(error_kind("/*?foo"), ErrorKind::UnknownType("foo".to_string()));
    assert_eq!(error_kind("/*?"), ErrorKind::UnknownType("end of expression".to_string()));
}

#[test]
fn test_content_after_type() {
    assert!(matches!(error_kind("/*?value/foo"), ErrorKind::Syntax(_)));
}

#[test]
fn test_unbalanced_groups() {
    assert_eq!(error_kind("/*(/a"), ErrorKind::UnbalancedGroup);
    assert_eq!(error_kind("/a)"), ErrorKind::UnbalancedGroup);
    assert_eq!(error_kind("/*((/a)"), ErrorKind::UnbalancedGroup);
}

#[test]
fn test_regex_errors() {
    assert_eq!(error_kind(r#"/"/abc/q""#), ErrorKind::UnknownRegexOption('q'));
    assert_eq!(
        error_kind(r#"/"/abc""#),
        ErrorKind::UnterminatedRegex("/abc".to_string())
    );
    assert!(matches!(error_kind(r#"/"/(/""#), ErrorKind::InvalidRegex(_)));
    assert_eq!(error_kind(r#"/"=/abc/z""#), ErrorKind::UnknownRegexOption('z'));
}

#[test]
fn test_conversion_errors() {
    let ErrorKind::Conversion(err) = error_kind("/=:int:abc") else {
        panic!("expected a conversion error");
    };
    assert_eq!(err.type_name, "int");
    assert_eq!(err.value, "abc");
    assert!(matches!(error_kind("/=:nope:abc"), ErrorKind::Conversion(_)));
    assert!(matches!(error_kind("/=:int"), ErrorKind::Syntax(_)));
}

#[test]
fn test_numeric_token_errors() {
    assert!(matches!(error_kind("/%0"), ErrorKind::Syntax(_)));
    assert!(matches!(error_kind("/%x"), ErrorKind::Syntax(_)));
    assert!(matches!(error_kind("/+x"), ErrorKind::Syntax(_)));
    assert!(matches!(error_kind("/[3,1]"), ErrorKind::Syntax(_)));
    assert!(matches!(error_kind("/[2,2]"), ErrorKind::Syntax(_)));
    assert!(matches!(error_kind("/[1]"), ErrorKind::Syntax(_)));
    assert!(matches!(error_kind("/[a,2]"), ErrorKind::Syntax(_)));
    assert!(matches!(error_kind("/[1,2"), ErrorKind::Syntax(_)));
}

#[test]
fn test_lex_errors_become_syntax_errors() {
    let err = parse(r#"/"abc"#).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Syntax(message) if message.contains("Unterminated")));
    assert_eq!(err.expression, r#"/"abc"#);
}
