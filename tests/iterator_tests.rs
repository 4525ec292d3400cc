use p5x::{Dna, Expression, NodeId, Tree, Value};

/// ```text
/// ""
///   _data
///     foo1:bar1
///       a:x
///       b:y
///     foo2:bar2
///     foo3:bar3
///   _x:0-0            path as string
///   _y:path:0-1
///   _z:node:foo3
///   _n:int:5
/// ```
fn build() -> (Tree, NodeId) {
    let mut tree = Tree::new();
    let root = tree.add_root("", None);
    let data = tree.add_child(root, "_data", None);
    let foo1 = tree.add_child(data, "foo1", Some(Value::from("bar1")));
    tree.add_child(foo1, "a", Some(Value::from("x")));
    tree.add_child(foo1, "b", Some(Value::from("y")));
    tree.add_child(data, "foo2", Some(Value::from("bar2")));
    let foo3 = tree.add_child(data, "foo3", Some(Value::from("bar3")));
    tree.add_child(root, "_x", Some(Value::from("0-0")));
    tree.add_child(root, "_y", Some(Value::Path(Dna::new(vec![0, 1]))));
    tree.add_child(root, "_z", Some(Value::Node(foo3)));
    tree.add_child(root, "_n", Some(Value::Integer(5)));
    (tree, root)
}

fn at(tree: &Tree, root: NodeId, path: &str) -> NodeId {
    tree.find(root, &path.parse().unwrap()).unwrap()
}

fn names(tree: &Tree, seed: NodeId, expression: &str) -> Vec<String> {
    let matched = Expression::parse(expression)
        .unwrap()
        .evaluate(tree, seed)
        .unwrap();
    matched.nodes().map(|node| tree.name(node).to_string()).collect()
}

// ============================================================================
// Seed and structure
// ============================================================================

#[test]
fn test_empty_expression_yields_seed() {
    let (tree, root) = build();
    let foo2 = at(&tree, root, "0-1");
    assert_eq!(names(&tree, foo2, ""), vec!["foo2"]);
}

#[test]
fn test_children() {
    let (tree, root) = build();
    assert_eq!(names(&tree, root, "/*"), vec!["_data", "_x", "_y", "_z", "_n"]);
    assert_eq!(names(&tree, root, "/*/_data/*"), vec!["foo1", "foo2", "foo3"]);
}

#[test]
fn test_children_of_leaf_is_empty() {
    let (tree, root) = build();
    assert!(names(&tree, root, "/*/_n/*").is_empty());
}

#[test]
fn test_parent() {
    let (tree, root) = build();
    // three parents, collapsed by the implicit OR
    assert_eq!(names(&tree, root, "/*/_data/*/."), vec!["_data"]);
}

#[test]
fn test_parent_of_root_is_empty() {
    let (tree, root) = build();
    assert!(names(&tree, root, "/.").is_empty());
}

#[test]
fn test_root() {
    let (tree, root) = build();
    let a = at(&tree, root, "0-0-0");
    assert_eq!(names(&tree, a, "/.."), vec![""]);
    assert_eq!(names(&tree, root, "/*/_data/*/.."), vec![""]);
}

#[test]
fn test_flatten() {
    let (tree, root) = build();
    assert_eq!(
        names(&tree, root, "/*/_data/**"),
        vec!["_data", "foo1", "a", "b", "foo2", "foo3"]
    );
}

#[test]
fn test_numbered() {
    let (tree, root) = build();
    assert_eq!(names(&tree, root, "/0/1"), vec!["foo2"]);
    // only foo1 has a first child
    assert_eq!(names(&tree, root, "/*/_data/*/0"), vec!["a"]);
    assert!(names(&tree, root, "/0/3").is_empty());
}

#[test]
fn test_named() {
    let (tree, root) = build();
    assert_eq!(names(&tree, root, "/*/_data/*/foo2"), vec!["foo2"]);
    assert!(names(&tree, root, "/*/_data/*/foo").is_empty());
}

#[test]
fn test_named_ancestor() {
    let (tree, root) = build();
    let a = at(&tree, root, "0-0-0");
    assert_eq!(names(&tree, a, "/.._data"), vec!["_data"]);
    assert_eq!(names(&tree, a, "/..foo1"), vec!["foo1"]);
    // a node is not its own ancestor
    assert!(names(&tree, a, "/..a").is_empty());
}

// ============================================================================
// Siblings and document order
// ============================================================================

#[test]
fn test_siblings() {
    let (tree, root) = build();
    let foo1 = at(&tree, root, "0-0");
    assert_eq!(names(&tree, foo1, "/+"), vec!["foo2"]);
    assert_eq!(names(&tree, foo1, "/+2"), vec!["foo3"]);
    assert_eq!(names(&tree, foo1, "/+2/-"), vec!["foo2"]);
}

#[test]
fn test_siblings_do_not_wrap() {
    let (tree, root) = build();
    let foo1 = at(&tree, root, "0-0");
    assert!(names(&tree, foo1, "/-").is_empty());
    assert!(names(&tree, foo1, "/+3").is_empty());
    assert!(names(&tree, root, "/+").is_empty());
}

#[test]
fn test_huge_sibling_offset_yields_nothing() {
    let (tree, root) = build();
    let foo2 = at(&tree, root, "0-1");
    assert!(names(&tree, foo2, "/+9223372036854775807").is_empty());
    assert!(names(&tree, foo2, "/-9223372036854775807").is_empty());
}

#[test]
fn test_shift_left() {
    let (tree, root) = build();
    let foo2 = at(&tree, root, "0-1");
    let foo1 = at(&tree, root, "0-0");
    // deepest last descendant of the previous sibling
    assert_eq!(names(&tree, foo2, "/<"), vec!["b"]);
    assert_eq!(names(&tree, foo1, "/<"), vec!["_data"]);
    assert!(names(&tree, root, "/<").is_empty());
}

#[test]
fn test_shift_right() {
    let (tree, root) = build();
    let foo1 = at(&tree, root, "0-0");
    let foo3 = at(&tree, root, "0-2");
    let last = at(&tree, root, "4");
    assert_eq!(names(&tree, root, "/>"), vec!["_data"]);
    assert_eq!(names(&tree, foo1, "/>"), vec!["a"]);
    // climbs to the nearest ancestor with a next sibling
    assert_eq!(names(&tree, foo3, "/>"), vec!["_x"]);
    assert!(names(&tree, last, "/>").is_empty());
}

// ============================================================================
// Values
// ============================================================================

#[test]
fn test_valued() {
    let (tree, root) = build();
    assert_eq!(names(&tree, root, "/*/_data/*/=bar2"), vec!["foo2"]);
    assert!(names(&tree, root, "/*/_data/*/=bar").is_empty());
}

#[test]
fn test_typed_valued() {
    let (tree, root) = build();
    assert_eq!(names(&tree, root, "/*/=:int:5"), vec!["_n"]);
    // the string "5" is not the integer 5
    assert!(names(&tree, root, "/*/=5").is_empty());
    assert_eq!(names(&tree, root, "/*/=:path:0-1"), vec!["_y"]);
}

#[test]
fn test_typed_valued_with_escaped_value() {
    let (tree, root) = build();
    assert_eq!(names(&tree, root, "/*/_data/*/=:string:\\bar2"), vec!["foo2"]);
}

#[test]
fn test_valued_skips_nodes_without_value() {
    let (tree, root) = build();
    assert!(names(&tree, root, "/*/=").is_empty());
}

// ============================================================================
// Regexes
// ============================================================================

#[test]
fn test_named_regex() {
    let (tree, root) = build();
    assert_eq!(
        names(&tree, root, r#"/*/_data/*/"/^foo[12]$/""#),
        vec!["foo1", "foo2"]
    );
    assert_eq!(
        names(&tree, root, r#"/*/_data/*/"/^FOO3$/i""#),
        vec!["foo3"]
    );
}

#[test]
fn test_valued_regex() {
    let (tree, root) = build();
    assert_eq!(
        names(&tree, root, r#"/*/_data/*/"=/^bar[23]$/""#),
        vec!["foo2", "foo3"]
    );
    // matches the text form of typed values, skips nodes without one
    assert_eq!(names(&tree, root, r#"/*/"=/^5$/""#), vec!["_n"]);
    assert_eq!(names(&tree, root, r#"/*/"=/^0-/""#), vec!["_x", "_y"]);
}

#[test]
fn test_distinct_regex() {
    let mut tree = Tree::new();
    let root = tree.add_root("", None);
    tree.add_child(root, "x", Some(Value::from("one")));
    tree.add_child(root, "x", Some(Value::from("two")));
    tree.add_child(root, "y", Some(Value::from("one")));

    let matched = Expression::parse(r#"/*/"/^[xy]$/d""#)
        .unwrap()
        .evaluate(&tree, root)
        .unwrap();
    assert_eq!(matched.len(), 2);

    let matched = Expression::parse(r#"/*/"=/o/d""#)
        .unwrap()
        .evaluate(&tree, root)
        .unwrap();
    let values: Vec<_> = matched.nodes().map(|node| tree.value(node).cloned()).collect();
    assert_eq!(
        values,
        vec![Some(Value::from("one")), Some(Value::from("two"))]
    );
}

// ============================================================================
// Positions
// ============================================================================

#[test]
fn test_modulo() {
    let (tree, root) = build();
    assert_eq!(names(&tree, root, "/*/_data/*/%2"), vec!["foo1", "foo3"]);
    assert_eq!(names(&tree, root, "/*/%3"), vec!["_data", "_z"]);
    assert_eq!(names(&tree, root, "/*/_data/*/%1"), vec!["foo1", "foo2", "foo3"]);
}

#[test]
fn test_range() {
    let (tree, root) = build();
    assert_eq!(names(&tree, root, "/*/_data/*/[1,3]"), vec!["foo2", "foo3"]);
    assert_eq!(names(&tree, root, "/*/_data/*/[,2]"), vec!["foo1", "foo2"]);
    assert_eq!(names(&tree, root, "/*/_data/*/[2,]"), vec!["foo3"]);
    assert_eq!(names(&tree, root, "/*/[0,1]"), vec!["_data"]);
    assert!(names(&tree, root, "/*/_data/*/[5,9]").is_empty());
}

// ============================================================================
// References
// ============================================================================

#[test]
fn test_reference_to_path_string() {
    let (tree, root) = build();
    assert_eq!(names(&tree, root, "/*/_x/#"), vec!["foo1"]);
}

#[test]
fn test_reference_to_path_value() {
    let (tree, root) = build();
    assert_eq!(names(&tree, root, "/*/_y/#"), vec!["foo2"]);
}

#[test]
fn test_reference_to_node_value() {
    let (tree, root) = build();
    assert_eq!(names(&tree, root, "/*/_z/#"), vec!["foo3"]);
}

#[test]
fn test_reference_skips_other_values() {
    let (tree, root) = build();
    // "bar1" is not a path, _data has no value, 5 is an integer
    assert!(names(&tree, root, "/*/_data/*/#").is_empty());
    assert!(names(&tree, root, "/*/_data/#").is_empty());
    assert!(names(&tree, root, "/*/_n/#").is_empty());
}

#[test]
fn test_reference_to_missing_path() {
    let (mut tree, root) = build();
    tree.add_child(root, "_w", Some(Value::from("7-7")));
    assert!(names(&tree, root, "/*/_w/#").is_empty());
}

// ============================================================================
// Groups and document order
// ============================================================================

/// ```text
/// root
///   A
///     x:1
///     x:2
///   B
///     x:3
/// ```
fn build_repeated() -> (Tree, [NodeId; 6]) {
    let mut tree = Tree::new();
    let root = tree.add_root("root", None);
    let a = tree.add_child(root, "A", None);
    let a1 = tree.add_child(a, "x", Some(Value::Integer(1)));
    let a2 = tree.add_child(a, "x", Some(Value::Integer(2)));
    let b = tree.add_child(root, "B", None);
    let b1 = tree.add_child(b, "x", Some(Value::Integer(3)));
    (tree, [root, a, a1, a2, b, b1])
}

#[test]
fn test_flatten_then_named_in_document_order() {
    let (tree, [root, ..]) = build_repeated();
    let matched = Expression::parse("/**/x?value")
        .unwrap()
        .evaluate(&tree, root)
        .unwrap();
    assert_eq!(
        matched.values(&tree).unwrap(),
        vec![
            Some(Value::Integer(1)),
            Some(Value::Integer(2)),
            Some(Value::Integer(3)),
        ]
    );
}

#[test]
fn test_reseeded_group_drops_nested_results() {
    let (tree, [_, a, a1, a2, b, b1]) = build_repeated();
    let expression = Expression::parse("/*(/x)").unwrap();

    let first = expression.group(a);
    assert_eq!(first.evaluate(&tree).to_vec(), vec![a1, a2]);

    let reseeded = first.clone().seeded(b);
    assert!(!reseeded.is_evaluated());
    assert_eq!(reseeded.evaluate(&tree).to_vec(), vec![b1]);
}

#[test]
fn test_evaluating_template_does_not_leak() {
    let (tree, [_, a, a1, a2, ..]) = build_repeated();
    let expression = Expression::parse("/*(/x)").unwrap();

    assert!(expression.template().evaluate(&tree).is_empty());
    let matched = expression.evaluate(&tree, a).unwrap();
    assert_eq!(matched.nodes().collect::<Vec<_>>(), vec![a1, a2]);
}
