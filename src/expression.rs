//! Public entry point: parse an expression once, evaluate it against any seed.
//!
//! # Examples
//!
//! ```
//! use p5x::{Expression, Tree, Value};
//!
//! let mut tree = Tree::new();
//! let root = tree.add_root("", None);
//! let data = tree.add_child(root, "_data", None);
//! tree.add_child(data, "x", Some(Value::from("a")));
//! tree.add_child(data, "y", Some(Value::from("b")));
//!
//! let expression = Expression::parse("/*/_data/*?name").unwrap();
//! let matched = expression.evaluate(&tree, root).unwrap();
//! let names = matched.values(&tree).unwrap();
//! assert_eq!(names, vec![Some(Value::from("x")), Some(Value::from("y"))]);
//! ```

use std::{fmt, str::FromStr};

use tracing::{debug, trace};

use crate::{
    ast::{IteratorGroup, MatchType},
    error::{ErrorKind, ExpressionError},
    lexer::Lexer,
    output,
    parser::Parser,
    tree::{NodeId, Tree},
    value::{ConversionError, Value},
};

/// How deep reference expressions may refer to further reference expressions.
pub const MAX_REFERENCE_DEPTH: usize = 32;

/// A parsed, validated expression.
///
/// Parsing checks everything that can be checked without a tree, including
/// regexes and typed values. Evaluating a plain expression cannot fail; only
/// reference expressions (leading `@`) may fail at evaluation time, since the
/// expressions they point to are parsed then.
#[derive(Debug, Clone)]
pub struct Expression {
    text: String,
    reference: bool,
    match_type: MatchType,
    cast: Option<String>,
    template: IteratorGroup,
}

impl Expression {
    pub fn parse(text: &str) -> Result<Self, ExpressionError> {
        let (reference, body) = match text.strip_prefix('@') {
            Some(body) => (true, body),
            None => (false, text),
        };

        let parsed = Parser::new(Lexer::new(body))
            .and_then(|mut parser| parser.parse())
            .map_err(|mut e| {
                e.expression = text.to_string();
                e
            })?;

        if reference && !matches!(parsed.match_type, MatchType::Value | MatchType::Name) {
            return Err(ExpressionError::syntax(
                text,
                "Only 'value' and 'name' expressions can be reference expressions",
            ));
        }

        debug!(
            expression = %text,
            reference,
            match_type = %parsed.match_type,
            logicals = parsed.group.logicals.len(),
            "Parsed expression"
        );

        Ok(Expression {
            text: text.to_string(),
            reference,
            match_type: parsed.match_type,
            cast: parsed.cast,
            template: parsed.group,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_reference(&self) -> bool {
        self.reference
    }

    pub fn match_type(&self) -> MatchType {
        self.match_type
    }

    pub fn cast(&self) -> Option<&str> {
        self.cast.as_deref()
    }

    /// The unseeded group structure, for inspection.
    pub fn template(&self) -> &IteratorGroup {
        &self.template
    }

    /// A fresh, unevaluated group rooted at `seed`.
    pub fn group(&self, seed: NodeId) -> IteratorGroup {
        self.template.clone().seeded(seed)
    }

    /// Evaluates the expression with `seed` as the starting node.
    pub fn evaluate(&self, tree: &Tree, seed: NodeId) -> Result<Match, ExpressionError> {
        self.evaluate_at_depth(tree, seed, 0)
    }

    fn evaluate_at_depth(
        &self,
        tree: &Tree,
        seed: NodeId,
        depth: usize,
    ) -> Result<Match, ExpressionError> {
        let group = self.group(seed);
        let nodes = group.evaluate(tree);

        let mut entities = Vec::with_capacity(nodes.len());
        for &node in nodes {
            match tree.value(node) {
                Some(Value::Expression(inner)) if self.reference => {
                    if depth >= MAX_REFERENCE_DEPTH {
                        return Err(
                            ExpressionError::new(&self.text, ErrorKind::ReferenceDepth).with_node(node)
                        );
                    }
                    trace!(expression = %inner, depth, "Dereferencing expression");
                    let inner = Expression::parse(inner).map_err(|e| e.with_node(node))?;
                    let matched = inner.evaluate_at_depth(tree, node, depth + 1)?;
                    entities.extend(matched.entities);
                }
                _ => entities.push(MatchEntity {
                    node,
                    match_type: self.match_type,
                }),
            }
        }

        Ok(Match {
            expression: self.text.clone(),
            match_type: self.match_type,
            cast: self.cast.clone(),
            entities,
        })
    }
}

impl FromStr for Expression {
    type Err = ExpressionError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Expression::parse(text)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// One matched node, and what to project from it.
///
/// Entities pulled in through a reference expression keep the type of the
/// expression that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchEntity {
    pub node: NodeId,
    pub match_type: MatchType,
}

/// Result of evaluating an expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    expression: String,
    match_type: MatchType,
    cast: Option<String>,
    entities: Vec<MatchEntity>,
}

impl Match {
    pub fn match_type(&self) -> MatchType {
        self.match_type
    }

    pub fn cast(&self) -> Option<&str> {
        self.cast.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entities(&self) -> &[MatchEntity] {
        &self.entities
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entities.iter().map(|entity| entity.node)
    }

    /// Projects every entity by its match type, then applies the cast.
    ///
    /// A `count` match yields a single value, the number of matched nodes.
    pub fn values(&self, tree: &Tree) -> Result<Vec<Option<Value>>, ConversionError> {
        if self.match_type == MatchType::Count {
            let count = Value::Integer(self.len() as i64);
            return Ok(vec![Some(self.apply_cast(tree, count)?)]);
        }

        self.entities
            .iter()
            .map(|entity| {
                let value = match entity.match_type {
                    MatchType::Node => Some(Value::Node(entity.node)),
                    MatchType::Name => Some(Value::String(tree.name(entity.node).to_string())),
                    MatchType::Value => tree.value(entity.node).cloned(),
                    MatchType::Path => Some(Value::Path(tree.path(entity.node))),
                    MatchType::Count => Some(Value::Integer(self.len() as i64)),
                };
                value.map(|value| self.apply_cast(tree, value)).transpose()
            })
            .collect()
    }

    fn apply_cast(&self, tree: &Tree, value: Value) -> Result<Value, ConversionError> {
        match (&self.cast, value) {
            (None, value) => Ok(value),
            (Some(cast), Value::Node(node)) if cast == "string" => {
                Ok(Value::String(output::outline(tree, node)))
            }
            (Some(cast), value) => value.cast(cast),
        }
    }

    /// Writes `value` into every matched entity.
    ///
    /// - `name`: renames the node; `None` clears the name
    /// - `value`: sets or clears the value
    /// - `node`: `None` unties the node, `Some(Value::Node(n))` replaces it
    ///   with a deep clone of `n`
    ///
    /// `count` and `path` matches cannot be assigned to.
    pub fn assign(&self, tree: &mut Tree, value: Option<Value>) -> Result<(), ExpressionError> {
        for entity in &self.entities {
            let node = entity.node;
            match entity.match_type {
                MatchType::Name => {
                    let name = match &value {
                        Some(Value::Node(_)) => {
                            return Err(self.invalid("Cannot use a node as a name", node));
                        }
                        Some(value) => value.as_string(),
                        None => String::new(),
                    };
                    tree.set_name(node, name);
                }
                MatchType::Value => {
                    tree.set_value(node, value.clone());
                }
                MatchType::Node => match &value {
                    None => {
                        tree.untie(node);
                    }
                    Some(Value::Node(source)) => {
                        let copy = tree.deep_clone(*source);
                        tree.replace(node, copy)
                            .map_err(|e| self.invalid(e.to_string(), node))?;
                    }
                    Some(_) => {
                        return Err(self.invalid("Only nodes can replace nodes", node));
                    }
                },
                MatchType::Count | MatchType::Path => {
                    return Err(self.invalid(
                        format!("Cannot assign to a '{}' expression", entity.match_type),
                        node,
                    ));
                }
            }
        }
        Ok(())
    }

    fn invalid(&self, message: impl Into<String>, node: NodeId) -> ExpressionError {
        ExpressionError::new(&self.expression, ErrorKind::InvalidAssignment(message.into()))
            .with_node(node)
    }
}
