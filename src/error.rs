use std::fmt;

use crate::{output, tree::NodeId, tree::Tree, value::ConversionError};

/// How many ancestors above the failing node a diagnostic outline starts.
const CONTEXT_DEPTH: usize = 2;

/// What went wrong with an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// Malformed expression text
    Syntax(String),

    /// Regex flag outside of `imswdcer`
    UnknownRegexOption(char),

    /// Regex token without its closing `/`
    UnterminatedRegex(String),

    /// Regex pattern the regex engine rejected
    InvalidRegex(String),

    /// `(` without `)`, or `)` without `(`
    UnbalancedGroup,

    /// Unknown `?type` declaration
    UnknownType(String),

    /// Typed value or cast that could not be converted
    Conversion(ConversionError),

    /// Reference expressions nested too deep
    ReferenceDepth,

    /// Match type that cannot be assigned to
    InvalidAssignment(String),
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Syntax(message) => write!(f, "{}", message),
            ErrorKind::UnknownRegexOption(option) => {
                write!(f, "Unknown regex option '{}'", option)
            }
            ErrorKind::UnterminatedRegex(token) => {
                write!(f, "Regex '{}' is missing its closing '/'", token)
            }
            ErrorKind::InvalidRegex(message) => write!(f, "Invalid regex: {}", message),
            ErrorKind::UnbalancedGroup => write!(f, "Unbalanced parentheses"),
            ErrorKind::UnknownType(name) => write!(f, "Unknown type declaration '{}'", name),
            ErrorKind::Conversion(e) => write!(f, "{}", e),
            ErrorKind::ReferenceDepth => write!(f, "Reference expressions nested too deep"),
            ErrorKind::InvalidAssignment(message) => write!(f, "{}", message),
        }
    }
}

/// Error raised while parsing or evaluating an expression.
///
/// Carries the full expression text and, when known, the node being
/// processed when the error occurred.
///
/// # Examples
///
/// ```
/// use p5x::Expression;
///
/// let err = Expression::parse("_data").unwrap_err();
/// assert!(err.to_string().ends_with("Expression '_data' is not a valid expression."));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionError {
    pub expression: String,
    pub kind: ErrorKind,
    pub node: Option<NodeId>,
}

impl ExpressionError {
    pub fn new(expression: impl Into<String>, kind: ErrorKind) -> Self {
        ExpressionError {
            expression: expression.into(),
            kind,
            node: None,
        }
    }

    pub fn syntax(expression: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(expression, ErrorKind::Syntax(message.into()))
    }

    /// Attaches the node being processed, unless one is already set.
    pub fn with_node(mut self, node: NodeId) -> Self {
        self.node.get_or_insert(node);
        self
    }

    /// Node to show in diagnostics: two ancestors above the failing node, or
    /// the highest one available.
    pub fn context_node(&self, tree: &Tree) -> Option<NodeId> {
        let node = self.node?;
        Some(
            tree.ancestors(node)
                .take(CONTEXT_DEPTH)
                .last()
                .unwrap_or(node),
        )
    }

    /// Outline of [`Self::context_node`].
    pub fn stack_trace(&self, tree: &Tree) -> Option<String> {
        self.context_node(tree).map(|node| output::outline(tree, node))
    }
}

impl fmt::Display for ExpressionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\nExpression '{}' is not a valid expression.",
            self.kind, self.expression
        )
    }
}

impl std::error::Error for ExpressionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ErrorKind::Conversion(e) => Some(e),
            _ => None,
        }
    }
}
