pub mod ast;
pub mod error;
pub mod evaluator;
pub mod expression;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod tree;
pub mod value;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{IteratorGroup, Logical, LogicalKind, MatchType, NodeIterator, Token};
pub use error::{ErrorKind, ExpressionError};
pub use evaluator::Nodes;
pub use expression::{Expression, Match, MatchEntity, MAX_REFERENCE_DEPTH};
pub use lexer::{LexError, Lexer};
pub use output::outline;
pub use parser::{ParsedExpression, Parser};
pub use tree::{Dna, NodeId, Tree, TreeError};
pub use value::{ConversionError, Value};

/// Parses `expression` and evaluates it with `seed` as the starting node.
pub fn evaluate(tree: &Tree, seed: NodeId, expression: &str) -> Result<Match, ExpressionError> {
    Expression::parse(expression)?.evaluate(tree, seed)
}
