use std::collections::HashSet;

use crate::{
    ast::{NodeIterator, Token},
    tree::NodeId,
};

/// How a pipeline's result is merged into everything to its left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalKind {
    /// `|` and the implicit first pipeline
    Or,
    /// `&`
    And,
    /// `^`
    Xor,
    /// `!`
    Not,
}

impl LogicalKind {
    pub fn from_token(token: &Token) -> Option<Self> {
        match token {
            Token::Pipe => Some(LogicalKind::Or),
            Token::Ampersand => Some(LogicalKind::And),
            Token::Caret => Some(LogicalKind::Xor),
            Token::Exclamation => Some(LogicalKind::Not),
            _ => None,
        }
    }

    /// Merges `rhs` into `lhs`. Membership is node identity; order follows
    /// `lhs` first, then `rhs`.
    pub fn combine(self, lhs: Vec<NodeId>, rhs: Vec<NodeId>) -> Vec<NodeId> {
        match self {
            LogicalKind::Or => {
                let mut seen: HashSet<NodeId> = lhs.iter().copied().collect();
                let mut result = lhs;
                result.extend(rhs.into_iter().filter(|node| seen.insert(*node)));
                result
            }
            LogicalKind::And => {
                let right: HashSet<NodeId> = rhs.into_iter().collect();
                lhs.into_iter().filter(|node| right.contains(node)).collect()
            }
            LogicalKind::Xor => {
                let left: HashSet<NodeId> = lhs.iter().copied().collect();
                let right: HashSet<NodeId> = rhs.iter().copied().collect();
                let mut added = HashSet::new();
                let mut result: Vec<NodeId> =
                    lhs.into_iter().filter(|node| !right.contains(node)).collect();
                result.extend(
                    rhs.into_iter()
                        .filter(|node| !left.contains(node) && added.insert(*node)),
                );
                result
            }
            LogicalKind::Not => {
                let right: HashSet<NodeId> = rhs.into_iter().collect();
                lhs.into_iter().filter(|node| !right.contains(node)).collect()
            }
        }
    }
}

impl std::fmt::Display for LogicalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            LogicalKind::Or => "|",
            LogicalKind::And => "&",
            LogicalKind::Xor => "^",
            LogicalKind::Not => "!",
        };
        write!(f, "{}", symbol)
    }
}

/// A logical operator and the pipeline on its right-hand side.
#[derive(Debug, Clone)]
pub struct Logical {
    pub kind: LogicalKind,
    pub iterators: Vec<NodeIterator>,
}

impl Logical {
    pub fn new(kind: LogicalKind) -> Self {
        Logical {
            kind,
            iterators: Vec::new(),
        }
    }

    pub fn add_iterator(&mut self, iterator: NodeIterator) {
        self.iterators.push(iterator);
    }
}
