use regex::{Regex, RegexBuilder};

use crate::{ast::IteratorGroup, error::ErrorKind, tree::NodeId, value::Value};

/// A single stage of an iterator pipeline.
///
/// Each stage consumes the nodes produced by the stage before it. Evaluation
/// lives in [`crate::evaluator`].
#[derive(Debug, Clone)]
pub enum NodeIterator {
    /// Yields one fixed node and ignores its upstream; roots seeded groups
    Node(NodeId),

    /// Passes the upstream through; roots unseeded and nested groups
    LeftParent,

    /// `*` all children of every upstream node
    Children,

    /// `.` the parent of every upstream node
    Parent,

    /// `..` the root of the first upstream node
    Root,

    /// `**` every upstream node followed by its descendants
    Flatten,

    /// `#` the node an upstream node's value points to
    Reference,

    /// `<` previous node in document order
    ShiftLeft,

    /// `>` next node in document order
    ShiftRight,

    /// `-n` / `+n` sibling `n` steps away
    Sibling(isize),

    /// `n` child at index `n`
    Numbered(usize),

    /// Nodes whose name equals the text
    Named(String),

    /// `..name` nearest ancestor with that name
    NamedAncestor(String),

    /// `"/re/flags"` nodes whose name matches
    NamedRegex(RegexIterator),

    /// `=value` nodes whose value equals, `=:type:value` for typed values
    Valued(Value),

    /// `"=/re/flags"` nodes whose value text matches
    ValuedRegex(RegexIterator),

    /// `%n` every `n`-th upstream node, starting with the first
    Modulo(usize),

    /// `[start,end]` upstream positions in `start..end`
    Range { start: usize, end: Option<usize> },

    /// `( ... )` nested group fed by this pipeline
    Group(Box<IteratorGroup>),
}

/// Compiled regex plus the `d` (distinct) flag.
///
/// Recognized flags:
///
/// ```text
/// i   case insensitive
/// m   multi line
/// s   dot matches new line
/// w   ignore pattern whitespace
/// d   distinct, only the first node per matched text
/// c   accepted, no effect
/// e   accepted, no effect
/// r   accepted, no effect
/// ```
#[derive(Debug, Clone)]
pub struct RegexIterator {
    pub regex: Regex,
    pub distinct: bool,
}

impl RegexIterator {
    /// Parses `/pattern/flags`.
    pub fn parse(token: &str) -> Result<Self, ErrorKind> {
        let unterminated = || ErrorKind::UnterminatedRegex(token.to_string());

        let body = token.strip_prefix('/').ok_or_else(unterminated)?;
        let end = body.rfind('/').ok_or_else(unterminated)?;
        let pattern = &body[..end];

        let mut builder = RegexBuilder::new(pattern);
        let mut distinct = false;
        for flag in body[end + 1..].chars() {
            match flag {
                'i' => {
                    builder.case_insensitive(true);
                }
                'm' => {
                    builder.multi_line(true);
                }
                's' => {
                    builder.dot_matches_new_line(true);
                }
                'w' => {
                    builder.ignore_whitespace(true);
                }
                'd' => distinct = true,
                'c' | 'e' | 'r' => {}
                other => return Err(ErrorKind::UnknownRegexOption(other)),
            }
        }

        let regex = builder
            .build()
            .map_err(|e| ErrorKind::InvalidRegex(e.to_string()))?;
        Ok(RegexIterator { regex, distinct })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}
