//! Text renderings for diagnostics.
//!
//! - **Outlines** via [`outline()`] - a sub-tree as indented `name:value` lines
//! - **Pipelines** via [`describe()`] - the structure of a parsed group
//!
//! # Examples
//!
//! ```
//! use p5x::{Tree, Value};
//! use p5x::output::outline;
//!
//! let mut tree = Tree::new();
//! let root = tree.add_root("_data", None);
//! tree.add_child(root, "x", Some(Value::Integer(5)));
//!
//! assert_eq!(outline(&tree, root), "_data\n  x:5");
//! ```

use crate::{
    ast::{IteratorGroup, NodeIterator},
    tree::{NodeId, Tree},
};

pub struct OutlinePrinter {
    indent_width: usize,
}

impl OutlinePrinter {
    pub fn new(indent_width: usize) -> Self {
        OutlinePrinter { indent_width }
    }

    /// Renders `node` and its descendants, one line per node.
    pub fn print(&self, tree: &Tree, node: NodeId) -> String {
        let mut lines = Vec::new();
        let mut stack = vec![(node, 0usize)];

        while let Some((current, depth)) = stack.pop() {
            lines.push(format!("{}{}", self.indent(depth), self.line(tree, current)));
            for child in tree.children(current).iter().rev() {
                stack.push((*child, depth + 1));
            }
        }
        lines.join("\n")
    }

    fn line(&self, tree: &Tree, node: NodeId) -> String {
        let name = tree.name(node);
        match tree.value(node) {
            Some(value) => format!("{}:{}", name, escape(&value.as_string())),
            None => name.to_string(),
        }
    }

    fn indent(&self, depth: usize) -> String {
        " ".repeat(depth * self.indent_width)
    }
}

/// Keeps one node per line.
fn escape(text: &str) -> String {
    text.replace('\r', "\\r").replace('\n', "\\n")
}

/// Outline with two-space indentation.
pub fn outline(tree: &Tree, node: NodeId) -> String {
    OutlinePrinter::new(2).print(tree, node)
}

/// Lists the groups, logicals and iterators of a parsed expression.
///
/// ```text
/// group
///   | children
///   | named "_data"
///   & valued "foo"
/// ```
pub fn describe(group: &IteratorGroup) -> String {
    let mut lines = Vec::new();
    describe_group(group, 0, &mut lines);
    lines.join("\n")
}

fn describe_group(group: &IteratorGroup, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    lines.push(format!("{}group", indent));
    for logical in &group.logicals {
        if logical.iterators.is_empty() {
            lines.push(format!("{}  {} (group root)", indent, logical.kind));
        }
        for iterator in &logical.iterators {
            match iterator {
                NodeIterator::Group(nested) => {
                    lines.push(format!("{}  {}", indent, logical.kind));
                    describe_group(nested, depth + 2, lines);
                }
                other => lines.push(format!("{}  {} {}", indent, logical.kind, label(other))),
            }
        }
    }
}

fn label(iterator: &NodeIterator) -> String {
    match iterator {
        NodeIterator::Node(node) => format!("node {}", node),
        NodeIterator::LeftParent => "left parent".to_string(),
        NodeIterator::Children => "children".to_string(),
        NodeIterator::Parent => "parent".to_string(),
        NodeIterator::Root => "root".to_string(),
        NodeIterator::Flatten => "flatten".to_string(),
        NodeIterator::Reference => "reference".to_string(),
        NodeIterator::ShiftLeft => "shift left".to_string(),
        NodeIterator::ShiftRight => "shift right".to_string(),
        NodeIterator::Sibling(offset) => format!("sibling {:+}", offset),
        NodeIterator::Numbered(index) => format!("numbered {}", index),
        NodeIterator::Named(name) => format!("named {:?}", name),
        NodeIterator::NamedAncestor(name) => format!("named ancestor {:?}", name),
        NodeIterator::NamedRegex(regex) => format!("named regex /{}/", regex.regex.as_str()),
        NodeIterator::Valued(value) => {
            format!("valued {}:{:?}", value.type_name(), value.as_string())
        }
        NodeIterator::ValuedRegex(regex) => format!("valued regex /{}/", regex.regex.as_str()),
        NodeIterator::Modulo(modulo) => format!("modulo {}", modulo),
        NodeIterator::Range { start, end } => match end {
            Some(end) => format!("range [{},{}]", start, end),
            None => format!("range [{},]", start),
        },
        NodeIterator::Group(_) => "group".to_string(),
    }
}
