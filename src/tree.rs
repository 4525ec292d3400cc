//! Arena-backed node tree.
//!
//! Every node lives in a single [`Tree`] and is addressed through a copyable
//! [`NodeId`] handle. Parents own their children through ordered child lists;
//! the child-to-parent link is a plain handle, so there are no reference
//! cycles to manage.
//!
//! # Examples
//!
//! ```
//! use p5x::tree::Tree;
//! use p5x::Value;
//!
//! let mut tree = Tree::new();
//! let root = tree.add_root("", None);
//! let a = tree.add_child(root, "a", None);
//! let x = tree.add_child(a, "x", Some(Value::Integer(1)));
//!
//! assert_eq!(tree.parent(x), Some(a));
//! assert_eq!(tree.root(x), root);
//! assert_eq!(tree.path(x).to_string(), "0-0");
//! ```

use std::{fmt, str::FromStr};

use crate::value::Value;

/// Handle to a node stored in a [`Tree`].
///
/// Handles are only meaningful for the tree that created them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node inside its arena
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct Slot {
    name: String,
    value: Option<Value>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

/// Errors raised by structural tree mutations.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeError {
    /// The operation would make a node its own ancestor
    Cycle { node: NodeId, parent: NodeId },

    /// The operation needs a parent, but the node is a root
    Detached(NodeId),

    /// Child index outside of `0..=len`
    IndexOutOfRange { index: usize, len: usize },
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::Cycle { node, parent } => {
                write!(f, "Cannot move node {} below its own descendant {}", node, parent)
            }
            TreeError::Detached(node) => write!(f, "Node {} has no parent", node),
            TreeError::IndexOutOfRange { index, len } => {
                write!(f, "Child index {} is out of range for {} children", index, len)
            }
        }
    }
}

impl std::error::Error for TreeError {}

/// Mutable hierarchy of name/value nodes.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    slots: Vec<Slot>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes ever allocated in this arena, attached or not.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn slot(&self, node: NodeId) -> &Slot {
        &self.slots[node.0]
    }

    fn slot_mut(&mut self, node: NodeId) -> &mut Slot {
        &mut self.slots[node.0]
    }

    fn allocate(&mut self, name: String, value: Option<Value>, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.slots.len());
        self.slots.push(Slot {
            name,
            value,
            children: Vec::new(),
            parent,
        });
        id
    }

    /// Creates a detached node with no parent.
    pub fn add_root(&mut self, name: impl Into<String>, value: Option<Value>) -> NodeId {
        self.allocate(name.into(), value, None)
    }

    /// Creates a node and appends it as the last child of `parent`.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        value: Option<Value>,
    ) -> NodeId {
        let child = self.allocate(name.into(), value, Some(parent));
        self.slot_mut(parent).children.push(child);
        child
    }

    /// Moves `node` (and its subtree) to the end of `parent`'s children.
    pub fn append(&mut self, parent: NodeId, node: NodeId) -> Result<(), TreeError> {
        let len = self.children(parent).len() - usize::from(self.parent(node) == Some(parent));
        self.insert(parent, len, node)
    }

    /// Moves `node` (and its subtree) into `parent`'s children at `index`.
    pub fn insert(&mut self, parent: NodeId, index: usize, node: NodeId) -> Result<(), TreeError> {
        if self.is_ancestor_or_self(node, parent) {
            return Err(TreeError::Cycle { node, parent });
        }
        let moving_within = self.parent(node) == Some(parent);
        let len = self.children(parent).len() - usize::from(moving_within);
        if index > len {
            return Err(TreeError::IndexOutOfRange { index, len });
        }
        self.untie(node);
        self.slot_mut(parent).children.insert(index, node);
        self.slot_mut(node).parent = Some(parent);
        Ok(())
    }

    /// Detaches `node` from its parent. The node stays in the arena as a root.
    pub fn untie(&mut self, node: NodeId) -> NodeId {
        if let Some(parent) = self.slot(node).parent {
            self.slot_mut(parent).children.retain(|child| *child != node);
            self.slot_mut(node).parent = None;
        }
        node
    }

    /// Puts `with` at the position of `node`, leaving `node` detached.
    pub fn replace(&mut self, node: NodeId, with: NodeId) -> Result<NodeId, TreeError> {
        let parent = self.parent(node).ok_or(TreeError::Detached(node))?;
        if node == with {
            return Ok(with);
        }
        if self.is_ancestor_or_self(with, parent) {
            return Err(TreeError::Cycle { node: with, parent });
        }
        self.untie(with);
        let index = self.index_of(node).ok_or(TreeError::Detached(node))?;
        self.slot_mut(parent).children[index] = with;
        self.slot_mut(with).parent = Some(parent);
        self.slot_mut(node).parent = None;
        Ok(with)
    }

    /// Copies the subtree under `node` into new, detached nodes.
    pub fn deep_clone(&mut self, node: NodeId) -> NodeId {
        let (name, value) = self.entry(node);
        let copy = self.allocate(name, value, None);

        let mut pending = vec![(node, copy)];
        while let Some((from, to)) = pending.pop() {
            let children = self.slot(from).children.clone();
            for child in children {
                let (name, value) = self.entry(child);
                let cloned = self.allocate(name, value, Some(to));
                self.slot_mut(to).children.push(cloned);
                pending.push((child, cloned));
            }
        }
        copy
    }

    fn entry(&self, node: NodeId) -> (String, Option<Value>) {
        let slot = self.slot(node);
        (slot.name.clone(), slot.value.clone())
    }

    pub fn name(&self, node: NodeId) -> &str {
        &self.slot(node).name
    }

    pub fn set_name(&mut self, node: NodeId, name: impl Into<String>) {
        self.slot_mut(node).name = name.into();
    }

    pub fn value(&self, node: NodeId) -> Option<&Value> {
        self.slot(node).value.as_ref()
    }

    /// Replaces the value of `node`, returning the previous one.
    pub fn set_value(&mut self, node: NodeId, value: Option<Value>) -> Option<Value> {
        std::mem::replace(&mut self.slot_mut(node).value, value)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.slot(node).children
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.slot(node).parent
    }

    /// Walks parents until reaching a node without one.
    pub fn root(&self, node: NodeId) -> NodeId {
        let mut current = node;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// Ancestors of `node`, nearest first. The node itself is not included.
    pub fn ancestors(&self, node: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(node),
        }
    }

    /// `node` followed by all of its descendants, in pre-order.
    pub fn descendants(&self, node: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            first: Some(node),
            stack: Vec::new(),
        }
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, node: NodeId) -> bool {
        candidate == node || self.ancestors(node).any(|ancestor| ancestor == candidate)
    }

    /// Position of `node` among its parent's children.
    pub fn index_of(&self, node: NodeId) -> Option<usize> {
        let parent = self.parent(node)?;
        self.children(parent).iter().position(|child| *child == node)
    }

    /// Sibling `offset` steps away; negative walks backwards.
    ///
    /// Running off either end yields `None`, there is no wraparound.
    pub fn sibling(&self, node: NodeId, offset: isize) -> Option<NodeId> {
        if offset == 0 {
            return Some(node);
        }
        let parent = self.parent(node)?;
        let index = isize::try_from(self.index_of(node)?)
            .ok()?
            .checked_add(offset)?;
        let index = usize::try_from(index).ok()?;
        self.children(parent).get(index).copied()
    }

    pub fn previous_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.sibling(node, -1)
    }

    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.sibling(node, 1)
    }

    /// Previous node in flattened document order.
    pub fn previous_node(&self, node: NodeId) -> Option<NodeId> {
        match self.previous_sibling(node) {
            Some(mut current) => {
                while let Some(last) = self.children(current).last() {
                    current = *last;
                }
                Some(current)
            }
            None => self.parent(node),
        }
    }

    /// Next node in flattened document order.
    pub fn next_node(&self, node: NodeId) -> Option<NodeId> {
        if let Some(first) = self.children(node).first() {
            return Some(*first);
        }
        if let Some(next) = self.next_sibling(node) {
            return Some(next);
        }
        self.ancestors(node)
            .find_map(|ancestor| self.next_sibling(ancestor))
    }

    /// First child of `parent` named `name`.
    pub fn find_named(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|child| self.name(*child) == name)
    }

    /// Position of `node` relative to its root.
    pub fn path(&self, node: NodeId) -> Dna {
        let mut indices = Vec::new();
        let mut current = node;
        while let Some(parent) = self.parent(current) {
            if let Some(index) = self.index_of(current) {
                indices.push(index);
            }
            current = parent;
        }
        indices.reverse();
        Dna(indices)
    }

    /// Resolves `dna` starting at the root of the tree `node` belongs to.
    pub fn find(&self, node: NodeId, dna: &Dna) -> Option<NodeId> {
        let mut current = self.root(node);
        for index in &dna.0 {
            current = *self.children(current).get(*index)?;
        }
        Some(current)
    }
}

/// Iterator over the ancestors of a node, see [`Tree::ancestors`].
pub struct Ancestors<'t> {
    tree: &'t Tree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

/// Pre-order walk over a subtree, see [`Tree::descendants`].
///
/// Uses an explicit stack, so deep trees do not grow the call stack.
pub struct Descendants<'t> {
    tree: &'t Tree,
    first: Option<NodeId>,
    stack: Vec<(&'t [NodeId], usize)>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if let Some(first) = self.first.take() {
            let children = self.tree.children(first);
            if !children.is_empty() {
                self.stack.push((children, 0));
            }
            return Some(first);
        }

        while let Some((slice, index)) = self.stack.last_mut() {
            if *index >= slice.len() {
                self.stack.pop();
                continue;
            }

            let node = slice[*index];
            *index += 1;

            // children are visited before the next sibling
            let children = self.tree.children(node);
            if !children.is_empty() {
                self.stack.push((children, 0));
            }
            return Some(node);
        }
        None
    }
}

/// Positional coordinate of a node: child indices walked from the root.
///
/// The text form joins the indices with `-`, e.g. `0-2-1`. The root itself is
/// the empty path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Dna(Vec<usize>);

impl Dna {
    pub fn new(indices: Vec<usize>) -> Self {
        Dna(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if `text` only contains digits and `-` separators.
    pub fn is_path(text: &str) -> bool {
        text.chars().all(|c| c.is_ascii_digit() || c == '-')
    }
}

impl fmt::Display for Dna {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|index| index.to_string()).collect();
        write!(f, "{}", parts.join("-"))
    }
}

/// Text that is not a valid [`Dna`] path.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseDnaError(pub String);

impl fmt::Display for ParseDnaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a valid node path", self.0)
    }
}

impl std::error::Error for ParseDnaError {}

impl FromStr for Dna {
    type Err = ParseDnaError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if !Dna::is_path(text) {
            return Err(ParseDnaError(text.to_string()));
        }
        text.split('-')
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<usize>().map_err(|_| ParseDnaError(text.to_string())))
            .collect::<Result<Vec<_>, _>>()
            .map(Dna)
    }
}
