//! Lazy evaluation of iterator pipelines.
//!
//! Every [`NodeIterator`] turns an upstream sequence of nodes into a new
//! boxed iterator; a [`Logical`] chains its iterators starting at the group
//! root and collects the result; an [`IteratorGroup`] folds its logicals into
//! one list and caches it.
//!
//! Evaluating an already-parsed pipeline cannot fail. Nodes that lack what an
//! iterator asks for (a parent, a sibling, a value) are skipped.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::{
    ast::{IteratorGroup, Logical, NodeIterator},
    tree::{Dna, NodeId, Tree},
    value::Value,
};

/// A lazily evaluated sequence of nodes.
pub type Nodes<'a> = Box<dyn Iterator<Item = NodeId> + 'a>;

impl NodeIterator {
    /// Applies this stage to `upstream`.
    pub fn evaluate<'a>(&'a self, tree: &'a Tree, upstream: Nodes<'a>) -> Nodes<'a> {
        match self {
            NodeIterator::Node(seed) => Box::new(std::iter::once(*seed)),
            NodeIterator::LeftParent => upstream,
            NodeIterator::Children => {
                Box::new(upstream.flat_map(move |node| tree.children(node).iter().copied()))
            }
            NodeIterator::Parent => Box::new(upstream.filter_map(move |node| tree.parent(node))),
            NodeIterator::Root => Box::new(upstream.take(1).map(move |node| tree.root(node))),
            NodeIterator::Flatten => Box::new(upstream.flat_map(move |node| tree.descendants(node))),
            NodeIterator::Reference => {
                Box::new(upstream.filter_map(move |node| dereference(tree, node)))
            }
            NodeIterator::ShiftLeft => {
                Box::new(upstream.filter_map(move |node| tree.previous_node(node)))
            }
            NodeIterator::ShiftRight => {
                Box::new(upstream.filter_map(move |node| tree.next_node(node)))
            }
            NodeIterator::Sibling(offset) => {
                let offset = *offset;
                Box::new(upstream.filter_map(move |node| tree.sibling(node, offset)))
            }
            NodeIterator::Numbered(index) => {
                let index = *index;
                Box::new(upstream.filter_map(move |node| tree.children(node).get(index).copied()))
            }
            NodeIterator::Named(name) => {
                Box::new(upstream.filter(move |node| tree.name(*node) == name.as_str()))
            }
            NodeIterator::NamedAncestor(name) => Box::new(upstream.filter_map(move |node| {
                tree.ancestors(node)
                    .find(|ancestor| tree.name(*ancestor) == name.as_str())
            })),
            NodeIterator::NamedRegex(regex) => {
                let mut seen = HashSet::new();
                Box::new(upstream.filter(move |node| {
                    let name = tree.name(*node);
                    regex.is_match(name) && (!regex.distinct || seen.insert(name.to_string()))
                }))
            }
            NodeIterator::Valued(value) => {
                Box::new(upstream.filter(move |node| tree.value(*node) == Some(value)))
            }
            NodeIterator::ValuedRegex(regex) => {
                let mut seen = HashSet::new();
                Box::new(upstream.filter(move |node| match tree.value(*node) {
                    Some(value) => {
                        let text = value.as_string();
                        regex.is_match(&text) && (!regex.distinct || seen.insert(text))
                    }
                    None => false,
                }))
            }
            NodeIterator::Modulo(modulo) => {
                let modulo = *modulo;
                Box::new(
                    upstream
                        .enumerate()
                        .filter(move |(position, _)| position.checked_rem(modulo) == Some(0))
                        .map(|(_, node)| node),
                )
            }
            NodeIterator::Range { start, end } => {
                let nodes = upstream.skip(*start);
                match end {
                    Some(end) => Box::new(nodes.take(end.saturating_sub(*start))),
                    None => Box::new(nodes),
                }
            }
            NodeIterator::Group(group) => {
                // every logical of the nested group starts from the same nodes
                let upstream: Vec<NodeId> = upstream.collect();
                Box::new(group.evaluate_from(tree, &upstream).iter().copied())
            }
        }
    }
}

/// Node that `node`'s value points to, if any.
fn dereference(tree: &Tree, node: NodeId) -> Option<NodeId> {
    match tree.value(node)? {
        Value::Node(target) => (target.index() < tree.len()).then_some(*target),
        Value::Path(dna) => tree.find(node, dna),
        Value::String(text) if !text.is_empty() && Dna::is_path(text) => {
            let dna = text.parse::<Dna>().ok()?;
            tree.find(node, &dna)
        }
        _ => None,
    }
}

impl Logical {
    /// Runs this logical's pipeline from `root` and merges the result into
    /// `accumulated`.
    pub fn evaluate_nodes(
        &self,
        tree: &Tree,
        root: &NodeIterator,
        upstream: &[NodeId],
        accumulated: Vec<NodeId>,
    ) -> Vec<NodeId> {
        let mut nodes = root.evaluate(tree, Box::new(upstream.iter().copied()));
        for iterator in &self.iterators {
            nodes = iterator.evaluate(tree, nodes);
        }
        let rhs: Vec<NodeId> = nodes.collect();

        trace!(
            logical = %self.kind,
            iterators = self.iterators.len(),
            matched = rhs.len(),
            "Evaluated logical"
        );
        self.kind.combine(accumulated, rhs)
    }
}

impl IteratorGroup {
    /// Evaluates a top-level group. The result is cached on first call.
    pub fn evaluate(&self, tree: &Tree) -> &[NodeId] {
        self.evaluate_from(tree, &[])
    }

    /// Evaluates the group with `upstream` feeding its root.
    ///
    /// Only the first call computes anything; later calls return the cached
    /// list regardless of `upstream` or changes to `tree`.
    pub fn evaluate_from(&self, tree: &Tree, upstream: &[NodeId]) -> &[NodeId] {
        self.cache.get_or_init(|| {
            let nodes = self
                .logicals
                .iter()
                .fold(Vec::new(), |accumulated, logical| {
                    logical.evaluate_nodes(tree, &self.root, upstream, accumulated)
                });
            debug!(
                logicals = self.logicals.len(),
                upstream = upstream.len(),
                matched = nodes.len(),
                "Evaluated iterator group"
            );
            nodes
        })
    }
}
