use std::cell::OnceCell;

use crate::{
    ast::{Logical, LogicalKind, NodeIterator},
    tree::NodeId,
};

/// An ordered list of logicals sharing one root.
///
/// The root is either [`NodeIterator::Node`] (a seeded top-level group) or
/// [`NodeIterator::LeftParent`] (unseeded, or nested inside another group).
/// Every logical's pipeline starts from the root.
///
/// The first evaluation result is cached for the lifetime of the group and
/// never invalidated, even if the tree changes afterwards. Evaluate again
/// through a fresh group, see [`crate::Expression::group`].
#[derive(Debug, Clone)]
pub struct IteratorGroup {
    pub root: NodeIterator,
    pub logicals: Vec<Logical>,
    pub(crate) cache: OnceCell<Vec<NodeId>>,
}

impl IteratorGroup {
    /// Group with an implicit OR logical, passing its upstream to the
    /// pipelines.
    pub fn new() -> Self {
        IteratorGroup {
            root: NodeIterator::LeftParent,
            logicals: vec![Logical::new(LogicalKind::Or)],
            cache: OnceCell::new(),
        }
    }

    /// The same group, rooted at `seed` and with an empty cache.
    pub fn seeded(mut self, seed: NodeId) -> Self {
        self.root = NodeIterator::Node(seed);
        self.clear_cache();
        self
    }

    /// Drops the cached result of this group and of every nested group.
    pub fn clear_cache(&mut self) {
        self.cache = OnceCell::new();
        for logical in &mut self.logicals {
            for iterator in &mut logical.iterators {
                if let NodeIterator::Group(nested) = iterator {
                    nested.clear_cache();
                }
            }
        }
    }

    pub fn add_logical(&mut self, logical: Logical) {
        self.logicals.push(logical);
    }

    /// Appends `iterator` to the pipeline of the last logical.
    pub fn add_iterator(&mut self, iterator: NodeIterator) {
        match self.logicals.last_mut() {
            Some(logical) => logical.add_iterator(iterator),
            None => {
                let mut logical = Logical::new(LogicalKind::Or);
                logical.add_iterator(iterator);
                self.logicals.push(logical);
            }
        }
    }

    /// True once the group has been evaluated.
    pub fn is_evaluated(&self) -> bool {
        self.cache.get().is_some()
    }
}

impl Default for IteratorGroup {
    fn default() -> Self {
        Self::new()
    }
}
