use std::iter::FusedIterator;

use crate::{Node, NodeId, Tree};

/// Lazy pre-order traversal: parents before children, children in insertion order.
///
/// A clone continues from the same position; call [`Tree::walk`] again to restart.
/// Walking from a handle of another tree yields nothing.
#[derive(Clone, Debug)]
pub struct Walk<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
}

impl<'a> Walk<'a> {
    pub(crate) fn new(tree: &'a Tree, from: NodeId) -> Self {
        Self {
            tree,
            stack: vec![from],
        }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.tree.get(self.stack.pop()?)?;
        self.stack.extend(node.children().iter().rev().copied());
        Some(node)
    }
}

impl FusedIterator for Walk<'_> {}
