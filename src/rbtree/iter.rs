use std::iter::FusedIterator;

use super::{NodeId, RBTree};
use crate::record::Record;


/// In-order iterator over an [`RBTree`], created by [`RBTree::iter`].
///
/// Keeps an explicit stack of the left spine still to visit, so memory use
/// is bounded by the tree height and no recursion is involved.
pub struct Iter<'a> {
    tree: &'a RBTree,
    stack: Vec<NodeId>,
    remaining: usize,
}

impl<'a> Iter<'a> {
    pub(super) fn new(tree: &'a RBTree) -> Self {
        let mut iter = Self {
            tree,
            stack: Vec::new(),
            remaining: tree.len(),
        };
        iter.push_left_spine(tree.root);
        iter
    }

    fn push_left_spine(&mut self, mut node: NodeId) {
        while !node.is_nil() {
            self.stack.push(node);
            node = self.tree.left(node);
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Record;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        let node = self.stack.pop()?;
        self.push_left_spine(tree.right(node));
        self.remaining -= 1;
        Some(&tree.node(node).record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a RBTree {
    type Item = &'a Record;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
