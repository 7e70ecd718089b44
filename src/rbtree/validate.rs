//! Full structural check of the red-black invariants.

use thiserror::Error;

use super::{Color, NodeId, RBTree};
use crate::record::RecordId;


#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("id {id} is out of order")]
    OutOfOrder { id: RecordId },

    #[error("the sentinel is not BLACK")]
    RedSentinel,

    #[error("RED node {parent} has RED child {child}")]
    RedRed { parent: RecordId, child: RecordId },

    #[error("black height differs below {id}: {left} on the left, {right} on the right")]
    BlackHeight { id: RecordId, left: usize, right: usize },

    #[error("the root is not BLACK")]
    RedRoot,

    #[error("parent link of {id} is wrong")]
    ParentLink { id: RecordId },

    #[error("{reachable} nodes reachable from the root, but {stored} stored")]
    Unreachable { reachable: usize, stored: usize },
}

impl RBTree {
    /// Walks the whole tree and checks that
    ///  1. keys are in binary-search order,
    ///  2. the sentinel is BLACK,
    ///  3. no RED node has a RED child,
    ///  4. every path to the sentinel has the same number of BLACK nodes,
    ///  5. the root is BLACK,
    ///
    /// and also that every parent link matches its child link and every
    /// stored node is reachable. Returns the black height of the root.
    ///
    /// Complexity: O(n)
    pub fn check_invariants(&self) -> Result<usize, InvariantViolation> {
        if self.color(NodeId::NIL) != Color::Black {
            return Err(InvariantViolation::RedSentinel)
        }
        if self.color(self.root) != Color::Black {
            return Err(InvariantViolation::RedRoot)
        }
        if !self.parent(self.root).is_nil() {
            return Err(InvariantViolation::ParentLink { id: self.key(self.root) })
        }

        let mut reachable = 0;
        let black_height = self.check_subtree(self.root, None, None, &mut reachable)?;
        if reachable != self.len() {
            return Err(InvariantViolation::Unreachable { reachable, stored: self.len() })
        }
        Ok(black_height)
    }

    /// Returns the black height of `node`, counting `node` itself but not the sentinel.
    fn check_subtree(
        &self,
        node: NodeId,
        lower: Option<RecordId>,
        upper: Option<RecordId>,
        reachable: &mut usize,
    ) -> Result<usize, InvariantViolation> {
        if node.is_nil() {
            return Ok(0)
        }
        *reachable += 1;

        let id = self.key(node);
        if lower.is_some_and(|lo| id <= lo) || upper.is_some_and(|hi| id >= hi) {
            return Err(InvariantViolation::OutOfOrder { id })
        }

        let (left, right) = (self.left(node), self.right(node));
        for child in [left, right] {
            if child.is_nil() { continue }
            if self.parent(child) != node {
                return Err(InvariantViolation::ParentLink { id: self.key(child) })
            }
            if self.color(node) == Color::Red && self.color(child) == Color::Red {
                return Err(InvariantViolation::RedRed { parent: id, child: self.key(child) })
            }
        }

        let left_height = self.check_subtree(left, lower, Some(id), reachable)?;
        let right_height = self.check_subtree(right, Some(id), upper, reachable)?;
        if left_height != right_height {
            return Err(InvariantViolation::BlackHeight { id, left: left_height, right: right_height })
        }

        Ok(left_height + usize::from(self.color(node) == Color::Black))
    }
}
