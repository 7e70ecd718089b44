//! Rotations and the recoloring walks that restore the red-black invariants.
//!
//! After the initial attach (insert) or splice (delete), these are the only
//! places that restructure the tree, and they only do it through
//! [`RBTree::rotate_left`] and [`RBTree::rotate_right`].

use super::{Color, NodeId, RBTree};


impl RBTree {
    /// Rotates `x` down to the left, lifting its right child `y` into its place.
    ///
    /// ```text
    ///     x              y
    ///    / \            / \
    ///   a   y    =>    x   c
    ///      / \        / \
    ///     b   c      a   b
    /// ```
    pub(super) fn rotate_left(&mut self, x: NodeId) {
        let y = self.right(x);
        debug_assert!(!y.is_nil(), "rotate_left needs a right child");
        trace!("rotate_left at id {}", self.key(x));

        let b = self.left(y);
        self.set_right(x, b);
        self.set_parent(b, x);

        let parent = self.parent(x);
        self.set_parent(y, parent);
        // updates `self.root` if `x` was the root
        self.replace_child(parent, x, y);

        self.set_left(y, x);
        self.set_parent(x, y);
    }

    /// Mirror image of [`rotate_left`](Self::rotate_left).
    pub(super) fn rotate_right(&mut self, y: NodeId) {
        let x = self.left(y);
        debug_assert!(!x.is_nil(), "rotate_right needs a left child");
        trace!("rotate_right at id {}", self.key(y));

        let b = self.right(x);
        self.set_left(y, b);
        self.set_parent(b, y);

        let parent = self.parent(y);
        self.set_parent(x, parent);
        self.replace_child(parent, y, x);

        self.set_right(x, y);
        self.set_parent(y, x);
    }

    /// Restores the invariants after `node` was attached as a RED leaf.
    pub(super) fn insert_fixup(&mut self, mut node: NodeId) {
        // the root's parent is the sentinel, which is BLACK, so this also stops at the root
        while self.color(self.parent(node)) == Color::Red {
            let parent = self.parent(node);
            // a RED parent is never the root, so the grandparent is a real node
            let grandparent = self.parent(parent);

            if parent == self.left(grandparent) {
                let uncle = self.right(grandparent);
                if self.color(uncle) == Color::Red {
                    trace!("insert_fixup: red uncle, recoloring at id {}", self.key(grandparent));
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    node = grandparent;
                } else {
                    if node == self.right(parent) {
                        // zig-zag: straighten it out first
                        node = parent;
                        self.rotate_left(node);
                    }
                    let parent = self.parent(node);
                    let grandparent = self.parent(parent);
                    self.set_color(parent, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    self.rotate_right(grandparent);
                }
            } else {
                let uncle = self.left(grandparent);
                if self.color(uncle) == Color::Red {
                    trace!("insert_fixup: red uncle, recoloring at id {}", self.key(grandparent));
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    node = grandparent;
                } else {
                    if node == self.left(parent) {
                        node = parent;
                        self.rotate_right(node);
                    }
                    let parent = self.parent(node);
                    let grandparent = self.parent(parent);
                    self.set_color(parent, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    self.rotate_left(grandparent);
                }
            }
        }
        self.set_color(self.root, Color::Black);
    }

    /// Restores the invariants after a BLACK node was spliced out.
    ///
    /// `node` is whatever took its place (possibly the sentinel) and `parent`
    /// is the spliced node's old parent. The parent is passed in separately
    /// because the sentinel has no parent link of its own.
    pub(super) fn delete_fixup(&mut self, mut node: NodeId, mut parent: NodeId) {
        while node != self.root && self.color(node) == Color::Black {
            if node == self.left(parent) {
                let mut sibling = self.right(parent);
                if self.color(sibling) == Color::Red {
                    trace!("delete_fixup: red sibling at id {}", self.key(sibling));
                    self.set_color(sibling, Color::Black);
                    self.set_color(parent, Color::Red);
                    self.rotate_left(parent);
                    sibling = self.right(parent);
                }

                if self.color(self.left(sibling)) == Color::Black && self.color(self.right(sibling)) == Color::Black {
                    self.set_color(sibling, Color::Red);
                    node = parent;
                    parent = self.parent(node);
                } else {
                    if self.color(self.right(sibling)) == Color::Black {
                        // near child RED, far child BLACK: turn it into the far-RED case
                        self.set_color(self.left(sibling), Color::Black);
                        self.set_color(sibling, Color::Red);
                        self.rotate_right(sibling);
                        sibling = self.right(parent);
                    }
                    trace!("delete_fixup: far red nephew under id {}", self.key(sibling));
                    self.set_color(sibling, self.color(parent));
                    self.set_color(parent, Color::Black);
                    self.set_color(self.right(sibling), Color::Black);
                    self.rotate_left(parent);
                    node = self.root;
                    parent = NodeId::NIL;
                }
            } else {
                let mut sibling = self.left(parent);
                if self.color(sibling) == Color::Red {
                    trace!("delete_fixup: red sibling at id {}", self.key(sibling));
                    self.set_color(sibling, Color::Black);
                    self.set_color(parent, Color::Red);
                    self.rotate_right(parent);
                    sibling = self.left(parent);
                }

                if self.color(self.right(sibling)) == Color::Black && self.color(self.left(sibling)) == Color::Black {
                    self.set_color(sibling, Color::Red);
                    node = parent;
                    parent = self.parent(node);
                } else {
                    if self.color(self.left(sibling)) == Color::Black {
                        self.set_color(self.right(sibling), Color::Black);
                        self.set_color(sibling, Color::Red);
                        self.rotate_left(sibling);
                        sibling = self.left(parent);
                    }
                    trace!("delete_fixup: far red nephew under id {}", self.key(sibling));
                    self.set_color(sibling, self.color(parent));
                    self.set_color(parent, Color::Black);
                    self.set_color(self.left(sibling), Color::Black);
                    self.rotate_right(parent);
                    node = self.root;
                    parent = NodeId::NIL;
                }
            }
        }
        self.set_color(node, Color::Black);
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    fn tree_of(ids: &[u32]) -> RBTree {
        let mut tree = RBTree::new();
        for &id in ids {
            tree.insert(Record::new(id, "", 0.0)).unwrap();
        }
        tree
    }

    fn shape(tree: &RBTree, node: NodeId) -> String {
        if node.is_nil() { return ".".into() }
        format!("({} {} {})", shape(tree, tree.left(node)), tree.key(node), shape(tree, tree.right(node)))
    }

    #[test]
    fn rotate_left_at_root() {
        let mut tree = tree_of(&[2, 1, 4, 3, 5]);
        assert_eq!(shape(&tree, tree.root), "((. 1 .) 2 ((. 3 .) 4 (. 5 .)))");

        tree.rotate_left(tree.root);
        assert_eq!(tree.key(tree.root), 4);
        assert!(tree.parent(tree.root).is_nil());
        assert_eq!(shape(&tree, tree.root), "(((. 1 .) 2 (. 3 .)) 4 (. 5 .))");

        let three = tree.find(3);
        assert_eq!(tree.key(tree.parent(three)), 2);
    }

    #[test]
    fn rotate_right_undoes_rotate_left() {
        let mut tree = tree_of(&[2, 1, 4, 3, 5]);
        let before = shape(&tree, tree.root);
        let root = tree.root;
        tree.rotate_left(root);
        tree.rotate_right(tree.root);
        assert_eq!(shape(&tree, tree.root), before);
        assert_eq!(tree.root, root);
    }

    #[test]
    fn rotate_below_root_repoints_parent() {
        let mut tree = tree_of(&[2, 1, 4, 3, 5]);
        let four = tree.find(4);
        tree.rotate_right(four);
        assert_eq!(shape(&tree, tree.root), "((. 1 .) 2 (. 3 (. 4 (. 5 .))))");
        let three = tree.find(3);
        assert_eq!(tree.right(tree.root), three);
        assert_eq!(tree.parent(three), tree.root);
        assert_eq!(tree.parent(four), three);
    }

    #[test]
    fn sentinel_stays_black_and_linkless() {
        let mut tree = tree_of(&[10, 5, 15, 1, 7]);
        for id in [5, 10, 1, 15, 7] {
            tree.delete(id).unwrap();
            assert_eq!(tree.color(NodeId::NIL), Color::Black);
            assert!(tree.left(NodeId::NIL).is_nil());
            assert!(tree.parent(NodeId::NIL).is_nil());
        }
    }

    #[test]
    fn delete_fixup_red_sibling_case() {
        // 20 ends up RED, so removing 5 starts with a red sibling
        let mut tree = tree_of(&[10, 5, 20, 15, 25, 30]);
        assert_eq!(tree.color_of(20), Some(Color::Red));
        tree.delete(5).unwrap();
        tree.check_invariants().unwrap();
        assert_eq!(tree.root().unwrap().id(), 20);
    }

    #[test]
    fn delete_fixup_near_red_nephew() {
        let mut tree = tree_of(&[10, 5, 20, 15]);
        // 15 is the near child of 5's sibling
        tree.delete(5).unwrap();
        tree.check_invariants().unwrap();
        assert_eq!(tree.root().unwrap().id(), 15);
        assert_eq!(shape(&tree, tree.root), "((. 10 .) 15 (. 20 .))");
    }
}
