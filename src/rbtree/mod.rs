//! A red-black tree of [`Record`]s keyed by their id.
//!
//! Nodes live in a `Vec` and link to each other by index. Index 0 is never
//! allocated: `NodeId::NIL` stands in for every missing child and for the
//! parent of the root, and it is BLACK by definition. Nothing ever writes
//! through it, so there is no shared mutable nil node to keep consistent.
//!
//! Deleting a node swaps the last node of the arena into the freed slot
//! (see `RBTree::release`), so the arena stays dense and its length is
//! always the number of records.

use std::cmp::Ordering;
use std::fmt::{self, Debug};

use crate::error::{IndexError, Result};
use crate::record::{Record, RecordId};

mod fixup;
mod iter;
mod validate;

pub use iter::Iter;
pub use validate::InvariantViolation;


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

/// Handle to a node in the arena. `NodeId(n)` lives at `nodes[n - 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeId(usize);

impl NodeId {
    const NIL: NodeId = NodeId(0);

    fn is_nil(self) -> bool {
        self == Self::NIL
    }

    fn from_index(index: usize) -> Self {
        NodeId(index + 1)
    }

    fn index(self) -> usize {
        debug_assert!(!self.is_nil(), "the sentinel has no slot");
        self.0 - 1
    }
}

#[derive(Clone)]
struct Node {
    record: Record,
    color: Color,
    left: NodeId,
    right: NodeId,
    // back-link only, the arena owns every node
    parent: NodeId,
}


#[derive(Clone, Default)]
pub struct RBTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for NodeId {
    fn default() -> Self {
        Self::NIL
    }
}

impl RBTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_nil()
    }

    /// The record stored at the root, if any.
    pub fn root(&self) -> Option<&Record> {
        (!self.root.is_nil()).then(|| &self.node(self.root).record)
    }

    /// Color of the root position (BLACK for an empty tree, like the sentinel).
    pub fn root_color(&self) -> Color {
        self.color(self.root)
    }

    /// Color of the node holding `id`, or `None` if there is no such record.
    pub fn color_of(&self, id: RecordId) -> Option<Color> {
        let node = self.find(id);
        (!node.is_nil()).then(|| self.color(node))
    }

    /// Inserts a new record.
    ///
    /// Ids are unique: if `record.id()` is already present the tree is left
    /// untouched and [`IndexError::DuplicateKey`] is returned. Use
    /// [`update`](Self::update) to overwrite an existing record.
    ///
    /// Complexity: O(log(n))
    pub fn insert(&mut self, record: Record) -> Result<()> {
        let key = record.id();
        let mut parent = NodeId::NIL;
        let mut current = self.root;
        let mut went_left = false;

        while !current.is_nil() {
            parent = current;
            match key.cmp(&self.key(current)) {
                Ordering::Less => {
                    current = self.left(current);
                    went_left = true;
                }
                Ordering::Greater => {
                    current = self.right(current);
                    went_left = false;
                }
                Ordering::Equal => {
                    debug!("Rejected insert of duplicate id {key}");
                    return Err(IndexError::DuplicateKey { id: key })
                }
            }
        }

        self.nodes.push(Node {
            record,
            color: Color::Red,
            left: NodeId::NIL,
            right: NodeId::NIL,
            parent,
        });
        let node = NodeId::from_index(self.nodes.len() - 1);

        if parent.is_nil() {
            self.root = node;
        } else if went_left {
            self.set_left(parent, node);
        } else {
            self.set_right(parent, node);
        }

        self.insert_fixup(node);
        debug!("Inserted id {key} ({} records)", self.len());
        Ok(())
    }

    /// Inserts every record in order, stopping at the first error.
    ///
    /// Returns how many records were inserted.
    pub fn insert_all<I>(&mut self, records: I) -> Result<usize>
    where
        I: IntoIterator<Item = Record>
    {
        let mut count = 0;
        for record in records {
            self.insert(record)?;
            count += 1;
        }
        Ok(count)
    }

    /// Complexity: O(log(n))
    pub fn search(&self, id: RecordId) -> Result<&Record> {
        self.get(id).ok_or(IndexError::NotFound { id })
    }

    /// Like [`search`](Self::search), but with an `Option`.
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        let node = self.find(id);
        (!node.is_nil()).then(|| &self.node(node).record)
    }

    pub fn contains(&self, id: RecordId) -> bool {
        !self.find(id).is_nil()
    }

    /// Overwrites the name and score of an existing record in place.
    ///
    /// The tree shape and colors are not touched.
    pub fn update(&mut self, id: RecordId, name: impl Into<String>, score: f64) -> Result<&Record> {
        let node = self.find(id);
        if node.is_nil() {
            debug!("Update of missing id {id}");
            return Err(IndexError::NotFound { id })
        }

        let record = &mut self.node_mut(node).record;
        let (old_name, old_score) = record.overwrite(name.into(), score);
        debug!("Updated id {id}: {old_name:?} -> {:?}, {old_score} -> {}", record.name(), record.score());
        Ok(&*record)
    }

    /// Removes the record with the given id and returns it.
    ///
    /// Complexity: O(log(n))
    pub fn delete(&mut self, id: RecordId) -> Result<Record> {
        let target = self.find(id);
        if target.is_nil() {
            debug!("Delete of missing id {id}");
            return Err(IndexError::NotFound { id })
        }

        // With two children, the in-order successor gets unlinked instead,
        // after its record is moved up into `target`. Either way `spliced`
        // has at most one child.
        let spliced = if !self.left(target).is_nil() && !self.right(target).is_nil() {
            self.minimum(self.right(target))
        } else {
            target
        };
        let child = if self.left(spliced).is_nil() { self.right(spliced) } else { self.left(spliced) };
        let child_parent = self.parent(spliced);
        let spliced_color = self.color(spliced);

        self.transplant(spliced, child);

        if spliced != target {
            let (a, b) = self.two_nodes_mut(target, spliced);
            std::mem::swap(&mut a.record, &mut b.record);
        }

        if spliced_color == Color::Black {
            self.delete_fixup(child, child_parent);
        }

        let record = self.release(spliced);
        debug_assert_eq!(record.id(), id);
        debug!("Deleted id {id} ({} records)", self.len());
        Ok(record)
    }

    /// Removes every record.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = NodeId::NIL;
    }

    /// Record with the smallest id.
    pub fn first(&self) -> Option<&Record> {
        (!self.root.is_nil()).then(|| &self.node(self.minimum(self.root)).record)
    }

    /// Record with the largest id.
    pub fn last(&self) -> Option<&Record> {
        if self.root.is_nil() { return None }
        let mut node = self.root;
        while !self.right(node).is_nil() {
            node = self.right(node);
        }
        Some(&self.node(node).record)
    }

    /// Number of nodes on the longest path from the root to a leaf.
    pub fn height(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self.root, 0)];
        while let Some((node, depth)) = stack.pop() {
            if node.is_nil() {
                max = max.max(depth);
                continue
            }
            stack.push((self.left(node), depth + 1));
            stack.push((self.right(node), depth + 1));
        }
        max
    }

    /// In-order iterator over all records, ascending by id.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }

    // -- arena plumbing ---------------------------------------------------

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    fn two_nodes_mut(&mut self, a: NodeId, b: NodeId) -> (&mut Node, &mut Node) {
        let (i, j) = (a.index(), b.index());
        assert_ne!(i, j);
        if i < j {
            let (lo, hi) = self.nodes.split_at_mut(j);
            (&mut lo[i], &mut hi[0])
        } else {
            let (lo, hi) = self.nodes.split_at_mut(i);
            (&mut hi[0], &mut lo[j])
        }
    }

    fn key(&self, id: NodeId) -> RecordId {
        self.node(id).record.id()
    }

    fn color(&self, id: NodeId) -> Color {
        if id.is_nil() { Color::Black } else { self.node(id).color }
    }

    fn left(&self, id: NodeId) -> NodeId {
        if id.is_nil() { NodeId::NIL } else { self.node(id).left }
    }

    fn right(&self, id: NodeId) -> NodeId {
        if id.is_nil() { NodeId::NIL } else { self.node(id).right }
    }

    fn parent(&self, id: NodeId) -> NodeId {
        if id.is_nil() { NodeId::NIL } else { self.node(id).parent }
    }

    // NOTE: the setters below ignore the sentinel. It stays BLACK and linkless.

    fn set_color(&mut self, id: NodeId, color: Color) {
        if !id.is_nil() {
            self.node_mut(id).color = color;
        }
    }

    fn set_left(&mut self, id: NodeId, child: NodeId) {
        if !id.is_nil() {
            self.node_mut(id).left = child;
        }
    }

    fn set_right(&mut self, id: NodeId, child: NodeId) {
        if !id.is_nil() {
            self.node_mut(id).right = child;
        }
    }

    fn set_parent(&mut self, id: NodeId, parent: NodeId) {
        if !id.is_nil() {
            self.node_mut(id).parent = parent;
        }
    }

    fn find(&self, key: RecordId) -> NodeId {
        let mut current = self.root;
        while !current.is_nil() {
            match key.cmp(&self.key(current)) {
                Ordering::Less => current = self.left(current),
                Ordering::Greater => current = self.right(current),
                Ordering::Equal => break,
            }
        }
        current
    }

    fn minimum(&self, mut node: NodeId) -> NodeId {
        while !self.left(node).is_nil() {
            node = self.left(node);
        }
        node
    }

    /// Points whatever referred to `old` as a child (its parent, or the root
    /// slot) at `new` instead. Does not touch `new.parent`.
    fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) {
        if parent.is_nil() {
            self.root = new;
        } else if self.left(parent) == old {
            self.set_left(parent, new);
        } else {
            self.set_right(parent, new);
        }
    }

    /// Splices `new` into the position of `old`. `old` keeps its own links.
    fn transplant(&mut self, old: NodeId, new: NodeId) {
        let parent = self.parent(old);
        self.replace_child(parent, old, new);
        self.set_parent(new, parent);
    }

    /// Frees the slot of an already unlinked node, moving the last node of
    /// the arena into it.
    fn release(&mut self, id: NodeId) -> Record {
        let last = NodeId::from_index(self.nodes.len() - 1);
        if id != last {
            let (parent, left, right) = (self.parent(last), self.left(last), self.right(last));
            self.replace_child(parent, last, id);
            self.set_parent(left, id);
            self.set_parent(right, id);
        }
        self.nodes.swap_remove(id.index()).record
    }
}

impl Debug for RBTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
