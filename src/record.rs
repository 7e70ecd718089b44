use std::fmt::{self, Display};

use serde::Serialize;


/// Unique key of a [`Record`]. Always non-zero for records that went through
/// [`RecordLimits::validate`](crate::config::RecordLimits::validate).
pub type RecordId = u32;

/// A fixed-schema entry stored in the index.
///
/// The `id` is fixed at construction. `name` and `score` can only be changed
/// through [`RBTree::update`](crate::rbtree::RBTree::update), which keeps the
/// node (and therefore the tree shape) where it is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    id: RecordId,
    name: String,
    score: f64,
}

impl Record {
    pub fn new(id: RecordId, name: impl Into<String>, score: f64) -> Self {
        Self { id, name: name.into(), score }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    /// Overwrites the mutable fields, returning the old ones.
    pub(crate) fn overwrite(&mut self, name: String, score: f64) -> (String, f64) {
        let old_name = std::mem::replace(&mut self.name, name);
        let old_score = std::mem::replace(&mut self.score, score);
        (old_name, old_score)
    }
}

impl Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ID: {}, Name: {}, Score: {:.2}", self.id, self.name, self.score)
    }
}
