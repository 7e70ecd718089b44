//! An ordered index of records, kept balanced as a red-black tree.
//!
//! The tree itself is in [`rbtree`]. [`persist`] and [`report`] sit on top of
//! it and only go through its public operations.

#![deny(unsafe_code)]

#[macro_use]
extern crate log;

// the index
pub mod record;
pub mod rbtree;

// ambient stuff
pub mod config;
pub mod error;
pub mod logging;

// collaborators
pub mod persist;
pub mod report;

pub use config::{LogConfig, RecordLimits};
pub use error::{IndexError, Result};
pub use rbtree::{Color, InvariantViolation, RBTree};
pub use record::{Record, RecordId};
