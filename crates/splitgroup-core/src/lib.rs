//! splitgroup-core — Partition registry, group assignment, and split-test selection.
//!
//! This crate assigns each learner to one group per user partition, persists
//! the assignment through a pluggable tag store, and maps the assigned group
//! to the content child a split test should render.

pub mod engine;
pub mod error;
pub mod model;
pub mod parser;
pub mod registry;
pub mod selector;
pub mod traits;

#[cfg(test)]
mod test_support;

pub use engine::GroupAssignmentEngine;
pub use error::{AssignmentError, ConfigError, StoreError};
pub use model::{tag_key, Group, Learner, Partition, TagRef, TagScope};
pub use registry::{PartitionRegistry, StaticPartitionSource};
pub use selector::{select_child, ChildSelection, GroupChildMap};
pub use split_test::{SplitTest, SplitTestAttributes};
