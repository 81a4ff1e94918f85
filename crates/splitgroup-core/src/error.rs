//! Error types for partition lookup, group assignment, and configuration.
//!
//! `StoreError` lives here rather than in `splitgroup-store` so the engine can
//! classify tag store failures without string matching.

use thiserror::Error;

/// Errors surfaced by the assignment engine and child selector.
#[derive(Debug, Error)]
pub enum AssignmentError {
    /// No partition with this id is registered for the course.
    #[error("partition not found: {0}")]
    PartitionNotFound(i64),

    /// The partition has no groups, so nothing can be assigned.
    #[error("partition {0} has no groups")]
    EmptyPartition(i64),

    /// None of the split test's children exist in the course tree.
    #[error("split test has no available children")]
    NoAvailableChildren,

    /// The learner has no stable identity to persist an assignment against.
    #[error("learner has no stable identity")]
    NoIdentity,

    /// Reading or writing the tag store failed.
    #[error("tag store unavailable: {0}")]
    TagStoreUnavailable(#[from] StoreError),
}

/// Errors reported by a tag store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// An I/O error while reading or writing persisted tags.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted data could not be decoded.
    #[error("corrupt store data: {0}")]
    Corrupt(String),
}

impl StoreError {
    /// Returns `true` if a later attempt might succeed.
    ///
    /// The engine itself never retries; this is for the caller's policy.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable(_) | StoreError::Io(_))
    }
}

/// Errors in partition definitions or split test attributes.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Two partitions in one registry share an id.
    #[error("duplicate partition id: {0}")]
    DuplicatePartition(i64),

    /// Two groups in one partition share an id.
    #[error("duplicate group id {group_id:?} in partition {partition_id}")]
    DuplicateGroup { partition_id: i64, group_id: String },

    /// A serialized partition could not be decoded.
    #[error("invalid partition record: {0}")]
    InvalidRecord(String),

    /// A serialized partition or group carries an unknown format version.
    #[error("unsupported partition format version: {0}")]
    UnsupportedVersion(u32),

    /// `user_partition_id` is not an integer.
    #[error("invalid user_partition_id: {0:?}")]
    InvalidPartitionId(String),

    /// `group_id_to_child` is not a JSON object of strings.
    #[error("invalid group_id_to_child: {0}")]
    InvalidChildMap(String),
}
