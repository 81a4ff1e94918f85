//! Per-course partition catalog.
//!
//! A registry is built once per course request and handed to the engine;
//! nothing is shared process-wide.

use std::collections::HashSet;

use anyhow::{Context, Result};

use crate::error::{AssignmentError, ConfigError};
use crate::model::Partition;
use crate::traits::PartitionSource;

/// Read-only catalog of the partitions known for one course.
#[derive(Debug, Clone)]
pub struct PartitionRegistry {
    course_id: String,
    partitions: Vec<Partition>,
}

impl PartitionRegistry {
    /// Build a registry, rejecting duplicate partition ids.
    pub fn new(
        course_id: impl Into<String>,
        partitions: Vec<Partition>,
    ) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for partition in &partitions {
            if !seen.insert(partition.id()) {
                return Err(ConfigError::DuplicatePartition(partition.id()));
            }
        }

        Ok(Self {
            course_id: course_id.into(),
            partitions,
        })
    }

    /// Load the partitions a source supplies for `course_id`.
    pub fn from_source(source: &dyn PartitionSource, course_id: &str) -> Result<Self> {
        let partitions = source
            .partitions_for(course_id)
            .with_context(|| format!("failed to load partitions for course {course_id}"))?;
        Ok(Self::new(course_id, partitions)?)
    }

    pub fn course_id(&self) -> &str {
        &self.course_id
    }

    pub fn get_partition(&self, partition_id: i64) -> Result<&Partition, AssignmentError> {
        self.partitions
            .iter()
            .find(|p| p.id() == partition_id)
            .ok_or(AssignmentError::PartitionNotFound(partition_id))
    }

    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }
}

/// A partition source that returns the same fixed list for every course.
#[derive(Debug, Clone, Default)]
pub struct StaticPartitionSource {
    partitions: Vec<Partition>,
}

impl StaticPartitionSource {
    pub fn new(partitions: Vec<Partition>) -> Self {
        Self { partitions }
    }
}

impl PartitionSource for StaticPartitionSource {
    fn partitions_for(&self, _course_id: &str) -> Result<Vec<Partition>> {
        Ok(self.partitions.clone())
    }
}
