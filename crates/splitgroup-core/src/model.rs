//! Core data model types for splitgroup.
//!
//! Partitions, groups, learners, and the addressing scheme for persisted
//! assignment tags.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Current serialization version for partitions and groups.
pub const PARTITION_FORMAT_VERSION: u32 = 1;

/// Prefix of every assignment tag key.
pub const TAG_KEY_PREFIX: &str = "xblock.partition_service.partition_";

/// One variant within a partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Small string id, unique within the owning partition.
    pub id: String,
    /// Human-readable name.
    pub name: String,
}

impl Group {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A named axis of content variation with a fixed, ordered set of groups.
///
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    id: i64,
    name: String,
    description: String,
    groups: Vec<Group>,
}

impl Partition {
    /// Build a partition, rejecting duplicate group ids.
    ///
    /// An empty group list is accepted here; assignment against it fails later.
    pub fn new(
        id: i64,
        name: impl Into<String>,
        description: impl Into<String>,
        groups: Vec<Group>,
    ) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for group in &groups {
            if !seen.insert(group.id.as_str()) {
                return Err(ConfigError::DuplicateGroup {
                    partition_id: id,
                    group_id: group.id.clone(),
                });
            }
        }

        Ok(Self {
            id,
            name: name.into(),
            description: description.into(),
            groups,
        })
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Look up a group by id.
    pub fn group(&self, group_id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == group_id)
    }

    pub fn contains_group(&self, group_id: &str) -> bool {
        self.group(group_id).is_some()
    }

    /// Serialize to the versioned JSON record used in course configuration.
    pub fn to_json(&self) -> serde_json::Value {
        let groups: Vec<_> = self
            .groups
            .iter()
            .map(|g| {
                serde_json::json!({
                    "id": g.id,
                    "name": g.name,
                    "version": PARTITION_FORMAT_VERSION,
                })
            })
            .collect();

        serde_json::json!({
            "id": self.id,
            "name": self.name,
            "description": self.description,
            "groups": groups,
            "version": PARTITION_FORMAT_VERSION,
        })
    }

    /// Deserialize from a versioned JSON record.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, ConfigError> {
        let record: PartitionRecord = serde_json::from_value(value.clone())
            .map_err(|e| ConfigError::InvalidRecord(e.to_string()))?;

        if record.version != PARTITION_FORMAT_VERSION {
            return Err(ConfigError::UnsupportedVersion(record.version));
        }

        let groups = record
            .groups
            .into_iter()
            .map(|g| {
                if g.version != PARTITION_FORMAT_VERSION {
                    return Err(ConfigError::UnsupportedVersion(g.version));
                }
                Ok(Group::new(g.id, g.name))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Partition::new(record.id, record.name, record.description, groups)
    }
}

#[derive(Debug, Deserialize)]
struct PartitionRecord {
    id: i64,
    name: String,
    description: String,
    groups: Vec<GroupRecord>,
    version: u32,
}

#[derive(Debug, Deserialize)]
struct GroupRecord {
    id: String,
    name: String,
    version: u32,
}

/// The learner a request is made on behalf of.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Learner {
    /// No stable identity; assignments cannot be persisted.
    Anonymous,
    /// An identified user.
    Identified(String),
}

impl Learner {
    pub fn identified(user_id: impl Into<String>) -> Self {
        Learner::Identified(user_id.into())
    }

    pub fn user_id(&self) -> Option<&str> {
        match self {
            Learner::Anonymous => None,
            Learner::Identified(id) => Some(id.as_str()),
        }
    }
}

/// Scope of a persisted user tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagScope {
    Course,
}

impl fmt::Display for TagScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagScope::Course => write!(f, "course"),
        }
    }
}

/// Address of a single persisted tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagRef {
    pub scope: TagScope,
    pub course_id: String,
    pub user_id: String,
    pub key: String,
}

impl TagRef {
    /// The course-scoped assignment tag for one partition.
    pub fn partition(course_id: &str, user_id: &str, partition_id: i64) -> Self {
        Self {
            scope: TagScope::Course,
            course_id: course_id.to_string(),
            user_id: user_id.to_string(),
            key: tag_key(partition_id),
        }
    }
}

/// Tag key under which a partition's group assignment is stored.
pub fn tag_key(partition_id: i64) -> String {
    format!("{TAG_KEY_PREFIX}{partition_id}")
}
