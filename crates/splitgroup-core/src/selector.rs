//! Group → child selection for split-test content nodes.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{AssignmentError, ConfigError};
use crate::model::Partition;
use crate::traits::RandomSource;

/// Mapping from group id to content child id, owned by a split test.
///
/// Keys may name groups that no longer exist in the partition; such entries
/// are kept but never selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupChildMap(BTreeMap<String, String>);

impl GroupChildMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, G, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (G, C)>,
        G: Into<String>,
        C: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(g, c)| (g.into(), c.into()))
                .collect(),
        )
    }

    /// Pair a partition's groups with children in order, for authoring.
    ///
    /// Extra groups or extra children are left unpaired.
    pub fn build_for_partition(partition: &Partition, children: &[String]) -> Self {
        Self(
            partition
                .groups()
                .iter()
                .zip(children)
                .map(|(g, c)| (g.id.clone(), c.clone()))
                .collect(),
        )
    }

    pub fn get(&self, group_id: &str) -> Option<&str> {
        self.0.get(group_id).map(String::as_str)
    }

    pub fn insert(&mut self, group_id: impl Into<String>, child_id: impl Into<String>) {
        self.0.insert(group_id.into(), child_id.into());
    }

    /// Record the child chosen by a fallback selection.
    pub fn heal(&mut self, selection: &ChildSelection) {
        if selection.repaired {
            self.insert(selection.group_id.clone(), selection.child_id.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(g, c)| (g.as_str(), c.as_str()))
    }

    /// Group ids in the map that the partition no longer defines.
    pub fn orphaned_groups(&self, partition: &Partition) -> Vec<String> {
        self.0
            .keys()
            .filter(|g| !partition.contains_group(g))
            .cloned()
            .collect()
    }

    /// Serialize as a JSON object string.
    pub fn to_json_string(&self) -> String {
        // A string-to-string map always serializes.
        serde_json::to_string(&self.0).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn from_json_string(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(|e| ConfigError::InvalidChildMap(e.to_string()))
    }
}

/// Outcome of a child selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildSelection {
    pub group_id: String,
    pub child_id: String,
    /// `true` when the map was stale and a fallback child was picked.
    pub repaired: bool,
}

/// Pick the child to render for `group_id`.
///
/// When the map has no usable entry, an arbitrary child is chosen, preferring
/// children no other group claims. The fallback is not stable across calls.
pub fn select_child(
    map: &GroupChildMap,
    group_id: &str,
    available_child_ids: &[String],
    random: &dyn RandomSource,
) -> Result<ChildSelection, AssignmentError> {
    if available_child_ids.is_empty() {
        return Err(AssignmentError::NoAvailableChildren);
    }

    if let Some(child_id) = map.get(group_id) {
        if available_child_ids.iter().any(|c| c == child_id) {
            return Ok(ChildSelection {
                group_id: group_id.to_string(),
                child_id: child_id.to_string(),
                repaired: false,
            });
        }
    }

    let claimed: HashSet<&str> = map
        .iter()
        .filter(|(g, _)| *g != group_id)
        .map(|(_, c)| c)
        .collect();
    let unclaimed: Vec<&String> = available_child_ids
        .iter()
        .filter(|c| !claimed.contains(c.as_str()))
        .collect();
    let candidates: Vec<&String> = if unclaimed.is_empty() {
        available_child_ids.iter().collect()
    } else {
        unclaimed
    };

    let child_id = candidates[random.pick(candidates.len())].clone();
    tracing::debug!(
        group_id,
        child_id = %child_id,
        "no usable child mapping for group, using fallback"
    );

    Ok(ChildSelection {
        group_id: group_id.to_string(),
        child_id,
        repaired: true,
    })
}
