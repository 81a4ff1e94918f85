//! Group assignment engine.
//!
//! Binds a learner to one group per partition and persists the binding in the
//! tag store so it survives across requests.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::AssignmentError;
use crate::model::{Learner, TagRef};
use crate::registry::PartitionRegistry;
use crate::traits::{AssignmentEvent, AssignmentTracker, NoopTracker, RandomSource, TagStore};

/// Assigns learners to partition groups for a single course.
///
/// Every call re-reads the tag store; nothing is cached between calls. The
/// read-then-write on first access is not atomic: two concurrent first calls
/// may both write, and the store's last write wins.
pub struct GroupAssignmentEngine {
    registry: PartitionRegistry,
    store: Arc<dyn TagStore>,
    random: Arc<dyn RandomSource>,
    tracker: Arc<dyn AssignmentTracker>,
}

impl GroupAssignmentEngine {
    pub fn new(
        registry: PartitionRegistry,
        store: Arc<dyn TagStore>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            registry,
            store,
            random,
            tracker: Arc::new(NoopTracker),
        }
    }

    /// Attach an observer for fresh assignments.
    pub fn with_tracker(mut self, tracker: Arc<dyn AssignmentTracker>) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn registry(&self) -> &PartitionRegistry {
        &self.registry
    }

    pub fn random(&self) -> &dyn RandomSource {
        self.random.as_ref()
    }

    /// Return the learner's group in `partition_id`, assigning one if needed.
    ///
    /// A stored value that is no longer a group of the partition is replaced
    /// by a fresh uniform draw. Store failures fail the call without retry.
    pub async fn get_group(
        &self,
        learner: &Learner,
        partition_id: i64,
    ) -> Result<String, AssignmentError> {
        let user_id = learner.user_id().ok_or(AssignmentError::NoIdentity)?;
        let partition = self.registry.get_partition(partition_id)?;
        if partition.groups().is_empty() {
            return Err(AssignmentError::EmptyPartition(partition_id));
        }

        let course_id = self.registry.course_id();
        let tag = TagRef::partition(course_id, user_id, partition_id);

        let stored = self.store.get_tag(&tag).await?;
        match stored {
            Some(group_id) if partition.contains_group(&group_id) => return Ok(group_id),
            Some(stale) => {
                tracing::warn!(
                    user_id,
                    course_id,
                    partition_id,
                    stale = %stale,
                    "stored group is not in partition, reassigning"
                );
            }
            None => {}
        }

        let groups = partition.groups();
        let chosen = &groups[self.random.pick(groups.len())];
        self.store.set_tag(&tag, &chosen.id).await?;

        tracing::debug!(
            user_id,
            course_id,
            partition_id,
            group_id = %chosen.id,
            "assigned group"
        );
        self.tracker.on_group_assigned(&AssignmentEvent::new(
            user_id,
            course_id,
            partition_id,
            &chosen.id,
        ));

        Ok(chosen.id.clone())
    }

    /// Resolve several partitions for one learner, stopping at the first error.
    pub async fn get_groups(
        &self,
        learner: &Learner,
        partition_ids: &[i64],
    ) -> Result<BTreeMap<i64, String>, AssignmentError> {
        let mut groups = BTreeMap::new();
        for &partition_id in partition_ids {
            let group_id = self.get_group(learner, partition_id).await?;
            groups.insert(partition_id, group_id);
        }
        Ok(groups)
    }
}
