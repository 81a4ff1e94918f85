//! Core trait definitions for the engine's external collaborators.
//!
//! Tag stores are implemented by `splitgroup-store`; partition sources,
//! random sources, and trackers have small implementations here.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::{Partition, TagRef};

// ---------------------------------------------------------------------------
// Tag store
// ---------------------------------------------------------------------------

/// Per-user, per-scope key/value string storage.
///
/// `set_tag` is last-write-wins; no compare-and-swap is required.
#[async_trait]
pub trait TagStore: Send + Sync {
    /// Human-readable backend name (e.g. "memory").
    fn name(&self) -> &str;

    /// Read a tag, returning `None` if it was never set.
    async fn get_tag(&self, tag: &TagRef) -> Result<Option<String>, StoreError>;

    /// Write a tag, replacing any previous value.
    async fn set_tag(&self, tag: &TagRef, value: &str) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// Partition source
// ---------------------------------------------------------------------------

/// Supplies the partition definitions configured for a course.
pub trait PartitionSource: Send + Sync {
    fn partitions_for(&self, course_id: &str) -> anyhow::Result<Vec<Partition>>;
}

// ---------------------------------------------------------------------------
// Random source
// ---------------------------------------------------------------------------

/// Uniform index source used for fresh assignments and child fallback.
pub trait RandomSource: Send + Sync {
    /// Return an index in `0..len`. Callers guarantee `len > 0`.
    fn pick(&self, len: usize) -> usize;
}

/// Thread-local OS-seeded randomness.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick(&self, len: usize) -> usize {
        rand::rng().random_range(0..len)
    }
}

/// Reproducible randomness from a fixed seed.
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn pick(&self, len: usize) -> usize {
        // A poisoned lock still holds a usable generator.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.random_range(0..len)
    }
}

// ---------------------------------------------------------------------------
// Assignment tracking
// ---------------------------------------------------------------------------

/// Analytics event emitted once per fresh group assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentEvent {
    /// Event name, always `"group_assigned"`.
    pub event: String,
    pub event_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    pub course_id: String,
    pub partition_id: i64,
    pub group_id: String,
}

impl AssignmentEvent {
    pub const NAME: &'static str = "group_assigned";

    pub fn new(user_id: &str, course_id: &str, partition_id: i64, group_id: &str) -> Self {
        Self {
            event: Self::NAME.to_string(),
            event_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            user_id: user_id.to_string(),
            course_id: course_id.to_string(),
            partition_id,
            group_id: group_id.to_string(),
        }
    }
}

/// Observer hook for fresh assignments. Not required for correctness.
pub trait AssignmentTracker: Send + Sync {
    fn on_group_assigned(&self, event: &AssignmentEvent);
}

/// No-op tracker.
pub struct NoopTracker;

impl AssignmentTracker for NoopTracker {
    fn on_group_assigned(&self, _: &AssignmentEvent) {}
}

/// Tracker that emits each event as a structured log line.
pub struct LogTracker;

impl AssignmentTracker for LogTracker {
    fn on_group_assigned(&self, event: &AssignmentEvent) {
        tracing::info!(
            event = %event.event,
            event_id = %event.event_id,
            user_id = %event.user_id,
            course_id = %event.course_id,
            partition_id = event.partition_id,
            group_id = %event.group_id,
            "group assigned"
        );
    }
}

/// Tracker that keeps every event in memory.
#[derive(Default)]
pub struct RecordingTracker {
    events: Mutex<Vec<AssignmentEvent>>,
}

impl RecordingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far.
    pub fn events(&self) -> Vec<AssignmentEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl AssignmentTracker for RecordingTracker {
    fn on_group_assigned(&self, event: &AssignmentEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event.clone());
    }
}
