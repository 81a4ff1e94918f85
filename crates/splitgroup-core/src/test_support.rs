//! In-crate tag store and randomness doubles for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::Barrier;

use crate::error::StoreError;
use crate::model::TagRef;
use crate::traits::{RandomSource, TagStore};

/// Counting in-memory store.
#[derive(Default)]
pub struct MemoryTags {
    tags: Mutex<HashMap<TagRef, String>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryTags {
    /// Seed a value without counting it as a write.
    pub fn insert(&self, tag: &TagRef, value: &str) {
        self.tags
            .lock()
            .unwrap()
            .insert(tag.clone(), value.to_string());
    }

    pub fn value(&self, tag: &TagRef) -> Option<String> {
        self.tags.lock().unwrap().get(tag).cloned()
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TagStore for MemoryTags {
    fn name(&self) -> &str {
        "test-memory"
    }

    async fn get_tag(&self, tag: &TagRef) -> Result<Option<String>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.value(tag))
    }

    async fn set_tag(&self, tag: &TagRef, value: &str) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.insert(tag, value);
        Ok(())
    }
}

/// Store whose first `gated` reads all wait for each other before returning.
pub struct GatedStore {
    inner: MemoryTags,
    gated: usize,
    arrivals: AtomicUsize,
    barrier: Barrier,
}

impl GatedStore {
    pub fn new(gated: usize) -> Self {
        Self {
            inner: MemoryTags::default(),
            gated,
            arrivals: AtomicUsize::new(0),
            barrier: Barrier::new(gated),
        }
    }

    pub fn value(&self, tag: &TagRef) -> Option<String> {
        self.inner.value(tag)
    }

    pub fn writes(&self) -> usize {
        self.inner.writes()
    }
}

#[async_trait]
impl TagStore for GatedStore {
    fn name(&self) -> &str {
        "test-gated"
    }

    async fn get_tag(&self, tag: &TagRef) -> Result<Option<String>, StoreError> {
        let value = self.inner.get_tag(tag).await?;
        if self.arrivals.fetch_add(1, Ordering::SeqCst) < self.gated {
            self.barrier.wait().await;
        }
        Ok(value)
    }

    async fn set_tag(&self, tag: &TagRef, value: &str) -> Result<(), StoreError> {
        self.inner.set_tag(tag, value).await
    }
}

/// Store that fails reads or writes.
pub struct FailingStore {
    fail_reads: bool,
    write_attempts: AtomicUsize,
}

impl FailingStore {
    pub fn on_read() -> Self {
        Self {
            fail_reads: true,
            write_attempts: AtomicUsize::new(0),
        }
    }

    pub fn on_write() -> Self {
        Self {
            fail_reads: false,
            write_attempts: AtomicUsize::new(0),
        }
    }

    pub fn write_attempts(&self) -> usize {
        self.write_attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TagStore for FailingStore {
    fn name(&self) -> &str {
        "test-failing"
    }

    async fn get_tag(&self, _tag: &TagRef) -> Result<Option<String>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::Unavailable("connection refused".into()));
        }
        Ok(None)
    }

    async fn set_tag(&self, _tag: &TagRef, _value: &str) -> Result<(), StoreError> {
        self.write_attempts.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Unavailable("connection reset".into()))
    }
}

/// Random source that returns a fixed sequence of indices.
pub struct ScriptedRandom {
    picks: Mutex<VecDeque<usize>>,
}

impl ScriptedRandom {
    pub fn new(picks: impl IntoIterator<Item = usize>) -> Self {
        Self {
            picks: Mutex::new(picks.into_iter().collect()),
        }
    }

    pub fn remaining(&self) -> usize {
        self.picks.lock().unwrap().len()
    }
}

impl RandomSource for ScriptedRandom {
    fn pick(&self, len: usize) -> usize {
        let index = self
            .picks
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted random source exhausted");
        assert!(index < len, "scripted pick {index} out of range 0..{len}");
        index
    }
}
