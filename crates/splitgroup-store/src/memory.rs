//! In-memory tag store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use splitgroup_core::traits::TagStore;
use splitgroup_core::{StoreError, TagRef};

/// A tag store that keeps everything in process memory.
///
/// Useful for tests and single-process tools. Counts reads and writes so
/// callers can assert on store traffic.
#[derive(Default)]
pub struct MemoryTagStore {
    tags: Mutex<HashMap<TagRef, String>>,
    get_count: AtomicU32,
    set_count: AtomicU32,
}

impl MemoryTagStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with tags.
    pub fn with_tags<I>(tags: I) -> Self
    where
        I: IntoIterator<Item = (TagRef, String)>,
    {
        Self {
            tags: Mutex::new(tags.into_iter().collect()),
            get_count: AtomicU32::new(0),
            set_count: AtomicU32::new(0),
        }
    }

    /// Number of `get_tag` calls made.
    pub fn get_count(&self) -> u32 {
        self.get_count.load(Ordering::Relaxed)
    }

    /// Number of `set_tag` calls made.
    pub fn set_count(&self) -> u32 {
        self.set_count.load(Ordering::Relaxed)
    }

    /// Number of tags currently stored.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<TagRef, String>> {
        self.tags.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl TagStore for MemoryTagStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get_tag(&self, tag: &TagRef) -> Result<Option<String>, StoreError> {
        self.get_count.fetch_add(1, Ordering::Relaxed);
        Ok(self.lock().get(tag).cloned())
    }

    async fn set_tag(&self, tag: &TagRef, value: &str) -> Result<(), StoreError> {
        self.set_count.fetch_add(1, Ordering::Relaxed);
        self.lock().insert(tag.clone(), value.to_string());
        Ok(())
    }
}
