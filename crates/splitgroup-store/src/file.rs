//! JSON-file tag store.
//!
//! Every read goes to disk, so several processes sharing the file see each
//! other's writes. Each write holds an exclusive lock on a sidecar `.lock`
//! file across its read-modify-write, then replaces the document through a
//! uniquely named temp file and an atomic rename.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use splitgroup_core::traits::TagStore;
use splitgroup_core::{StoreError, TagRef, TagScope};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TagRecord {
    scope: TagScope,
    course_id: String,
    user_id: String,
    key: String,
    value: String,
}

impl TagRecord {
    fn matches(&self, tag: &TagRef) -> bool {
        self.scope == tag.scope
            && self.course_id == tag.course_id
            && self.user_id == tag.user_id
            && self.key == tag.key
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TagFile {
    #[serde(default)]
    tags: Vec<TagRecord>,
}

/// A tag store persisted as a single JSON document.
pub struct JsonFileTagStore {
    path: PathBuf,
}

impl JsonFileTagStore {
    /// Open a store at `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sidecar file that serializes writers across handles and processes.
    pub fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn load(path: &Path) -> Result<TagFile, StoreError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(TagFile::default()),
        Err(e) => return Err(e.into()),
    };
    if content.trim().is_empty() {
        return Ok(TagFile::default());
    }
    serde_json::from_str(&content)
        .map_err(|e| StoreError::Corrupt(format!("{}: {e}", path.display())))
}

fn write_tag(path: &Path, lock_path: &Path, tag: &TagRef, value: &str) -> Result<(), StoreError> {
    let dir = parent_dir(path);
    std::fs::create_dir_all(&dir)?;

    let lock_file = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(lock_path)?;
    let mut lock = fd_lock::RwLock::new(lock_file);
    let _guard = lock.write()?;

    let mut file = load(path)?;
    match file.tags.iter_mut().find(|r| r.matches(tag)) {
        Some(record) => record.value = value.to_string(),
        None => file.tags.push(TagRecord {
            scope: tag.scope,
            course_id: tag.course_id.clone(),
            user_id: tag.user_id.clone(),
            key: tag.key.clone(),
            value: value.to_string(),
        }),
    }

    let json =
        serde_json::to_string_pretty(&file).map_err(|e| StoreError::Corrupt(e.to_string()))?;
    let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
    tmp.write_all(json.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
    Ok(())
}

async fn blocking<T, F>(f: F) -> Result<T, StoreError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StoreError::Unavailable(format!("store task failed: {e}")))?
}

#[async_trait]
impl TagStore for JsonFileTagStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn get_tag(&self, tag: &TagRef) -> Result<Option<String>, StoreError> {
        let path = self.path.clone();
        let file = blocking(move || load(&path)).await?;
        Ok(file
            .tags
            .into_iter()
            .find(|r| r.matches(tag))
            .map(|r| r.value))
    }

    async fn set_tag(&self, tag: &TagRef, value: &str) -> Result<(), StoreError> {
        let path = self.path.clone();
        let lock_path = self.lock_path();
        let owned_tag = tag.clone();
        let owned_value = value.to_string();
        blocking(move || write_tag(&path, &lock_path, &owned_tag, &owned_value)).await?;

        tracing::debug!(path = %self.path.display(), key = %tag.key, "tag written");
        Ok(())
    }
}
