//! Progress persistence for the story trainer.
//!
//! All progress lives in a single JSON record stored under one key
//! (`"snairy_progress"`). Reads are whole-record, writes are whole-record;
//! there are no partial updates. A missing, unreadable, or structurally
//! invalid payload falls back to the default record rather than surfacing
//! an error.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;
use tokio::fs;

/// The storage key the progress record is persisted under.
pub const PROGRESS_KEY: &str = "snairy_progress";

/// Errors from progress persistence operations.
#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("backend error: {0}")]
    Backend(String),
}

/// A durable string key-value backend.
///
/// The trainer only needs `get` and `set`; anything that can store one
/// JSON string under a fixed key qualifies. `FileBackend` is the shipped
/// implementation, `testing::MemoryBackend` the in-memory one.
#[allow(async_fn_in_trait)]
pub trait KeyValueBackend {
    /// Fetch the value stored under `key`, or `None` if nothing is stored.
    async fn get(&self, key: &str) -> Result<Option<String>, ProgressError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), ProgressError>;
}

/// File-based key-value backend: one JSON file per key inside a base
/// directory.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Create a backend rooted at `dir`. The directory is created on the
    /// first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File path for a key, with non-alphanumeric characters sanitized.
    fn key_path(&self, key: &str) -> PathBuf {
        let sanitized = key
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect::<String>();
        self.dir.join(format!("{sanitized}.json"))
    }
}

impl KeyValueBackend for FileBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, ProgressError> {
        match fs::read_to_string(self.key_path(key)).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), ProgressError> {
        fs::create_dir_all(&self.dir).await?;

        // Write to a temp file and rename so a crash mid-write never leaves
        // a truncated record behind.
        let path = self.key_path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).await?;
        fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

/// The persisted progress record.
///
/// Serialized as camelCase JSON to match the stored layout:
/// `{"unlockedStories": [...], "completedStories": [...],
/// "storyStars": {...}, "currentStoryId": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    /// Story ids the user may open. Grows monotonically.
    pub unlocked_stories: Vec<String>,

    /// Story ids that have ever earned the full star rating. Grows
    /// monotonically.
    pub completed_stories: Vec<String>,

    /// Most recent star rating per story. Absent means 0. Unlike
    /// completion, a retry can lower this.
    pub story_stars: BTreeMap<String, u8>,

    /// The story the user last opened, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_story_id: Option<String>,
}

impl ProgressRecord {
    /// The record for a fresh user: only the first story unlocked.
    pub fn initial(first_story_id: impl Into<String>) -> Self {
        Self {
            unlocked_stories: vec![first_story_id.into()],
            completed_stories: Vec::new(),
            story_stars: BTreeMap::new(),
            current_story_id: None,
        }
    }

    /// Add a story to the unlocked set. Idempotent.
    pub fn unlock(&mut self, story_id: &str) {
        if !self.is_unlocked(story_id) {
            self.unlocked_stories.push(story_id.to_string());
        }
    }

    /// Add a story to the completed set. Idempotent.
    pub fn complete(&mut self, story_id: &str) {
        if !self.is_completed(story_id) {
            self.completed_stories.push(story_id.to_string());
        }
    }

    /// Record the latest star rating for a story, replacing any previous
    /// rating regardless of direction.
    pub fn set_stars(&mut self, story_id: &str, stars: u8) {
        self.story_stars.insert(story_id.to_string(), stars);
    }

    pub fn is_unlocked(&self, story_id: &str) -> bool {
        self.unlocked_stories.iter().any(|id| id == story_id)
    }

    pub fn is_completed(&self, story_id: &str) -> bool {
        self.completed_stories.iter().any(|id| id == story_id)
    }

    /// Stars earned for a story, 0 if never attempted.
    pub fn stars_for(&self, story_id: &str) -> u8 {
        self.story_stars.get(story_id).copied().unwrap_or(0)
    }
}

/// Loads and saves the progress record through a key-value backend.
#[derive(Debug, Clone)]
pub struct ProgressStore<B> {
    backend: B,
    first_story_id: String,
}

impl<B: KeyValueBackend> ProgressStore<B> {
    /// Create a store. `first_story_id` seeds the default record when no
    /// valid payload exists.
    pub fn new(backend: B, first_story_id: impl Into<String>) -> Self {
        Self {
            backend,
            first_story_id: first_story_id.into(),
        }
    }

    /// The record used when nothing valid is stored.
    pub fn default_record(&self) -> ProgressRecord {
        ProgressRecord::initial(self.first_story_id.clone())
    }

    /// Load the current record.
    ///
    /// Never fails: a backend read error or a payload that does not parse
    /// as a `ProgressRecord` is logged and replaced by the default record.
    pub async fn load(&self) -> ProgressRecord {
        let payload = match self.backend.get(PROGRESS_KEY).await {
            Ok(Some(payload)) => payload,
            Ok(None) => return self.default_record(),
            Err(e) => {
                tracing::warn!("failed to read progress, starting fresh: {e}");
                return self.default_record();
            }
        };

        match serde_json::from_str(&payload) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("stored progress is not valid, starting fresh: {e}");
                self.default_record()
            }
        }
    }

    /// Persist the full record.
    pub async fn save(&self, record: &ProgressRecord) -> Result<(), ProgressError> {
        let payload = serde_json::to_string(record)?;
        self.backend.set(PROGRESS_KEY, &payload).await
    }
}
