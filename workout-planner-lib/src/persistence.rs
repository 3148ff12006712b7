// workout-planner-lib/src/persistence.rs
use crate::exercise::Exercise;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

const APP_DATA_DIR: &str = "workout-planner";
const DATA_ENV_VAR: &str = "WORKOUT_PLANNER_DATA_DIR";

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Could not determine data directory.")]
    DataDir,
    #[error("I/O error accessing exercise slot: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse stored exercises (JSON): {0}")]
    Parse(serde_json::Error),
    #[error("Failed to serialize exercises (JSON): {0}")]
    Serialize(serde_json::Error),
    #[error("Stored exercise '{id}' is invalid: {reason}")]
    InvalidRecord { id: String, reason: String },
    #[error("Duplicate exercise id in stored data: {0}")]
    DuplicateId(String),
    #[error("Storage rejected the write: {0}")]
    WriteRejected(String),
}

/// A durable slot holding the whole ordered collection as text.
///
/// `load` never fails: an absent, blank or malformed slot yields an empty
/// collection. `save` overwrites the slot with the full collection.
pub trait Persistence {
    fn load(&self) -> Vec<Exercise>;

    /// # Errors
    /// Returns `PersistenceError` if the collection cannot be written.
    fn save(&mut self, exercises: &[Exercise]) -> Result<(), PersistenceError>;

    /// Human readable location of the slot, for logs and the CLI.
    fn location(&self) -> String;
}

/// Parses slot text. Blank text is an empty collection; anything that
/// breaks the record invariants rejects the whole collection.
/// # Errors
/// Returns `PersistenceError::Parse`, `InvalidRecord` or `DuplicateId`.
pub fn decode(text: &str) -> Result<Vec<Exercise>, PersistenceError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let exercises: Vec<Exercise> = serde_json::from_str(text).map_err(PersistenceError::Parse)?;

    {
        let mut seen = HashSet::with_capacity(exercises.len());
        for exercise in &exercises {
            exercise
                .validate()
                .map_err(|e| PersistenceError::InvalidRecord {
                    id: exercise.id.clone(),
                    reason: e.to_string(),
                })?;
            if !seen.insert(exercise.id.as_str()) {
                return Err(PersistenceError::DuplicateId(exercise.id.clone()));
            }
        }
    }
    Ok(exercises)
}

/// # Errors
/// Returns `PersistenceError::Serialize` if serialization fails.
pub fn encode(exercises: &[Exercise]) -> Result<String, PersistenceError> {
    serde_json::to_string(exercises).map_err(PersistenceError::Serialize)
}

fn decode_or_empty(text: &str, location: &str) -> Vec<Exercise> {
    match decode(text) {
        Ok(exercises) => exercises,
        Err(e) => {
            warn!(slot = location, error = %e, "Discarding unreadable exercise slot");
            Vec::new()
        }
    }
}

/// Determines the directory holding the exercise slot.
/// The environment variable wins over the configured directory, which wins
/// over the platform data directory.
/// # Errors
/// Returns `PersistenceError::DataDir` if no directory can be determined.
pub fn get_data_dir(configured: Option<&Path>) -> Result<PathBuf, PersistenceError> {
    if let Ok(dir) = std::env::var(DATA_ENV_VAR) {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    if let Some(dir) = configured {
        return Ok(dir.to_path_buf());
    }
    let base = dirs::data_dir().ok_or(PersistenceError::DataDir)?;
    Ok(base.join(APP_DATA_DIR))
}

/// JSON file slot: `<dir>/<slot_name>.json`.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: &Path, slot_name: &str) -> Self {
        Self::new(dir.join(format!("{slot_name}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Persistence for FileSlot {
    fn load(&self) -> Vec<Exercise> {
        if !self.path.exists() {
            debug!(slot = %self.path.display(), "No exercise slot yet, starting empty");
            return Vec::new();
        }
        match fs::read_to_string(&self.path) {
            Ok(text) => decode_or_empty(&text, &self.location()),
            Err(e) => {
                warn!(slot = %self.path.display(), error = %e, "Failed to read exercise slot");
                Vec::new()
            }
        }
    }

    fn save(&mut self, exercises: &[Exercise]) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = encode(exercises)?;
        // Write beside the slot and rename so a crash never leaves half a file
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, text)?;
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        debug!(slot = %self.path.display(), count = exercises.len(), "Saved exercises");
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory slot. Holds the same text a file slot would.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    text: Option<String>,
    fail_writes: bool,
    writes: usize,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn contents(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Makes every following `save` fail, as a full storage quota would.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Number of successful writes.
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl Persistence for MemorySlot {
    fn load(&self) -> Vec<Exercise> {
        self.text
            .as_deref()
            .map(|text| decode_or_empty(text, "memory"))
            .unwrap_or_default()
    }

    fn save(&mut self, exercises: &[Exercise]) -> Result<(), PersistenceError> {
        if self.fail_writes {
            return Err(PersistenceError::WriteRejected("quota exceeded".to_string()));
        }
        self.text = Some(encode(exercises)?);
        self.writes += 1;
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
