// workout-planner-lib/src/lib.rs
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

// --- Declare modules ---
mod config;
mod exercise;
pub mod persistence;
mod session;
mod store;

// --- Expose public types ---
pub use config::{
    get_config_path as get_config_path_util, load as load_config_util, parse_color,
    save as save_config_util, Config, ConfigError, StandardColor, Theme, DEFAULT_SLOT_NAME,
};
pub use exercise::{Exercise, ExerciseDraft, ExerciseId, Field, ValidationError};
pub use persistence::{FileSlot, MemorySlot, Persistence, PersistenceError};
pub use session::{EditSession, SessionError, SessionState};
pub use store::{ExerciseStore, StoreCallback, StoreEvent, SubscriptionId};

/// Owns the configuration, the exercise store and the edit session.
///
/// Front-ends call into this and render from `exercises()` and
/// `edit_session()`; they learn about changes through `subscribe`.
pub struct AppService<P: Persistence = FileSlot> {
    pub config: Config,
    pub config_path: PathBuf,
    store: ExerciseStore<P>,
    session: EditSession,
}

impl AppService<FileSlot> {
    /// Loads the config and the exercise slot it points at.
    /// # Errors
    /// Returns `anyhow::Error` if the config or data directory cannot be determined or loaded.
    pub fn initialize() -> Result<Self> {
        let config_path =
            config::get_config_path().context("Failed to determine configuration file path")?;
        let config = config::load(&config_path)
            .with_context(|| format!("Failed to load config from {config_path:?}"))?;

        let data_dir = persistence::get_data_dir(config.data_dir.as_deref())
            .context("Failed to determine data directory")?;
        let slot = FileSlot::in_dir(&data_dir, &config.slot_name);

        Ok(Self::with_persistence(config, config_path, slot))
    }

    pub fn slot_path(&self) -> &Path {
        self.store.persistence().path()
    }
}

impl<P: Persistence> AppService<P> {
    pub fn with_persistence(config: Config, config_path: PathBuf, persistence: P) -> Self {
        Self {
            config,
            config_path,
            store: ExerciseStore::new(persistence),
            session: EditSession::new(),
        }
    }

    pub fn get_config_path(&self) -> &Path {
        &self.config_path
    }

    /// # Errors
    /// Returns `ConfigError` if saving fails.
    pub fn save_config(&self) -> Result<(), ConfigError> {
        config::save(&self.config_path, &self.config)
    }

    /// # Errors
    /// - `ConfigError::InvalidColor` for unknown color names.
    /// - `ConfigError` variants if saving fails.
    pub fn set_header_color(&mut self, color: &str) -> Result<StandardColor, ConfigError> {
        let parsed = parse_color(color)?;
        self.config.theme.header_color = format!("{parsed:?}");
        self.save_config()?;
        Ok(parsed)
    }

    // --- Read-only views ---

    pub fn exercises(&self) -> &[Exercise] {
        self.store.exercises()
    }

    pub fn store(&self) -> &ExerciseStore<P> {
        &self.store
    }

    pub fn edit_session(&self) -> &EditSession {
        &self.session
    }

    pub fn get_exercise(&self, id: &str) -> Option<&Exercise> {
        self.store.get(id)
    }

    /// Finds an exercise by exact id, then by case-insensitive name.
    pub fn resolve_exercise_identifier(&self, identifier: &str) -> Option<&Exercise> {
        let trimmed = identifier.trim();
        self.store.get(trimmed).or_else(|| {
            self.exercises()
                .iter()
                .find(|e| e.name.eq_ignore_ascii_case(trimmed))
        })
    }

    pub fn subscribe(&mut self, callback: StoreCallback) -> SubscriptionId {
        self.store.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    // --- Mutations ---

    /// # Errors
    /// Returns `ValidationError` if the draft breaks a record invariant.
    pub fn add_exercise(&mut self, draft: ExerciseDraft) -> Result<Exercise, ValidationError> {
        self.store.add(draft)
    }

    /// Commits `record` directly and closes any edit session.
    /// Returns `false` if no exercise has the record's id.
    /// # Errors
    /// Returns `ValidationError` if the record breaks a record invariant.
    pub fn update_exercise(&mut self, record: Exercise) -> Result<bool, ValidationError> {
        let found = self.store.update(record)?;
        self.session.cancel();
        Ok(found)
    }

    /// Removes an exercise; an edit of that exercise is abandoned.
    pub fn remove_exercise(&mut self, id: &str) -> Option<Exercise> {
        let removed = self.store.remove(id)?;
        if self.session.editing_id() == Some(id) {
            self.session.cancel();
        }
        Some(removed)
    }

    pub fn reorder_exercises(&mut self, from: usize, to: usize) -> bool {
        self.store.reorder(from, to)
    }

    // --- Edit session ---

    /// Opens an edit on `id`. Returns `false` if there is no such exercise.
    pub fn edit_exercise(&mut self, id: &str) -> bool {
        match self.store.get(id) {
            Some(record) => {
                self.session.begin(record);
                true
            }
            None => false,
        }
    }

    pub fn edit_draft_mut(&mut self) -> Option<&mut ExerciseDraft> {
        self.session.draft_mut()
    }

    /// # Errors
    /// See `EditSession::save`.
    pub fn save_edit(&mut self) -> Result<bool, SessionError> {
        self.session.save(&mut self.store)
    }

    pub fn cancel_edit(&mut self) {
        self.session.cancel();
    }
}
