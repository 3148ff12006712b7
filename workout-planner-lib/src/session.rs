// workout-planner-lib/src/session.rs
use crate::exercise::{Exercise, ExerciseDraft, ExerciseId, ValidationError};
use crate::persistence::Persistence;
use crate::store::ExerciseStore;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("No exercise is being edited.")]
    NotEditing,
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Editing {
        id: ExerciseId,
        draft: ExerciseDraft,
    },
}

/// Tracks the single exercise being edited, if any, and its uncommitted draft.
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    state: SessionState,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, SessionState::Editing { .. })
    }

    pub fn editing_id(&self) -> Option<&str> {
        match &self.state {
            SessionState::Editing { id, .. } => Some(id),
            SessionState::Idle => None,
        }
    }

    pub fn draft(&self) -> Option<&ExerciseDraft> {
        match &self.state {
            SessionState::Editing { draft, .. } => Some(draft),
            SessionState::Idle => None,
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut ExerciseDraft> {
        match &mut self.state {
            SessionState::Editing { draft, .. } => Some(draft),
            SessionState::Idle => None,
        }
    }

    /// Starts editing `record`, dropping any edit already in progress.
    pub fn begin(&mut self, record: &Exercise) {
        if let Some(previous) = self.editing_id() {
            if previous != record.id {
                debug!(%previous, next = %record.id, "Abandoning unsaved edit");
            }
        }
        self.state = SessionState::Editing {
            id: record.id.clone(),
            draft: record.draft(),
        };
    }

    pub fn cancel(&mut self) {
        self.state = SessionState::Idle;
    }

    /// Validates the draft and commits it to `store`, then returns to idle.
    /// Returns whether the store still had the edited exercise.
    /// # Errors
    /// - `SessionError::NotEditing` when idle.
    /// - `SessionError::Invalid` when the draft fails validation; the session stays open.
    pub fn save<P: Persistence>(
        &mut self,
        store: &mut ExerciseStore<P>,
    ) -> Result<bool, SessionError> {
        let SessionState::Editing { id, draft } = &self.state else {
            return Err(SessionError::NotEditing);
        };
        draft.validate()?;
        let record = draft.clone().into_exercise(id.clone());
        let found = store.update(record)?;
        self.state = SessionState::Idle;
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise::Field;
    use crate::persistence::MemorySlot;

    fn store_abc() -> ExerciseStore<MemorySlot> {
        let mut store = ExerciseStore::new(MemorySlot::new());
        for name in ["A", "B", "C"] {
            store.add(ExerciseDraft::new(name, 3, 10)).unwrap();
        }
        store
    }

    #[test]
    fn begin_copies_committed_values() {
        let store = store_abc();
        let mut session = EditSession::new();
        session.begin(&store.exercises()[1]);
        assert_eq!(session.editing_id(), Some(store.exercises()[1].id.as_str()));
        assert_eq!(session.draft(), Some(&ExerciseDraft::new("B", 3, 10)));
    }

    #[test]
    fn draft_changes_do_not_touch_store_until_saved() {
        let mut store = store_abc();
        let mut session = EditSession::new();
        session.begin(&store.exercises()[1]);
        session.draft_mut().unwrap().sets = 5;
        assert_eq!(store.exercises()[1].sets, 3);

        assert_eq!(session.save(&mut store), Ok(true));
        assert_eq!(store.exercises()[1].sets, 5);
        assert_eq!(store.exercises()[1].name, "B");
        assert_eq!(*session.state(), SessionState::Idle);
    }

    #[test]
    fn cancel_discards_draft() {
        let mut store = store_abc();
        let writes = store.persistence().write_count();
        let mut session = EditSession::new();
        session.begin(&store.exercises()[0]);
        session.draft_mut().unwrap().name = "Changed".to_string();
        session.cancel();
        assert!(!session.is_editing());
        assert_eq!(store.exercises()[0].name, "A");
        assert_eq!(store.persistence().write_count(), writes);
        assert_eq!(session.save(&mut store), Err(SessionError::NotEditing));
    }

    #[test]
    fn begin_replaces_previous_target() {
        let mut store = store_abc();
        let mut session = EditSession::new();
        session.begin(&store.exercises()[0]);
        session.draft_mut().unwrap().reps = 99;
        session.begin(&store.exercises()[2]);
        assert_eq!(session.editing_id(), Some(store.exercises()[2].id.as_str()));
        assert_eq!(session.draft().unwrap().reps, 10);

        session.save(&mut store).unwrap();
        assert!(store.exercises().iter().all(|e| e.reps == 10));
    }

    #[test]
    fn invalid_draft_keeps_session_open() {
        let mut store = store_abc();
        let mut session = EditSession::new();
        session.begin(&store.exercises()[0]);
        session.draft_mut().unwrap().reps = 0;
        assert_eq!(
            session.save(&mut store),
            Err(SessionError::Invalid(ValidationError::NotPositive(
                Field::Reps
            )))
        );
        assert!(session.is_editing());
        assert_eq!(store.exercises()[0].reps, 10);
    }

    #[test]
    fn saving_a_removed_record_is_a_quiet_noop() {
        let mut store = store_abc();
        let mut session = EditSession::new();
        let a = store.exercises()[0].clone();
        session.begin(&a);
        store.remove(&a.id);
        assert_eq!(session.save(&mut store), Ok(false));
        assert_eq!(store.len(), 2);
        assert!(!session.is_editing());
    }
}
