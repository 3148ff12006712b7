// workout-planner-lib/src/store.rs
use crate::exercise::{Exercise, ExerciseDraft, ExerciseId, ValidationError};
use crate::persistence::Persistence;
use chrono::Utc;
use std::fmt;
use tracing::{debug, warn};

/// What changed in the store. Sent to subscribers after the write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Added(ExerciseId),
    Updated(ExerciseId),
    Removed(ExerciseId),
    Reordered { from: usize, to: usize },
}

/// Callback for change notifications. Receives the collection as it is after the change.
pub type StoreCallback = Box<dyn FnMut(&StoreEvent, &[Exercise])>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Ordered collection of exercises, kept in sync with a durable slot.
///
/// Every successful mutation writes the whole collection and then notifies
/// subscribers. Mutations that change nothing (unknown id, reorder onto the
/// same position) neither write nor notify.
pub struct ExerciseStore<P: Persistence> {
    exercises: Vec<Exercise>,
    persistence: P,
    subscribers: Vec<(SubscriptionId, StoreCallback)>,
    next_subscription: u64,
    last_id: i64,
}

impl<P: Persistence> ExerciseStore<P> {
    /// Loads the collection from `persistence`.
    pub fn new(persistence: P) -> Self {
        let exercises = persistence.load();
        // Numeric ids are creation timestamps; never hand out one at or below them
        let last_id = exercises
            .iter()
            .filter_map(|e| e.id.parse::<i64>().ok())
            .max()
            .unwrap_or(0);
        debug!(
            slot = %persistence.location(),
            count = exercises.len(),
            "Loaded exercises"
        );
        Self {
            exercises,
            persistence,
            subscribers: Vec::new(),
            next_subscription: 0,
            last_id,
        }
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.exercises.iter().position(|e| e.id == id)
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Appends a new exercise with a fresh id.
    /// # Errors
    /// Returns `ValidationError` if the draft breaks a record invariant.
    pub fn add(&mut self, draft: ExerciseDraft) -> Result<Exercise, ValidationError> {
        draft.validate()?;
        let id = self.next_id();
        let exercise = draft.into_exercise(id.clone());
        self.exercises.push(exercise.clone());
        debug!(%id, name = %exercise.name, "Added exercise");
        self.commit(StoreEvent::Added(id));
        Ok(exercise)
    }

    /// Replaces the fields of the exercise with the same id, keeping its position.
    /// Returns `false` (and changes nothing) if no exercise has that id.
    /// # Errors
    /// Returns `ValidationError` if the record breaks a record invariant.
    pub fn update(&mut self, record: Exercise) -> Result<bool, ValidationError> {
        record.validate()?;
        let Some(slot) = self.exercises.iter_mut().find(|e| e.id == record.id) else {
            debug!(id = %record.id, "Update ignored, no exercise with that id");
            return Ok(false);
        };
        let id = record.id.clone();
        *slot = Exercise {
            name: record.name.trim().to_string(),
            ..record
        };
        self.commit(StoreEvent::Updated(id));
        Ok(true)
    }

    /// Removes the exercise with `id`, closing the gap. `None` if there was none.
    pub fn remove(&mut self, id: &str) -> Option<Exercise> {
        let index = self.position(id)?;
        let removed = self.exercises.remove(index);
        debug!(%id, index, "Removed exercise");
        self.commit(StoreEvent::Removed(removed.id.clone()));
        Some(removed)
    }

    /// Moves the exercise at `from` so it ends up at `to`.
    ///
    /// `to` is an index into the list *after* the element has been taken
    /// out, so `reorder(0, 2)` on `[A, B, C]` gives `[B, C, A]`. Both indices
    /// are clamped to the last position. Returns whether the order changed.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let Some(last) = self.exercises.len().checked_sub(1) else {
            return false;
        };
        // Out-of-range indices pin to the last row; `to` counts after removal
        let (from, to) = (from.min(last), to.min(last));
        if from == to {
            return false;
        }
        let moved = self.exercises.remove(from);
        self.exercises.insert(to, moved);
        debug!(from, to, "Reordered exercises");
        self.commit(StoreEvent::Reordered { from, to });
        true
    }

    pub fn subscribe(&mut self, callback: StoreCallback) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, callback));
        id
    }

    /// Returns `false` if the subscription was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    fn next_id(&mut self) -> ExerciseId {
        let now = Utc::now().timestamp_millis();
        let mut candidate = self.last_id.checked_add(1).map(|next| now.max(next));
        while let Some(id) = candidate {
            // Loaded ids need not be numeric, so still check the collection
            if !self.is_taken(&id.to_string()) {
                self.last_id = id;
                return id.to_string();
            }
            candidate = id.checked_add(1);
        }
        // A loaded id sits at i64::MAX, so no larger numeric id exists
        let mut suffix: u64 = 1;
        loop {
            let id = format!("{now}-{suffix}");
            if !self.is_taken(&id) {
                return id;
            }
            suffix += 1;
        }
    }

    fn is_taken(&self, id: &str) -> bool {
        self.exercises.iter().any(|e| e.id == id)
    }

    fn commit(&mut self, event: StoreEvent) {
        if let Err(e) = self.persistence.save(&self.exercises) {
            // In-memory state stays authoritative for this session
            warn!(
                slot = %self.persistence.location(),
                error = %e,
                "Failed to persist exercises"
            );
        }
        for (_, callback) in &mut self.subscribers {
            callback(&event, &self.exercises);
        }
    }
}

impl<P: Persistence> fmt::Debug for ExerciseStore<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExerciseStore")
            .field("exercises", &self.exercises)
            .field("slot", &self.persistence.location())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{decode, MemorySlot};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn store_with(names: &[&str]) -> ExerciseStore<MemorySlot> {
        let mut store = ExerciseStore::new(MemorySlot::new());
        for name in names {
            store.add(ExerciseDraft::new(*name, 3, 10)).unwrap();
        }
        store
    }

    fn names<P: Persistence>(store: &ExerciseStore<P>) -> Vec<&str> {
        store.exercises().iter().map(|e| e.name.as_str()).collect()
    }

    fn persisted_names(store: &ExerciseStore<MemorySlot>) -> Vec<String> {
        decode(store.persistence().contents().unwrap_or_default())
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect()
    }

    #[test]
    fn add_appends_with_unique_ids() {
        let store = store_with(&["A", "B", "C", "D", "E"]);
        assert_eq!(names(&store), ["A", "B", "C", "D", "E"]);
        let mut ids: Vec<_> = store.exercises().iter().map(|e| e.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
        assert_eq!(store.persistence().write_count(), 5);
    }

    #[test]
    fn add_rejects_invalid_draft_without_writing() {
        let mut store = store_with(&[]);
        assert_eq!(
            store.add(ExerciseDraft::new("   ", 3, 10)),
            Err(ValidationError::EmptyName)
        );
        assert!(store.is_empty());
        assert_eq!(store.persistence().write_count(), 0);
    }

    #[test]
    fn ids_do_not_collide_with_loaded_ids() {
        let future = Utc::now().timestamp_millis() + 60_000;
        let slot = MemorySlot::with_text(format!(
            r#"[{{"id":"{future}","name":"Squat","sets":3,"reps":10}}]"#
        ));
        let mut store = ExerciseStore::new(slot);
        let added = store.add(ExerciseDraft::new("Row", 3, 10)).unwrap();
        assert_eq!(added.id, (future + 1).to_string());
    }

    #[test]
    fn ids_stay_unique_past_the_largest_numeric_id() {
        let slot = MemorySlot::with_text(format!(
            r#"[{{"id":"{}","name":"Squat","sets":3,"reps":10}}]"#,
            i64::MAX
        ));
        let mut store = ExerciseStore::new(slot);
        let first = store.add(ExerciseDraft::new("Row", 3, 10)).unwrap();
        let second = store.add(ExerciseDraft::new("Lunge", 3, 12)).unwrap();

        assert_ne!(first.id, i64::MAX.to_string());
        assert_ne!(first.id, second.id);
        assert_eq!(store.len(), 3);
        // The persisted collection must still load with its duplicate-id check
        let reloaded = decode(store.persistence().contents().unwrap()).unwrap();
        assert_eq!(reloaded.len(), 3);
    }

    #[test]
    fn reorder_first_to_last() {
        let mut store = store_with(&["A", "B", "C"]);
        assert!(store.reorder(0, 2));
        assert_eq!(names(&store), ["B", "C", "A"]);
        assert_eq!(persisted_names(&store), ["B", "C", "A"]);
    }

    #[test]
    fn reorder_last_to_first() {
        let mut store = store_with(&["A", "B", "C"]);
        assert!(store.reorder(2, 0));
        assert_eq!(names(&store), ["C", "A", "B"]);
    }

    #[test]
    fn reorder_adjacent_both_directions() {
        let mut store = store_with(&["A", "B", "C", "D"]);
        assert!(store.reorder(1, 2));
        assert_eq!(names(&store), ["A", "C", "B", "D"]);
        assert!(store.reorder(2, 1));
        assert_eq!(names(&store), ["A", "B", "C", "D"]);
    }

    #[test]
    fn reorder_then_inverse_restores_order() {
        for (i, j) in [(0, 3), (3, 0), (1, 3), (2, 0), (0, 1)] {
            let mut store = store_with(&["A", "B", "C", "D"]);
            store.reorder(i, j);
            store.reorder(j, i);
            assert_eq!(names(&store), ["A", "B", "C", "D"], "reorder({i}, {j})");
        }
    }

    #[test]
    fn reorder_clamps_out_of_range_indices() {
        let mut store = store_with(&["A", "B", "C"]);
        assert!(store.reorder(10, 0));
        assert_eq!(names(&store), ["C", "A", "B"]);
        assert!(store.reorder(0, 99));
        assert_eq!(names(&store), ["A", "B", "C"]);
        // Both clamp to the last index
        assert!(!store.reorder(5, 7));
    }

    #[test]
    fn reorder_noop_does_not_write() {
        let mut store = store_with(&["A", "B"]);
        let writes = store.persistence().write_count();
        assert!(!store.reorder(1, 1));
        assert_eq!(store.persistence().write_count(), writes);

        let mut empty = store_with(&[]);
        assert!(!empty.reorder(0, 3));
        assert_eq!(empty.persistence().write_count(), 0);
    }

    #[test]
    fn update_keeps_position_and_id() {
        let mut store = store_with(&["A", "B", "C"]);
        let mut b = store.exercises()[1].clone();
        b.name = " Bench ".to_string();
        b.sets = 5;
        b.duration = Some(30);
        assert_eq!(store.update(b.clone()), Ok(true));
        assert_eq!(names(&store), ["A", "Bench", "C"]);
        assert_eq!(store.exercises()[1].id, b.id);
        assert_eq!(store.exercises()[1].sets, 5);
        assert_eq!(store.exercises()[1].duration, Some(30));
    }

    #[test]
    fn update_unknown_id_is_noop() {
        let mut store = store_with(&["A", "B"]);
        let before = store.exercises().to_vec();
        let writes = store.persistence().write_count();
        let ghost = ExerciseDraft::new("Ghost", 1, 1).into_exercise("nope".into());
        assert_eq!(store.update(ghost), Ok(false));
        assert_eq!(store.exercises(), before.as_slice());
        assert_eq!(store.persistence().write_count(), writes);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut store = store_with(&["A", "B"]);
        let a_id = store.exercises()[0].id.clone();
        assert_eq!(store.remove(&a_id).map(|e| e.name), Some("A".to_string()));
        let after_first = store.exercises().to_vec();
        assert!(store.remove(&a_id).is_none());
        assert_eq!(store.exercises(), after_first.as_slice());
        assert_eq!(persisted_names(&store), ["B"]);
    }

    #[test]
    fn failed_write_keeps_memory_state() {
        let mut store = store_with(&["A"]);
        let mut slot = store.persistence().clone();
        slot.set_fail_writes(true);
        let mut store_failing = ExerciseStore::new(slot);
        store_failing
            .add(ExerciseDraft::new("B", 1, 1))
            .expect("add succeeds even when the write fails");
        assert_eq!(names(&store_failing), ["A", "B"]);
        assert_eq!(persisted_names(&store_failing), ["A"]);

        // The original store is unaffected
        store.add(ExerciseDraft::new("C", 1, 1)).unwrap();
        assert_eq!(persisted_names(&store), ["A", "C"]);
    }

    #[test]
    fn subscribers_see_each_successful_mutation_once() {
        let mut store = store_with(&["A", "B"]);
        let events: Rc<RefCell<Vec<(StoreEvent, usize)>>> = Rc::default();
        let sink = Rc::clone(&events);
        let sub = store.subscribe(Box::new(move |event, exercises| {
            sink.borrow_mut().push((event.clone(), exercises.len()));
        }));

        let c = store.add(ExerciseDraft::new("C", 1, 1)).unwrap();
        store.reorder(2, 0);
        store.reorder(1, 1);
        store.remove("missing");
        store.remove(&c.id);

        assert_eq!(
            *events.borrow(),
            vec![
                (StoreEvent::Added(c.id.clone()), 3),
                (StoreEvent::Reordered { from: 2, to: 0 }, 3),
                (StoreEvent::Removed(c.id.clone()), 2),
            ]
        );

        assert!(store.unsubscribe(sub));
        assert!(!store.unsubscribe(sub));
        store.add(ExerciseDraft::new("D", 1, 1)).unwrap();
        assert_eq!(events.borrow().len(), 3);
    }
}
