// workout-planner-tui/src/app/actions.rs
use super::form::handle_form_input;
use super::navigation_helpers::{list_next, list_previous};
use super::state::{ActiveModal, App, ExerciseForm};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

impl App {
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        self.mark_dirty();

        if self.active_modal != ActiveModal::None {
            return self.handle_modal_input(key);
        }
        if self.grabbed.is_some() {
            self.handle_drag_input(key);
            return Ok(());
        }

        let len = self.service.exercises().len();
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.active_modal = ActiveModal::Help,
            KeyCode::Char('j') | KeyCode::Down => list_next(&mut self.list_state, len),
            KeyCode::Char('k') | KeyCode::Up => list_previous(&mut self.list_state, len),
            KeyCode::Char('a') => self.active_modal = ActiveModal::Form(ExerciseForm::blank()),
            KeyCode::Char('e') | KeyCode::Enter => self.open_edit_form(),
            KeyCode::Char('d') | KeyCode::Delete => self.open_delete_confirmation(),
            KeyCode::Char(' ') => {
                if let Some(index) = self.selected_index() {
                    self.grabbed = Some(index);
                }
            }
            _ => {}
        }
        Ok(())
    }

    // While a row is grabbed every step is one reorder, like a drag passing over rows
    fn handle_drag_input(&mut self, key: KeyEvent) {
        let Some(from) = self.grabbed else {
            return;
        };
        let last = self.service.exercises().len().saturating_sub(1);
        let to = match key.code {
            KeyCode::Char('j') | KeyCode::Down => (from + 1).min(last),
            KeyCode::Char('k') | KeyCode::Up => from.saturating_sub(1),
            KeyCode::Char('g') | KeyCode::Home => 0,
            KeyCode::Char('G') | KeyCode::End => last,
            KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Esc => {
                self.grabbed = None;
                return;
            }
            _ => return,
        };
        if self.service.reorder_exercises(from, to) {
            self.grabbed = Some(to);
            self.list_state.select(Some(to));
        }
    }

    fn open_edit_form(&mut self) {
        let Some(id) = self
            .selected_index()
            .map(|i| self.service.exercises()[i].id.clone())
        else {
            return;
        };
        if !self.service.edit_exercise(&id) {
            self.set_error(format!("Exercise {id} no longer exists"));
            return;
        }
        if let Some(draft) = self.service.edit_session().draft() {
            self.active_modal = ActiveModal::Form(ExerciseForm::for_edit(draft));
        }
    }

    fn open_delete_confirmation(&mut self) {
        if let Some(exercise) = self
            .selected_index()
            .and_then(|i| self.service.exercises().get(i))
        {
            self.active_modal = ActiveModal::ConfirmDelete {
                exercise_id: exercise.id.clone(),
                exercise_name: exercise.name.clone(),
            };
        }
    }

    fn handle_modal_input(&mut self, key: KeyEvent) -> Result<()> {
        match &self.active_modal {
            ActiveModal::None => {}
            ActiveModal::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?')) {
                    self.active_modal = ActiveModal::None;
                }
            }
            ActiveModal::Form(_) => handle_form_input(self, key),
            ActiveModal::ConfirmDelete { exercise_id, .. } => match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    let id = exercise_id.clone();
                    self.active_modal = ActiveModal::None;
                    if self.service.remove_exercise(&id).is_none() {
                        self.set_error("Exercise was already deleted".to_string());
                    }
                    self.clamp_selection();
                }
                KeyCode::Char('n') | KeyCode::Esc => self.active_modal = ActiveModal::None,
                _ => {}
            },
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use crate::app::state::{ActiveModal, App};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tempfile::TempDir;
    use workout_planner_lib::{AppService, Config, ExerciseDraft, FileSlot};

    pub(crate) fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    pub(crate) fn test_app(dir: &std::path::Path, names: &[&str]) -> App {
        let mut service = AppService::with_persistence(
            Config::default(),
            dir.join("config.toml"),
            FileSlot::new(dir.join("slot.json")),
        );
        for name in names {
            service
                .add_exercise(ExerciseDraft::new(*name, 3, 10))
                .unwrap();
        }
        App::new(service)
    }

    fn names(app: &App) -> Vec<&str> {
        app.service
            .exercises()
            .iter()
            .map(|e| e.name.as_str())
            .collect()
    }

    #[test]
    fn grab_and_move_reorders_step_by_step() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(dir.path(), &["A", "B", "C"]);

        app.handle_key_event(key(KeyCode::Char(' '))).unwrap();
        assert_eq!(app.grabbed, Some(0));
        app.handle_key_event(key(KeyCode::Down)).unwrap();
        assert_eq!(names(&app), ["B", "A", "C"]);
        app.handle_key_event(key(KeyCode::Down)).unwrap();
        app.handle_key_event(key(KeyCode::Down)).unwrap();
        assert_eq!(names(&app), ["B", "C", "A"]);
        assert_eq!(app.list_state.selected(), Some(2));

        app.handle_key_event(key(KeyCode::Char('g'))).unwrap();
        assert_eq!(names(&app), ["A", "B", "C"]);
        app.handle_key_event(key(KeyCode::Char(' '))).unwrap();
        assert_eq!(app.grabbed, None);

        // Not grabbed: navigation only
        app.handle_key_event(key(KeyCode::Down)).unwrap();
        assert_eq!(names(&app), ["A", "B", "C"]);
        assert_eq!(app.list_state.selected(), Some(1));
    }

    #[test]
    fn delete_requires_confirmation() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(dir.path(), &["A", "B"]);
        app.list_state.select(Some(1));

        app.handle_key_event(key(KeyCode::Char('d'))).unwrap();
        assert!(matches!(app.active_modal, ActiveModal::ConfirmDelete { .. }));
        app.handle_key_event(key(KeyCode::Char('n'))).unwrap();
        assert_eq!(names(&app), ["A", "B"]);

        app.handle_key_event(key(KeyCode::Char('d'))).unwrap();
        app.handle_key_event(key(KeyCode::Char('y'))).unwrap();
        assert_eq!(names(&app), ["A"]);
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[test]
    fn store_changes_request_a_redraw() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(dir.path(), &["A", "B"]);
        assert!(app.take_redraw());
        assert!(!app.take_redraw());
        app.service.reorder_exercises(0, 1);
        assert!(app.take_redraw());
    }
}
