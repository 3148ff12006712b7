// workout-planner-tui/src/app/form.rs
use super::navigation_helpers::step_count_input;
use super::state::{ActiveModal, App, ExerciseForm, FormField, FormMode};
use crossterm::event::{KeyCode, KeyEvent};
use workout_planner_lib::{ExerciseDraft, SessionError};

enum FormOutcome {
    Stay,
    Submit,
    Close,
}

pub fn handle_form_input(app: &mut App, key: KeyEvent) {
    let ActiveModal::Form(ref mut form) = app.active_modal else {
        return;
    };
    form.error_message = None;

    let outcome = match key.code {
        KeyCode::Esc => FormOutcome::Close,
        KeyCode::Tab => {
            form.focused_field = form.focused_field.next();
            FormOutcome::Stay
        }
        KeyCode::BackTab => {
            form.focused_field = form.focused_field.previous();
            FormOutcome::Stay
        }
        _ => edit_focused_field(form, key.code),
    };

    match outcome {
        FormOutcome::Stay => {}
        FormOutcome::Close => close_form(app),
        FormOutcome::Submit => submit_form(app),
    }
}

fn edit_focused_field(form: &mut ExerciseForm, code: KeyCode) -> FormOutcome {
    let field = form.focused_field;
    let count_input = match field {
        FormField::Sets => Some(&mut form.sets_input),
        FormField::Reps => Some(&mut form.reps_input),
        FormField::Duration => Some(&mut form.duration_input),
        FormField::Name | FormField::Confirm | FormField::Cancel => None,
    };

    match (field, code) {
        (FormField::Confirm, KeyCode::Enter) => return FormOutcome::Submit,
        (FormField::Cancel, KeyCode::Enter) => return FormOutcome::Close,
        (FormField::Name, KeyCode::Char(c)) => form.name_input.push(c),
        (FormField::Name, KeyCode::Backspace) => {
            form.name_input.pop();
        }
        (_, KeyCode::Enter) => form.focused_field = field.next(),
        (FormField::Sets | FormField::Reps | FormField::Duration, _) => {
            if let Some(input) = count_input {
                match code {
                    KeyCode::Char(c) if c.is_ascii_digit() => input.push(c),
                    KeyCode::Backspace => {
                        input.pop();
                    }
                    KeyCode::Up => step_count_input(input, 1),
                    KeyCode::Down => step_count_input(input, -1),
                    _ => {}
                }
            }
        }
        (_, KeyCode::Up) => form.focused_field = field.previous(),
        (_, KeyCode::Down) => form.focused_field = field.next(),
        _ => {}
    }
    FormOutcome::Stay
}

fn close_form(app: &mut App) {
    if let ActiveModal::Form(form) = &app.active_modal {
        if form.mode == FormMode::Edit {
            app.service.cancel_edit();
        }
    }
    app.active_modal = ActiveModal::None;
}

fn submit_form(app: &mut App) {
    let ActiveModal::Form(ref form) = app.active_modal else {
        return;
    };
    let parsed = ExerciseDraft::parse(
        &form.name_input,
        &form.sets_input,
        &form.reps_input,
        &form.duration_input,
    );
    let mode = form.mode;

    let result = parsed.map_err(SessionError::from).and_then(|draft| match mode {
        FormMode::Add => app
            .service
            .add_exercise(draft)
            .map(|added| app.service.store().position(&added.id))
            .map_err(SessionError::from),
        FormMode::Edit => {
            if let Some(session_draft) = app.service.edit_draft_mut() {
                *session_draft = draft;
            }
            app.service.save_edit().map(|_| None)
        }
    });

    match result {
        Ok(new_position) => {
            app.active_modal = ActiveModal::None;
            if let Some(index) = new_position {
                app.list_state.select(Some(index));
            }
            app.clamp_selection();
        }
        Err(SessionError::NotEditing) => {
            app.active_modal = ActiveModal::None;
            app.set_error("Edit was interrupted; nothing saved".to_string());
        }
        Err(SessionError::Invalid(e)) => {
            if let ActiveModal::Form(ref mut form) = app.active_modal {
                form.error_message = Some(e.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::app::actions::tests::{key, test_app};
    use crate::app::state::{ActiveModal, FormField};
    use crossterm::event::KeyCode;
    use tempfile::TempDir;

    fn type_text(app: &mut crate::app::App, text: &str) {
        for c in text.chars() {
            app.handle_key_event(key(KeyCode::Char(c))).unwrap();
        }
    }

    #[test]
    fn add_form_appends_exercise() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(dir.path(), &["A"]);

        app.handle_key_event(key(KeyCode::Char('a'))).unwrap();
        type_text(&mut app, "Squat");
        app.handle_key_event(key(KeyCode::Tab)).unwrap();
        type_text(&mut app, "3");
        app.handle_key_event(key(KeyCode::Tab)).unwrap();
        type_text(&mut app, "1x0"); // non-digits are ignored
        app.handle_key_event(key(KeyCode::Tab)).unwrap();
        app.handle_key_event(key(KeyCode::Tab)).unwrap();
        app.handle_key_event(key(KeyCode::Enter)).unwrap();

        assert_eq!(app.active_modal, ActiveModal::None);
        let added = &app.service.exercises()[1];
        assert_eq!((added.name.as_str(), added.sets, added.reps), ("Squat", 3, 10));
        assert_eq!(added.duration, None);
        assert_eq!(app.list_state.selected(), Some(1));
    }

    #[test]
    fn invalid_form_shows_error_and_stays_open() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(dir.path(), &[]);

        app.handle_key_event(key(KeyCode::Char('a'))).unwrap();
        type_text(&mut app, "Plank");
        if let ActiveModal::Form(ref mut form) = app.active_modal {
            form.focused_field = FormField::Confirm;
        }
        app.handle_key_event(key(KeyCode::Enter)).unwrap();

        match &app.active_modal {
            ActiveModal::Form(form) => assert!(form.error_message.is_some()),
            other => panic!("expected form to stay open, got {other:?}"),
        }
        assert!(app.service.exercises().is_empty());
    }

    #[test]
    fn edit_form_saves_through_session() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(dir.path(), &["A", "B", "C"]);
        app.list_state.select(Some(1));

        app.handle_key_event(key(KeyCode::Char('e'))).unwrap();
        assert!(app.service.edit_session().is_editing());
        app.handle_key_event(key(KeyCode::Tab)).unwrap();
        app.handle_key_event(key(KeyCode::Backspace)).unwrap();
        type_text(&mut app, "5");
        if let ActiveModal::Form(ref mut form) = app.active_modal {
            form.focused_field = FormField::Confirm;
        }
        app.handle_key_event(key(KeyCode::Enter)).unwrap();

        assert!(!app.service.edit_session().is_editing());
        let b = &app.service.exercises()[1];
        assert_eq!((b.name.as_str(), b.sets), ("B", 5));
    }

    #[test]
    fn escape_cancels_edit_session() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(dir.path(), &["A"]);

        app.handle_key_event(key(KeyCode::Enter)).unwrap();
        type_text(&mut app, "XYZ");
        app.handle_key_event(key(KeyCode::Esc)).unwrap();

        assert_eq!(app.active_modal, ActiveModal::None);
        assert!(!app.service.edit_session().is_editing());
        assert_eq!(app.service.exercises()[0].name, "A");
    }
}
