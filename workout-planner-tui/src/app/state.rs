// workout-planner-tui/src/app/state.rs
use ratatui::widgets::ListState;
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};
use workout_planner_lib::{AppService, ExerciseDraft, ExerciseId, SubscriptionId};

const ERROR_DISPLAY_TIME: Duration = Duration::from_secs(5);

// Focusable parts of the exercise form, in tab order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    Name,
    Sets,
    Reps,
    Duration,
    Confirm,
    Cancel,
}

impl FormField {
    pub const fn next(self) -> Self {
        match self {
            Self::Name => Self::Sets,
            Self::Sets => Self::Reps,
            Self::Reps => Self::Duration,
            Self::Duration => Self::Confirm,
            Self::Confirm => Self::Cancel,
            Self::Cancel => Self::Name,
        }
    }

    pub const fn previous(self) -> Self {
        match self {
            Self::Name => Self::Cancel,
            Self::Sets => Self::Name,
            Self::Reps => Self::Sets,
            Self::Duration => Self::Reps,
            Self::Confirm => Self::Duration,
            Self::Cancel => Self::Confirm,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormMode {
    Add,
    /// Editing through the service's edit session
    Edit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExerciseForm {
    pub mode: FormMode,
    pub name_input: String,
    pub sets_input: String,
    pub reps_input: String,
    pub duration_input: String,
    pub focused_field: FormField,
    pub error_message: Option<String>,
}

impl ExerciseForm {
    pub fn blank() -> Self {
        Self {
            mode: FormMode::Add,
            name_input: String::new(),
            sets_input: String::new(),
            reps_input: String::new(),
            duration_input: String::new(),
            focused_field: FormField::Name,
            error_message: None,
        }
    }

    pub fn for_edit(draft: &ExerciseDraft) -> Self {
        Self {
            mode: FormMode::Edit,
            name_input: draft.name.clone(),
            sets_input: draft.sets.to_string(),
            reps_input: draft.reps.to_string(),
            duration_input: draft.duration.map(|d| d.to_string()).unwrap_or_default(),
            focused_field: FormField::Name,
            error_message: None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Add => "Add Exercise",
            FormMode::Edit => "Edit Exercise",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActiveModal {
    None,
    Help,
    Form(ExerciseForm),
    ConfirmDelete {
        exercise_id: ExerciseId,
        exercise_name: String,
    },
}

pub struct App {
    pub service: AppService,
    pub should_quit: bool,
    pub active_modal: ActiveModal,
    pub list_state: ListState,
    /// Index of the row picked up with Space; moving the selection drags it.
    pub grabbed: Option<usize>,
    pub last_error: Option<String>, // Shown in the status bar
    error_clear_time: Option<Instant>,
    // Shared with the store subscription, which sets it on every change
    redraw: Rc<Cell<bool>>,
    subscription: SubscriptionId, // Released in shutdown
}

impl App {
    pub fn new(mut service: AppService) -> Self {
        let redraw = Rc::new(Cell::new(true));
        let flag = Rc::clone(&redraw);
        let subscription = service.subscribe(Box::new(move |event, exercises| {
            tracing::debug!(?event, count = exercises.len(), "Store changed");
            flag.set(true);
        }));

        let mut list_state = ListState::default();
        if !service.exercises().is_empty() {
            list_state.select(Some(0));
        }

        Self {
            service,
            should_quit: false,
            active_modal: ActiveModal::None,
            list_state,
            grabbed: None,
            last_error: None,
            error_clear_time: None,
            redraw,
            subscription,
        }
    }

    pub fn set_error(&mut self, msg: String) {
        tracing::debug!(%msg, "Status bar error");
        self.last_error = Some(msg);
        self.error_clear_time = Some(Instant::now() + ERROR_DISPLAY_TIME);
        self.mark_dirty();
    }

    pub(crate) fn clear_expired_error(&mut self) {
        if let Some(clear_time) = self.error_clear_time {
            if Instant::now() >= clear_time {
                self.last_error = None;
                self.error_clear_time = None;
                self.mark_dirty();
            }
        }
    }

    pub fn mark_dirty(&self) {
        self.redraw.set(true);
    }

    /// True once after any store change or UI state change.
    pub fn take_redraw(&self) -> bool {
        self.redraw.replace(false)
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.list_state
            .selected()
            .filter(|i| *i < self.service.exercises().len())
    }

    /// Keeps the selection on a real row after the list shrinks or grows.
    pub fn clamp_selection(&mut self) {
        let len = self.service.exercises().len();
        let selected = match self.list_state.selected() {
            _ if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => Some(0),
        };
        self.list_state.select(selected);
    }

    pub fn shutdown(&mut self) {
        self.service.cancel_edit();
        self.service.unsubscribe(self.subscription);
    }
}
