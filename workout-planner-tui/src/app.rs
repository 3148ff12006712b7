// workout-planner-tui/src/app.rs
mod actions;
mod form;
mod navigation_helpers;
pub mod state;

pub use state::{ActiveModal, App, ExerciseForm, FormField, FormMode};
