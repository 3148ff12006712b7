mod exercise_list;
mod layout;
mod modals;
mod status_bar;

pub use layout::render_ui;
