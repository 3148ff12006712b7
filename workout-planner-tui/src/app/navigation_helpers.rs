// workout-planner-tui/src/app/navigation_helpers.rs
use ratatui::widgets::ListState;

/// Moves the selection down one row, wrapping to the top.
pub fn list_next(state: &mut ListState, list_len: usize) {
    if list_len == 0 {
        return;
    }
    let i = match state.selected() {
        Some(i) if i + 1 >= list_len => 0,
        Some(i) => i + 1,
        None => 0,
    };
    state.select(Some(i));
}

/// Moves the selection up one row, wrapping to the bottom.
pub fn list_previous(state: &mut ListState, list_len: usize) {
    if list_len == 0 {
        return;
    }
    let i = match state.selected() {
        Some(0) | None => list_len - 1,
        Some(i) => i - 1,
    };
    state.select(Some(i));
}

/// Adds `delta` to a numeric text input, never going below 1.
/// Non-numeric or empty input starts from 1.
pub fn step_count_input(input: &mut String, delta: i64) {
    let current = input.trim().parse::<i64>().unwrap_or(0);
    let next = if current < 1 { 1 } else { (current + delta).max(1) };
    *input = next.min(i64::from(u32::MAX)).to_string();
}
