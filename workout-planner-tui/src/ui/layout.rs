// workout-planner-tui/src/ui/layout.rs
use crate::{
    app::{ActiveModal, App},
    ui::{exercise_list::render_exercise_list, modals::render_modal, status_bar::render_status_bar},
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Style, Stylize},
    widgets::Paragraph,
    Frame,
};

pub fn render_ui(f: &mut Frame, app: &mut App) {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Min(0),    // Exercise list
            Constraint::Length(1), // Status bar
        ])
        .split(f.size());

    let title = Paragraph::new(format!(
        " Workout Planner ({} exercises)",
        app.service.exercises().len()
    ))
    .style(Style::new().bold());
    f.render_widget(title, main_chunks[0]);

    render_exercise_list(f, app, main_chunks[1]);
    render_status_bar(f, app, main_chunks[2]);

    if app.active_modal != ActiveModal::None {
        render_modal(f, app);
    }
}

/// Rectangle of the given size centered in `r`, shrunk to fit.
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_rect_is_centered_and_clamped() {
        let outer = Rect::new(0, 0, 100, 40);
        assert_eq!(centered_rect_fixed(50, 10, outer), Rect::new(25, 15, 50, 10));
        assert_eq!(centered_rect_fixed(200, 80, outer), outer);
    }
}
