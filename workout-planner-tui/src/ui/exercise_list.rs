// workout-planner-tui/src/ui/exercise_list.rs
use crate::app::App;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

const EMPTY_PLAN_MESSAGE: &str = "No exercises added yet. Start building your workout!";

pub fn render_exercise_list(f: &mut Frame, app: &mut App, area: Rect) {
    let dragging = app.grabbed.is_some();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(if dragging {
            "Exercises (moving: j/k to move, Space to drop)"
        } else {
            "Exercises"
        })
        .border_style(if dragging {
            Style::default().fg(Color::Magenta)
        } else {
            Style::default().fg(Color::Yellow)
        });

    if app.service.exercises().is_empty() {
        let empty = Paragraph::new(EMPTY_PLAN_MESSAGE)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let editing_id = app.service.edit_session().editing_id();
    let items: Vec<ListItem> = app
        .service
        .exercises()
        .iter()
        .enumerate()
        .map(|(index, exercise)| {
            let grip = if app.grabbed == Some(index) { "≡ " } else { "  " };
            let mut spans = vec![
                Span::styled(grip, Style::default().fg(Color::Magenta)),
                Span::styled(
                    exercise.name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {} sets x {} reps", exercise.sets, exercise.reps),
                    Style::default().fg(Color::Gray),
                ),
            ];
            if let Some(secs) = exercise.duration {
                spans.push(Span::styled(
                    format!(" ({secs} seconds)"),
                    Style::default().fg(Color::Gray),
                ));
            }
            if editing_id == Some(exercise.id.as_str()) {
                spans.push(Span::styled(" [editing]", Style::default().fg(Color::Cyan)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    f.render_stateful_widget(list, area, &mut app.list_state);
}
