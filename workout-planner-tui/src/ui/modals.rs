// workout-planner-tui/src/ui/modals.rs
use crate::{
    app::{ActiveModal, App, ExerciseForm, FormField},
    ui::layout::centered_rect_fixed,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn render_modal(f: &mut Frame, app: &App) {
    match &app.active_modal {
        ActiveModal::Help => render_help_modal(f),
        ActiveModal::Form(form) => render_form_modal(f, form),
        ActiveModal::ConfirmDelete { exercise_name, .. } => {
            render_confirm_delete_modal(f, exercise_name);
        }
        ActiveModal::None => {}
    }
}

fn render_help_modal(f: &mut Frame) {
    let block = Block::default()
        .title("Help (?)")
        .borders(Borders::ALL)
        .title_style(Style::new().bold())
        .border_style(Style::new().yellow());
    let area = centered_rect_fixed(60, 20, f.size());
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let help_text = vec![
        Line::from("--- List ---").style(Style::new().bold().underlined()),
        Line::from(" k / ↑, j / ↓: Select exercise"),
        Line::from(" a: Add exercise"),
        Line::from(" e / Enter: Edit selected exercise"),
        Line::from(" d / Delete: Delete selected exercise"),
        Line::from(" Space: Grab selected exercise to move it"),
        Line::from(""),
        Line::from("--- Moving ---").style(Style::new().bold().underlined()),
        Line::from(" k / ↑, j / ↓: Move one position"),
        Line::from(" g / Home, G / End: Move to top / bottom"),
        Line::from(" Space / Enter / Esc: Drop"),
        Line::from(""),
        Line::from(" q: Quit    ?: Show/Hide this help"),
        Line::from(""),
        Line::from(Span::styled(
            " Press Esc, ?, or Enter to close ",
            Style::new().italic().yellow(),
        )),
    ];

    let paragraph = Paragraph::new(help_text).wrap(Wrap { trim: false });
    f.render_widget(
        paragraph,
        area.inner(&Margin {
            vertical: 1,
            horizontal: 1,
        }),
    );
}

fn render_form_modal(f: &mut Frame, form: &ExerciseForm) {
    let block = Block::default()
        .title(form.title())
        .borders(Borders::ALL)
        .border_style(Style::new().yellow());
    let area = centered_rect_fixed(50, 16, f.size());
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Name label
            Constraint::Length(1), // Name input
            Constraint::Length(1), // Sets label
            Constraint::Length(1), // Sets input
            Constraint::Length(1), // Reps label
            Constraint::Length(1), // Reps input
            Constraint::Length(1), // Duration label
            Constraint::Length(1), // Duration input
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Buttons
            Constraint::Length(1), // Error
            Constraint::Min(0),
        ])
        .split(area);

    let fields = [
        ("Exercise Name", &form.name_input, FormField::Name),
        ("Sets", &form.sets_input, FormField::Sets),
        ("Reps", &form.reps_input, FormField::Reps),
        ("Duration (seconds, optional)", &form.duration_input, FormField::Duration),
    ];
    for (i, (label, value, field)) in fields.into_iter().enumerate() {
        f.render_widget(Paragraph::new(label), chunks[i * 2]);
        render_input_line(f, chunks[i * 2 + 1], value, form.focused_field == field);
    }

    let button_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[9]);
    let confirm_label = match form.mode {
        crate::app::FormMode::Add => " Add Exercise ",
        crate::app::FormMode::Edit => " Save ",
    };
    render_button(
        f,
        button_chunks[0],
        confirm_label,
        form.focused_field == FormField::Confirm,
    );
    render_button(
        f,
        button_chunks[1],
        " Cancel ",
        form.focused_field == FormField::Cancel,
    );

    if let Some(err) = &form.error_message {
        f.render_widget(
            Paragraph::new(err.as_str()).style(Style::default().fg(Color::Red)),
            chunks[10],
        );
    }
}

fn render_input_line(f: &mut Frame, area: Rect, value: &str, focused: bool) {
    let style = if focused {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    } else {
        Style::default()
    };
    let cursor = if focused { "_" } else { "" };
    f.render_widget(
        Paragraph::new(format!(" {value}{cursor}")).style(style),
        area,
    );
}

fn render_button(f: &mut Frame, area: Rect, label: &str, focused: bool) {
    let style = if focused {
        Style::default()
            .bg(Color::Yellow)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Yellow)
    };
    f.render_widget(
        Paragraph::new(label)
            .style(style)
            .alignment(ratatui::layout::Alignment::Center),
        area,
    );
}

fn render_confirm_delete_modal(f: &mut Frame, exercise_name: &str) {
    let block = Block::default()
        .title("Confirm Delete")
        .borders(Borders::ALL)
        .border_style(Style::new().red());
    let area = centered_rect_fixed(50, 6, f.size());
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let text = vec![
        Line::from(format!("Delete '{exercise_name}'?")),
        Line::from(""),
        Line::from(" [y] Yes   [n] No ").style(Style::new().bold()),
    ];
    f.render_widget(
        Paragraph::new(text).alignment(ratatui::layout::Alignment::Center),
        area.inner(&Margin {
            vertical: 1,
            horizontal: 1,
        }),
    );
}
