// workout-planner-tui/src/main.rs
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use std::{io, time::Duration};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use workout_planner_lib::AppService;

mod app;
mod ui;

use crate::app::App;

const LOG_FILE_NAME: &str = "wp-tui.log";

// The terminal belongs to the UI, so logs go to a file next to the config
fn init_tracing(config_path: &Path) -> Result<()> {
    let log_path = config_path.with_file_name(LOG_FILE_NAME);
    let log_file = File::create(&log_path)
        .with_context(|| format!("Failed to create log file {log_path:?}"))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(log_file)),
        )
        .with(filter)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let app_service =
        AppService::initialize().context("Failed to initialize application service")?;
    init_tracing(app_service.get_config_path())?;
    tracing::info!(slot = %app_service.slot_path().display(), "Starting TUI");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(app_service);
    let res = run_app(&mut terminal, &mut app);
    app.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "TUI exited with an error");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        app.clear_expired_error();

        if app.take_redraw() {
            terminal.draw(|f| ui::render_ui(f, app))?;
        }

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key_event(key)?;
                }
                Event::Resize(_, _) => app.mark_dirty(),
                _ => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
