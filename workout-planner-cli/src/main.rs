// workout-planner-cli/src/main.rs
mod cli;

use anyhow::{bail, Context, Result};
use chrono::{Local, TimeZone};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use std::io::{self, stdout};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use workout_planner_lib::{AppService, Exercise, ExerciseDraft, SessionError};

const EMPTY_PLAN_MESSAGE: &str = "No exercises added yet. Start building your workout!";

/// Log level comes from `--debug`, then `RUST_LOG`, then defaults to warnings only.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("workout_planner_lib=debug,workout_planner_cli=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli_args = cli::parse_args();
    init_tracing(cli_args.debug);
    tracing::debug!("Starting with args: {:?}", cli_args);

    if let cli::Commands::GenerateCompletion { shell } = cli_args.command {
        let mut cmd = cli::build_cli_command();
        let bin_name = cmd.get_name().to_string();
        eprintln!("Generating completion script for {shell}...");
        clap_complete::generate(shell, &mut cmd, bin_name, &mut stdout());
        return Ok(());
    }

    let mut service =
        AppService::initialize().context("Failed to initialize application service")?;

    match cli_args.command {
        cli::Commands::GenerateCompletion { .. } => {
            unreachable!("Completion generation should have exited already");
        }
        cli::Commands::Add {
            name,
            sets,
            reps,
            duration,
        } => {
            let draft = ExerciseDraft {
                name,
                sets,
                reps,
                duration,
            };
            match service.add_exercise(draft) {
                Ok(exercise) => println!(
                    "Added exercise '{}' (ID: {}) at position {}.",
                    exercise.name,
                    exercise.id,
                    service.exercises().len()
                ),
                Err(e) => bail!("Error adding exercise: {e}"),
            }
        }
        cli::Commands::List { export_csv } => {
            if export_csv {
                print_exercise_csv(service.exercises())?;
            } else if service.exercises().is_empty() {
                println!("{EMPTY_PLAN_MESSAGE}");
            } else {
                let header_color = service
                    .config
                    .theme
                    .header_color()
                    .map(Color::from)
                    .unwrap_or(Color::Green);
                print_exercise_table(service.exercises(), header_color);
            }
        }
        cli::Commands::Edit {
            identifier,
            name,
            sets,
            reps,
            duration,
            clear_duration,
        } => {
            let nothing_to_change = name.is_none()
                && sets.is_none()
                && reps.is_none()
                && duration.is_none()
                && !clear_duration;
            if nothing_to_change {
                bail!("Nothing to change. Pass at least one of --name, --sets, --reps, --duration or --clear-duration.");
            }
            let id = resolve_id(&service, &identifier)?;
            service.edit_exercise(&id);
            if let Some(draft) = service.edit_draft_mut() {
                if let Some(name) = name {
                    draft.name = name;
                }
                if let Some(sets) = sets {
                    draft.sets = sets;
                }
                if let Some(reps) = reps {
                    draft.reps = reps;
                }
                if duration.is_some() || clear_duration {
                    draft.duration = duration;
                }
            }
            match service.save_edit() {
                Ok(_) => {
                    if let Some(updated) = service.get_exercise(&id) {
                        println!("Updated {updated}");
                    }
                }
                Err(SessionError::Invalid(e)) => {
                    service.cancel_edit();
                    bail!("Error editing exercise '{identifier}': {e}");
                }
                Err(e) => bail!("Error editing exercise '{identifier}': {e}"),
            }
        }
        cli::Commands::Delete { identifiers } => {
            let mut missing = Vec::new();
            for identifier in &identifiers {
                let Some(id) = service
                    .resolve_exercise_identifier(identifier)
                    .map(|e| e.id.clone())
                else {
                    missing.push(identifier.as_str());
                    continue;
                };
                if let Some(removed) = service.remove_exercise(&id) {
                    println!("Deleted exercise '{}' (ID: {}).", removed.name, removed.id);
                }
            }
            if !missing.is_empty() {
                bail!("Exercise(s) not found: {}", missing.join(", "));
            }
        }
        cli::Commands::Move { from, to } => {
            let len = service.exercises().len();
            if len == 0 {
                println!("{EMPTY_PLAN_MESSAGE}");
                return Ok(());
            }
            let from_index = position_to_index(from, len)?;
            let to_index = usize::try_from(to - 1).unwrap_or(usize::MAX);
            let moved = service.exercises()[from_index].clone();
            if service.reorder_exercises(from_index, to_index) {
                // Destination may have been clamped to the end of the list
                if let Some(index) = service.store().position(&moved.id) {
                    println!("Moved '{}' to position {}.", moved.name, index + 1);
                }
            } else {
                println!("Order unchanged.");
            }
        }
        cli::Commands::Path => {
            println!("Config file: {}", service.get_config_path().display());
            println!("Exercise slot: {}", service.slot_path().display());
        }
        cli::Commands::SetHeaderColor { color } => match service.set_header_color(&color) {
            Ok(parsed) => println!("Table header color set to {parsed:?}."),
            Err(e) => bail!("Error setting header color: {e}"),
        },
    }

    Ok(())
}

fn resolve_id(service: &AppService, identifier: &str) -> Result<String> {
    service
        .resolve_exercise_identifier(identifier)
        .map(|e| e.id.clone())
        .with_context(|| format!("Exercise '{identifier}' not found"))
}

/// Converts a 1-based position shown by `list` into an index.
fn position_to_index(position: u64, len: usize) -> Result<usize> {
    match usize::try_from(position) {
        Ok(p) if (1..=len).contains(&p) => Ok(p - 1),
        _ => bail!("Position {position} is out of range (1-{len})."),
    }
}

/// Ids are creation timestamps in milliseconds; ids from elsewhere show as "-".
fn added_at(exercise: &Exercise) -> String {
    exercise
        .id
        .parse::<i64>()
        .ok()
        .and_then(|ms| Local.timestamp_millis_opt(ms).single())
        .map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string())
}

fn print_exercise_table(exercises: &[Exercise], header_color: Color) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("#").fg(header_color),
            Cell::new("ID").fg(header_color),
            Cell::new("Exercise").fg(header_color),
            Cell::new("Sets").fg(header_color),
            Cell::new("Reps").fg(header_color),
            Cell::new("Duration (s)").fg(header_color),
            Cell::new("Added (Local)").fg(header_color),
        ]);

    for (index, exercise) in exercises.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(&exercise.id),
            Cell::new(&exercise.name).add_attribute(Attribute::Bold),
            Cell::new(exercise.sets),
            Cell::new(exercise.reps),
            Cell::new(
                exercise
                    .duration
                    .map_or_else(|| "-".to_string(), |d| d.to_string()),
            ),
            Cell::new(added_at(exercise)),
        ]);
    }
    println!("{table}");
}

fn print_exercise_csv(exercises: &[Exercise]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record(["Position", "Id", "Name", "Sets", "Reps", "Duration_Seconds"])?;
    for (index, exercise) in exercises.iter().enumerate() {
        writer.write_record(&[
            (index + 1).to_string(),
            exercise.id.clone(),
            exercise.name.clone(),
            exercise.sets.to_string(),
            exercise.reps.to_string(),
            exercise.duration.map(|d| d.to_string()).unwrap_or_default(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
