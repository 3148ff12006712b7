// workout-planner-cli/src/cli.rs
use clap::{value_parser, Command, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(author, version, about = "Plan a workout: add, edit, delete and reorder exercises", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Print debug logs to stderr (overrides RUST_LOG)
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add an exercise to the end of the plan
    Add {
        /// Name of the exercise (e.g., "Squat")
        #[arg(short, long)]
        name: String,
        /// Number of sets
        #[arg(short, long, value_parser = value_parser!(u32).range(1..))]
        sets: u32,
        /// Repetitions per set
        #[arg(short, long, value_parser = value_parser!(u32).range(1..))]
        reps: u32,
        /// Duration in seconds (optional)
        #[arg(short, long, value_parser = value_parser!(u32).range(1..))]
        duration: Option<u32>,
    },
    /// List the exercises in plan order
    List {
        /// Write CSV to stdout instead of a table
        #[arg(long)]
        export_csv: bool,
    },
    /// Edit an exercise in place (keeps its position)
    Edit {
        /// ID or name of the exercise
        identifier: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New number of sets
        #[arg(short, long, value_parser = value_parser!(u32).range(1..))]
        sets: Option<u32>,
        /// New repetitions per set
        #[arg(short, long, value_parser = value_parser!(u32).range(1..))]
        reps: Option<u32>,
        /// New duration in seconds
        #[arg(short, long, value_parser = value_parser!(u32).range(1..), conflicts_with = "clear_duration")]
        duration: Option<u32>,
        /// Remove the duration
        #[arg(long)]
        clear_duration: bool,
    },
    /// Delete one or more exercises
    Delete {
        /// IDs or names of the exercises
        #[arg(required = true, num_args = 1..)]
        identifiers: Vec<String>,
    },
    /// Move the exercise at one position to another (positions as shown by `list`)
    Move {
        #[arg(value_parser = value_parser!(u64).range(1..))]
        from: u64,
        #[arg(value_parser = value_parser!(u64).range(1..))]
        to: u64,
    },
    /// Show the config file and exercise slot locations
    Path,
    /// Set the color of table headers (e.g., "Blue", "DarkCyan")
    SetHeaderColor { color: String },
    /// Generate shell completion script
    GenerateCompletion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

pub fn build_cli_command() -> Command {
    Cli::command()
}
