use chrono::{Local, NaiveDate};
use clap::{ArgAction, Parser, Subcommand};
use eyre::{Context, Result};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use todolist::shell::{self, Shell};
use todolist::{Config, TaskStore, TodoError};
use tracing::Level;

#[derive(Parser)]
#[command(name = "todolist")]
#[command(about = "Personal task tracker backed by a flat text file")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Path to the task file (default: from config, else ./tasks.txt)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Path to a YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive menu (the default)
    Shell,

    /// List all tasks
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Add a task
    Add {
        description: String,
        /// Due date, YYYY-MM-DD
        due: String,
    },

    /// Mark a task completed
    Complete {
        /// 1-based task number
        position: usize,
    },

    /// Delete a task
    Delete {
        /// 1-based task number
        position: usize,
    },

    /// Show overdue tasks and tasks due today
    Due {
        /// Reference date (default: today)
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    init_tracing(cli.verbose, &config)?;

    let color = config.color && !cli.no_color;
    if !color {
        colored::control::set_override(false);
    }

    let tasks_file = config.tasks_file(cli.file.as_deref());
    let mut store = TaskStore::open(&tasks_file)
        .wrap_err_with(|| format!("Failed to load tasks from {}", tasks_file.display()))?;

    match run(cli.command.unwrap_or(Commands::Shell), &mut store, color) {
        Err(e) if e.downcast_ref::<TodoError>().is_some_and(TodoError::is_recoverable) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
        result => result,
    }
}

fn init_tracing(verbose: u8, config: &Config) -> Result<()> {
    let level = match verbose {
        0 => config.log_level()?.unwrap_or(Level::WARN),
        1 => Level::INFO,
        _ => Level::DEBUG,
    };

    // Logs go to stderr so they never interleave with menu output
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
    Ok(())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn run(command: Commands, store: &mut TaskStore, color: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Shell => {
            let stdin = io::stdin();
            let mut shell = Shell::new(stdin.lock(), out, color);
            shell.run(store, today)?;
        }
        Commands::List { json } => {
            if json {
                shell::render_listing_json(&mut out, store)?;
            } else {
                shell::render_listing(&mut out, store, color)?;
            }
        }
        Commands::Add { description, due } => {
            let task = store.add_task(&description, &due)?;
            shell::render_added(&mut out, task)?;
        }
        Commands::Complete { position } => {
            store.complete_task(position)?;
            writeln!(out, "Task {} marked as completed.", position)?;
        }
        Commands::Delete { position } => {
            let removed = store.delete_task(position)?;
            writeln!(out, "Deleted task: \"{}\"", removed.description)?;
        }
        Commands::Due { today: date, json } => {
            let report = store.check_due_tasks(date.unwrap_or_else(today));
            if json {
                serde_json::to_writer_pretty(&mut out, &report)?;
                writeln!(out)?;
            } else {
                shell::render_due(&mut out, &report, color)?;
            }
        }
    }

    Ok(())
}
