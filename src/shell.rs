// Interactive menu over a TaskStore
//
// The shell only does I/O and input parsing. Recoverable store errors are
// printed and the loop continues; anything else is returned to the caller.

use crate::due::DueReport;
use crate::error::TodoError;
use crate::models::{Task, TaskEntry};
use crate::store::TaskStore;
use chrono::NaiveDate;
use colored::Colorize;
use eyre::Result;
use std::io::{BufRead, Write};
use tracing::debug;

/// Menu options, keyed by the number the user types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    View,
    Add,
    Complete,
    Delete,
    CheckDue,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 6] = [
        MenuChoice::View,
        MenuChoice::Add,
        MenuChoice::Complete,
        MenuChoice::Delete,
        MenuChoice::CheckDue,
        MenuChoice::Exit,
    ];

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::View),
            "2" => Some(MenuChoice::Add),
            "3" => Some(MenuChoice::Complete),
            "4" => Some(MenuChoice::Delete),
            "5" => Some(MenuChoice::CheckDue),
            "6" => Some(MenuChoice::Exit),
            _ => None,
        }
    }

    pub fn key(self) -> u8 {
        match self {
            MenuChoice::View => 1,
            MenuChoice::Add => 2,
            MenuChoice::Complete => 3,
            MenuChoice::Delete => 4,
            MenuChoice::CheckDue => 5,
            MenuChoice::Exit => 6,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::View => "View Tasks",
            MenuChoice::Add => "Add Task",
            MenuChoice::Complete => "Complete Task",
            MenuChoice::Delete => "Delete Task",
            MenuChoice::CheckDue => "Check Due Tasks",
            MenuChoice::Exit => "Exit",
        }
    }
}

/// Outcome of asking for a task number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PositionInput {
    Eof,
    Invalid,
    Position(usize),
}

/// Line-based interactive session
pub struct Shell<R, W> {
    input: R,
    output: W,
    color: bool,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(input: R, output: W, color: bool) -> Self {
        Self { input, output, color }
    }

    /// Run the menu loop until the user exits or input ends
    ///
    /// `today` is consulted on every due check so a long session picks up
    /// the date change at midnight.
    pub fn run<F>(&mut self, store: &mut TaskStore, today: F) -> Result<()>
    where
        F: Fn() -> NaiveDate,
    {
        writeln!(self.output, "Checking for due tasks...")?;
        render_due(&mut self.output, &store.check_due_tasks(today()), self.color)?;

        loop {
            self.print_menu()?;
            let Some(line) = self.prompt("Choose an option: ")? else {
                debug!("Input closed, leaving shell");
                return Ok(());
            };

            let Some(choice) = MenuChoice::parse(&line) else {
                writeln!(self.output, "Invalid choice, please try again.")?;
                continue;
            };
            debug!(?choice, "Menu choice");

            let keep_going = match choice {
                MenuChoice::View => {
                    writeln!(self.output, "\n{}", heading("To-Do List:", self.color))?;
                    render_listing(&mut self.output, store, self.color)?;
                    true
                }
                MenuChoice::Add => self.add(store)?,
                MenuChoice::Complete => self.complete(store)?,
                MenuChoice::Delete => self.delete(store)?,
                MenuChoice::CheckDue => {
                    render_due(&mut self.output, &store.check_due_tasks(today()), self.color)?;
                    true
                }
                MenuChoice::Exit => {
                    writeln!(self.output, "Exiting...")?;
                    false
                }
            };

            if !keep_going {
                return Ok(());
            }
        }
    }

    fn print_menu(&mut self) -> Result<()> {
        writeln!(self.output, "\n{}", heading("Options:", self.color))?;
        for choice in MenuChoice::ALL {
            writeln!(self.output, "{}. {}", choice.key(), choice.label())?;
        }
        Ok(())
    }

    /// Print `text` and read one line. `None` at end of input.
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Read a task number. Negative numbers map to 0 so the store reports them
    /// as out of range.
    fn prompt_position(&mut self, text: &str) -> Result<PositionInput> {
        let Some(line) = self.prompt(text)? else {
            return Ok(PositionInput::Eof);
        };
        match line.trim().parse::<i64>() {
            Ok(n) => Ok(PositionInput::Position(usize::try_from(n).unwrap_or(0))),
            Err(_) => {
                writeln!(self.output, "Please enter a valid task number.")?;
                Ok(PositionInput::Invalid)
            }
        }
    }

    fn add(&mut self, store: &mut TaskStore) -> Result<bool> {
        let Some(description) = self.prompt("Enter the task: ")? else {
            return Ok(false);
        };
        let Some(due_date) = self.prompt("Enter the due date (YYYY-MM-DD): ")? else {
            return Ok(false);
        };

        match store.add_task(&description, &due_date) {
            Ok(task) => render_added(&mut self.output, task)?,
            Err(e) => self.report(e)?,
        }
        Ok(true)
    }

    fn complete(&mut self, store: &mut TaskStore) -> Result<bool> {
        let position = match self.prompt_position("Enter task number to complete: ")? {
            PositionInput::Eof => return Ok(false),
            PositionInput::Invalid => return Ok(true),
            PositionInput::Position(position) => position,
        };
        match store.complete_task(position) {
            Ok(_) => writeln!(self.output, "Task {} marked as completed.", position)?,
            Err(e) => self.report(e)?,
        }
        Ok(true)
    }

    fn delete(&mut self, store: &mut TaskStore) -> Result<bool> {
        let position = match self.prompt_position("Enter task number to delete: ")? {
            PositionInput::Eof => return Ok(false),
            PositionInput::Invalid => return Ok(true),
            PositionInput::Position(position) => position,
        };
        match store.delete_task(position) {
            Ok(removed) => writeln!(self.output, "Deleted task: \"{}\"", removed.description)?,
            Err(e) => self.report(e)?,
        }
        Ok(true)
    }

    /// Print a recoverable error, propagate anything else
    fn report(&mut self, err: TodoError) -> Result<()> {
        if !err.is_recoverable() {
            return Err(err.into());
        }
        let message = err.to_string();
        if self.color {
            writeln!(self.output, "{}", message.red())?;
        } else {
            writeln!(self.output, "{}", message)?;
        }
        Ok(())
    }
}

// ============================================================================
// Rendering, shared with the one-shot commands
// ============================================================================

fn heading(text: &str, color: bool) -> String {
    if color { text.bold().to_string() } else { text.to_string() }
}

fn status_symbol(entry: &TaskEntry<'_>, color: bool) -> String {
    let symbol = entry.status.to_string();
    match (color, entry.completed) {
        (false, _) => symbol,
        (true, true) => symbol.green().to_string(),
        (true, false) => symbol.red().to_string(),
    }
}

/// Print the numbered listing, or a notice when there are no tasks
pub fn render_listing<W: Write>(out: &mut W, store: &TaskStore, color: bool) -> Result<()> {
    match store.view_tasks() {
        None => writeln!(out, "No tasks in the list.")?,
        Some(entries) => {
            for entry in &entries {
                writeln!(
                    out,
                    "{}. [{}] {} (Due: {})",
                    entry.position,
                    status_symbol(entry, color),
                    entry.description,
                    entry.due_date
                )?;
            }
        }
    }
    Ok(())
}

/// Print the listing as JSON: `{"tasks": null}` when there are no tasks,
/// otherwise `{"tasks": [...]}`
pub fn render_listing_json<W: Write>(out: &mut W, store: &TaskStore) -> Result<()> {
    let listing = serde_json::json!({ "tasks": store.view_tasks() });
    serde_json::to_writer_pretty(&mut *out, &listing)?;
    writeln!(out)?;
    Ok(())
}

/// Print overdue and due-today sections, each with its own "none" notice
pub fn render_due<W: Write>(out: &mut W, report: &DueReport<'_>, color: bool) -> Result<()> {
    if report.has_overdue() {
        writeln!(out, "\n{}", heading("Overdue Tasks:", color))?;
        for task in &report.overdue {
            let line = format!("- {} (Due: {})", task.description, task.due_date);
            if color {
                writeln!(out, "{}", line.red())?;
            } else {
                writeln!(out, "{}", line)?;
            }
        }
    } else {
        writeln!(out, "\nNo overdue tasks.")?;
    }

    if report.has_due_today() {
        writeln!(out, "\n{}", heading("Tasks Due Today:", color))?;
        for task in &report.due_today {
            let line = format!("- {} (Due: {})", task.description, task.due_date);
            if color {
                writeln!(out, "{}", line.yellow())?;
            } else {
                writeln!(out, "{}", line)?;
            }
        }
    } else {
        writeln!(out, "No tasks due today.")?;
    }
    Ok(())
}

pub fn render_added<W: Write>(out: &mut W, task: &Task) -> Result<()> {
    writeln!(
        out,
        "Added task: \"{}\" with due date {}",
        task.description, task.due_date
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn run_session(store: &mut TaskStore, input: &str) -> String {
        let mut output = Vec::new();
        let mut shell = Shell::new(Cursor::new(input.as_bytes()), &mut output, false);
        shell.run(store, today).unwrap();
        String::from_utf8(output).unwrap()
    }

    fn open_temp(temp: &TempDir) -> TaskStore {
        TaskStore::open(temp.path().join("tasks.txt")).unwrap()
    }

    #[test]
    fn test_menu_choice_parse() {
        assert_eq!(MenuChoice::parse("1"), Some(MenuChoice::View));
        assert_eq!(MenuChoice::parse(" 6 \n"), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::parse("7"), None);
        assert_eq!(MenuChoice::parse("view"), None);
        assert_eq!(MenuChoice::parse(""), None);
    }

    #[test]
    fn test_menu_choice_keys_round_trip() {
        for choice in MenuChoice::ALL {
            assert_eq!(MenuChoice::parse(&choice.key().to_string()), Some(choice));
        }
    }

    #[test]
    fn test_startup_runs_due_check() {
        let temp = TempDir::new().unwrap();
        let mut store = open_temp(&temp);

        let out = run_session(&mut store, "6\n");
        assert!(out.starts_with("Checking for due tasks...\n\nNo overdue tasks.\nNo tasks due today.\n"));
        assert!(out.contains("1. View Tasks\n"));
        assert!(out.contains("6. Exit\n"));
        assert!(out.ends_with("Exiting...\n"));
    }

    #[test]
    fn test_add_and_view() {
        let temp = TempDir::new().unwrap();
        let mut store = open_temp(&temp);

        let out = run_session(&mut store, "2\nBuy milk\n2030-01-01\n1\n6\n");
        assert!(out.contains("Added task: \"Buy milk\" with due date 2030-01-01\n"));
        assert!(out.contains("To-Do List:\n1. [✗] Buy milk (Due: 2030-01-01)\n"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_view_empty() {
        let temp = TempDir::new().unwrap();
        let mut store = open_temp(&temp);

        let out = run_session(&mut store, "1\n6\n");
        assert!(out.contains("To-Do List:\nNo tasks in the list.\n"));
    }

    #[test]
    fn test_invalid_date_is_reported_not_fatal() {
        let temp = TempDir::new().unwrap();
        let mut store = open_temp(&temp);

        let out = run_session(&mut store, "2\nBuy milk\nnext week\n6\n");
        assert!(out.contains("Invalid due date 'next week'"));
        assert!(out.ends_with("Exiting...\n"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_complete_and_delete() {
        let temp = TempDir::new().unwrap();
        let mut store = open_temp(&temp);
        store.add_task("A", "2030-01-01").unwrap();
        store.add_task("B", "2030-01-02").unwrap();

        let out = run_session(&mut store, "3\n2\n4\n1\n1\n6\n");
        assert!(out.contains("Task 2 marked as completed.\n"));
        assert!(out.contains("Deleted task: \"A\"\n"));
        assert!(out.contains("1. [✓] B (Due: 2030-01-02)\n"));

        let content = fs::read_to_string(store.path()).unwrap();
        assert_eq!(content, "B | 2030-01-02 | True\n");
    }

    #[test]
    fn test_invalid_task_numbers() {
        let temp = TempDir::new().unwrap();
        let mut store = open_temp(&temp);
        store.add_task("A", "2030-01-01").unwrap();

        let out = run_session(&mut store, "3\n5\n3\n-1\n4\n0\n3\nabc\n6\n");
        assert_eq!(out.matches("Invalid task number.\n").count(), 3);
        assert!(out.contains("Please enter a valid task number.\n"));
        assert_eq!(store.len(), 1);
        assert!(!store.tasks()[0].completed);
    }

    #[test]
    fn test_listing_json_distinguishes_no_tasks() {
        let temp = TempDir::new().unwrap();
        let mut store = open_temp(&temp);

        let mut out = Vec::new();
        render_listing_json(&mut out, &store).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert!(value["tasks"].is_null());

        store.add_task("Buy milk", "2030-01-01").unwrap();
        let mut out = Vec::new();
        render_listing_json(&mut out, &store).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let tasks = value["tasks"].as_array().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0]["position"], 1);
        assert_eq!(tasks[0]["description"], "Buy milk");
        assert_eq!(tasks[0]["due_date"], "2030-01-01");
        assert_eq!(tasks[0]["completed"], false);
    }

    #[test]
    fn test_eof_at_task_number_prompt_exits() {
        let temp = TempDir::new().unwrap();
        let mut store = open_temp(&temp);
        store.add_task("A", "2030-01-01").unwrap();

        let out = run_session(&mut store, "4\n");
        assert!(out.ends_with("Enter task number to delete: "));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_invalid_choice() {
        let temp = TempDir::new().unwrap();
        let mut store = open_temp(&temp);

        let out = run_session(&mut store, "9\nhello\n6\n");
        assert_eq!(out.matches("Invalid choice, please try again.\n").count(), 2);
    }

    #[test]
    fn test_check_due_menu_option() {
        let temp = TempDir::new().unwrap();
        let mut store = open_temp(&temp);
        store.add_task("Past", "2020-01-01").unwrap();
        store.add_task("Now", "2025-06-15").unwrap();
        store.add_task("Later", "2099-01-01").unwrap();

        let out = run_session(&mut store, "5\n6\n");
        let section = "\nOverdue Tasks:\n- Past (Due: 2020-01-01)\n\nTasks Due Today:\n- Now (Due: 2025-06-15)\n";
        // Once at startup, once from the menu
        assert_eq!(out.matches(section).count(), 2);
        assert!(!out.contains("Later (Due"));
    }

    #[test]
    fn test_end_of_input_exits_cleanly() {
        let temp = TempDir::new().unwrap();
        let mut store = open_temp(&temp);

        let out = run_session(&mut store, "");
        assert!(out.ends_with("Choose an option: "));

        let out = run_session(&mut store, "2\nHalf typed");
        assert!(out.ends_with("Enter the due date (YYYY-MM-DD): "));
        assert!(store.is_empty());
    }
}
