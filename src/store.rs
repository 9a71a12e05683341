// Task store backed by a single text file

use crate::due::DueReport;
use crate::error::{Result, TodoError};
use crate::file;
use crate::models::{Task, TaskEntry};
use crate::record::{self, DELIMITER};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Ordered list of tasks mirrored to a text file
///
/// Every mutation is written back to disk before the method returns, so the
/// in-memory list and the file never disagree once a call completes.
pub struct TaskStore {
    path: PathBuf,
    tasks: Vec<Task>,
}

impl TaskStore {
    /// Open the store at `path`, loading any existing tasks
    ///
    /// A missing file is not an error; the store starts empty and the file is
    /// created on the first mutation.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut store = Self {
            path: path.as_ref().to_path_buf(),
            tasks: Vec::new(),
        };
        store.load()?;
        Ok(store)
    }

    /// Get the path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Replace the in-memory list with the contents of the backing file
    pub fn load(&mut self) -> Result<()> {
        self.tasks = file::read_tasks(&self.path)?;
        Ok(())
    }

    /// Write the full list to the backing file
    pub fn save(&self) -> Result<()> {
        file::write_tasks(&self.path, &self.tasks)
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Append a pending task and persist
    ///
    /// The description is trimmed. It must be non-empty, free of control
    /// characters, and must read back from the file as the same text; the due
    /// date must be `YYYY-MM-DD`.
    pub fn add_task(&mut self, description: &str, due_date_text: &str) -> Result<&Task> {
        let due_date = Self::validate_due_date(due_date_text)?;
        let task = Self::validate_task(description, due_date)?;
        let description = task.description.clone();

        self.tasks.push(task);
        if let Err(e) = self.save() {
            self.tasks.pop();
            return Err(e);
        }

        info!(position = self.tasks.len(), %description, %due_date, "Added task");
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    /// Mark the task at 1-based `position` completed and persist
    ///
    /// Completing an already completed task just rewrites the same state.
    pub fn complete_task(&mut self, position: usize) -> Result<&Task> {
        let index = self.index_of(position)?;

        let was_completed = std::mem::replace(&mut self.tasks[index].completed, true);
        if let Err(e) = self.save() {
            self.tasks[index].completed = was_completed;
            return Err(e);
        }

        info!(position, "Completed task");
        Ok(&self.tasks[index])
    }

    /// Remove the task at 1-based `position` and persist
    ///
    /// Later tasks move up one position. Returns the removed task.
    pub fn delete_task(&mut self, position: usize) -> Result<Task> {
        let index = self.index_of(position)?;

        let removed = self.tasks.remove(index);
        if let Err(e) = self.save() {
            self.tasks.insert(index, removed);
            return Err(e);
        }

        info!(position, description = %removed.description, "Deleted task");
        Ok(removed)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// List tasks with their 1-based positions
    ///
    /// Returns `None` when there are no tasks at all.
    pub fn view_tasks(&self) -> Option<Vec<TaskEntry<'_>>> {
        if self.tasks.is_empty() {
            return None;
        }

        Some(
            self.tasks
                .iter()
                .enumerate()
                .map(|(i, task)| TaskEntry::new(i + 1, task))
                .collect(),
        )
    }

    /// Pending tasks that are overdue or due on `today`. Never touches disk.
    pub fn check_due_tasks(&self, today: NaiveDate) -> DueReport<'_> {
        let report = DueReport::check(&self.tasks, today);
        debug!(
            %today,
            overdue = report.overdue.len(),
            due_today = report.due_today.len(),
            "Checked due tasks"
        );
        report
    }

    // ========================================================================
    // Helper methods
    // ========================================================================

    fn index_of(&self, position: usize) -> Result<usize> {
        if position == 0 || position > self.tasks.len() {
            warn!(position, len = self.tasks.len(), "Task position out of range");
            return Err(TodoError::Range {
                position,
                len: self.tasks.len(),
            });
        }
        Ok(position - 1)
    }

    /// Build the task to append, refusing anything that would not read back
    /// from the file unchanged
    fn validate_task(description: &str, due_date: NaiveDate) -> Result<Task> {
        let description = description.trim();
        if description.is_empty() {
            return Err(TodoError::Validation("Task description cannot be empty.".to_string()));
        }
        if description.chars().any(char::is_control) {
            return Err(TodoError::Validation(
                "Task description cannot contain line breaks or control characters.".to_string(),
            ));
        }
        if description.contains(DELIMITER) {
            return Err(TodoError::Validation(format!(
                "Task description cannot contain '{}'.",
                DELIMITER
            )));
        }

        let task = Task::new(description, due_date);
        match record::parse_line(&record::format_line(&task)) {
            Ok(parsed) if parsed == task => Ok(task),
            _ => Err(TodoError::Validation(format!(
                "Task description cannot end with '{}'.",
                DELIMITER.trim_end()
            ))),
        }
    }

    fn validate_due_date(text: &str) -> Result<NaiveDate> {
        record::parse_date(text.trim()).map_err(|_| {
            TodoError::Validation(format!(
                "Invalid due date '{}'. Please use the format YYYY-MM-DD.",
                text.trim()
            ))
        })
    }
}
