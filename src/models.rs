// Data models for the task list

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single to-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub description: String,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Create a pending task
    pub fn new(description: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            description: description.into(),
            due_date,
            completed: false,
        }
    }

    pub fn status_symbol(&self) -> char {
        if self.completed { '✓' } else { '✗' }
    }

    /// Pending and due strictly before `today`
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date < today
    }

    /// Pending and due exactly on `today`
    pub fn is_due_on(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date == today
    }
}

/// One row of a task listing, addressed by its 1-based position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskEntry<'a> {
    pub position: usize,
    pub status: char,
    pub description: &'a str,
    pub due_date: NaiveDate,
    pub completed: bool,
}

impl<'a> TaskEntry<'a> {
    pub(crate) fn new(position: usize, task: &'a Task) -> Self {
        Self {
            position,
            status: task.status_symbol(),
            description: &task.description,
            due_date: task.due_date,
            completed: task.completed,
        }
    }
}
