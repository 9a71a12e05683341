// Due-date partitioning of pending tasks

use crate::models::Task;
use chrono::NaiveDate;
use serde::Serialize;

/// Result of checking pending tasks against a reference date
///
/// Holding a report means the check ran; either list may still be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DueReport<'a> {
    pub today: NaiveDate,
    pub overdue: Vec<&'a Task>,
    pub due_today: Vec<&'a Task>,
}

impl<'a> DueReport<'a> {
    /// Partition `tasks` into overdue and due-today, skipping completed ones
    pub fn check(tasks: &'a [Task], today: NaiveDate) -> Self {
        let (overdue, due_today): (Vec<&Task>, Vec<&Task>) = tasks
            .iter()
            .filter(|t| t.is_overdue(today) || t.is_due_on(today))
            .partition(|t| t.is_overdue(today));

        Self {
            today,
            overdue,
            due_today,
        }
    }

    pub fn has_overdue(&self) -> bool {
        !self.overdue.is_empty()
    }

    pub fn has_due_today(&self) -> bool {
        !self.due_today.is_empty()
    }
}
