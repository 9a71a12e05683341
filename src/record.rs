// Line-oriented record format for the backing file
//
// One task per line: `<description> | <YYYY-MM-DD> | <True|False>`

use crate::models::Task;
use chrono::NaiveDate;
use thiserror::Error;

/// Field separator. Descriptions must never contain it.
pub const DELIMITER: &str = " | ";

/// `chrono` format string for due dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const TRUE: &str = "True";
const FALSE: &str = "False";

/// Why a single line failed to parse
#[derive(Error, Debug, PartialEq)]
pub enum RecordError {
    #[error("expected 3 fields separated by '{}', found {}", DELIMITER, .0)]
    FieldCount(usize),

    #[error("invalid due date '{value}': {source}")]
    Date {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("invalid completion flag '{}' (expected {} or {})", .0, TRUE, FALSE)]
    Status(String),
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(text: &str) -> Result<NaiveDate, RecordError> {
    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|source| RecordError::Date {
        value: text.to_string(),
        source,
    })
}

/// Parse one line of the backing file into a task
pub fn parse_line(line: &str) -> Result<Task, RecordError> {
    let fields: Vec<&str> = line.trim().split(DELIMITER).collect();
    let [description, due_date, status] = fields.as_slice() else {
        return Err(RecordError::FieldCount(fields.len()));
    };

    let completed = match *status {
        TRUE => true,
        FALSE => false,
        other => return Err(RecordError::Status(other.to_string())),
    };

    Ok(Task {
        description: description.to_string(),
        due_date: parse_date(due_date)?,
        completed,
    })
}

/// Render a task as one line, without the trailing newline
pub fn format_line(task: &Task) -> String {
    format!(
        "{}{DELIMITER}{}{DELIMITER}{}",
        task.description,
        task.due_date.format(DATE_FORMAT),
        if task.completed { TRUE } else { FALSE }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_pending() {
        let task = parse_line("Buy milk | 2030-01-01 | False").unwrap();
        assert_eq!(task.description, "Buy milk");
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2030, 1, 1).unwrap());
        assert!(!task.completed);
    }

    #[test]
    fn test_parse_line_completed_with_trailing_newline() {
        let task = parse_line("Pay rent | 2024-02-29 | True\n").unwrap();
        assert_eq!(task.description, "Pay rent");
        assert!(task.completed);
    }

    #[test]
    fn test_parse_line_wrong_field_count() {
        assert_eq!(parse_line("Buy milk | 2030-01-01"), Err(RecordError::FieldCount(2)));
        assert_eq!(
            parse_line("a | b | 2030-01-01 | False"),
            Err(RecordError::FieldCount(4))
        );
        assert_eq!(parse_line("Buy milk|2030-01-01|False"), Err(RecordError::FieldCount(1)));
    }

    #[test]
    fn test_parse_line_invalid_date() {
        assert!(matches!(
            parse_line("Buy milk | 2030-02-30 | False"),
            Err(RecordError::Date { .. })
        ));
        assert!(matches!(
            parse_line("Buy milk | tomorrow | False"),
            Err(RecordError::Date { .. })
        ));
    }

    #[test]
    fn test_parse_line_strict_status() {
        assert_eq!(
            parse_line("Buy milk | 2030-01-01 | true"),
            Err(RecordError::Status("true".to_string()))
        );
        assert_eq!(
            parse_line("Buy milk | 2030-01-01 | yes"),
            Err(RecordError::Status("yes".to_string()))
        );
    }

    #[test]
    fn test_parse_line_missing_description() {
        assert_eq!(parse_line("   | 2030-01-01 | False"), Err(RecordError::FieldCount(2)));
        assert_eq!(parse_line("x |   | 2030-01-01 | False"), Err(RecordError::FieldCount(4)));
    }

    #[test]
    fn test_format_line() {
        let mut task = Task::new("Buy milk", NaiveDate::from_ymd_opt(2030, 1, 5).unwrap());
        assert_eq!(format_line(&task), "Buy milk | 2030-01-05 | False");

        task.completed = true;
        assert_eq!(format_line(&task), "Buy milk | 2030-01-05 | True");
    }

    #[test]
    fn test_format_then_parse_preserves_fields() {
        let mut task = Task::new("Call mom, then dad", NaiveDate::from_ymd_opt(2031, 12, 31).unwrap());
        task.completed = true;
        assert_eq!(parse_line(&format_line(&task)).unwrap(), task);
    }
}
