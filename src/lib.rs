// todolist - Personal task tracking backed by a flat text file

pub mod config;
pub mod due;
pub mod error;
pub mod file;
pub mod models;
pub mod record;
pub mod shell;
pub mod store;

// Re-export main types for convenience
pub use config::Config;
pub use due::DueReport;
pub use error::{Result, TodoError};
pub use models::{Task, TaskEntry};
pub use shell::{MenuChoice, Shell};
pub use store::TaskStore;
