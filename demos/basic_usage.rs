//! Demo: Basic task list operations
//!
//! Adds, completes, deletes and checks tasks against a scratch file, then
//! reopens the file to show that every change was persisted.
//!
//! Run with: cargo run --example basic_usage

use chrono::NaiveDate;
use eyre::Result;
use todolist::TaskStore;

fn main() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let path = temp_dir.path().join("tasks.txt");

    println!("todolist Basic Usage Demo");
    println!("=========================\n");
    println!("Task file: {}\n", path.display());

    let mut store = TaskStore::open(&path)?;

    println!("1. ADD");
    for (description, due) in [
        ("Renew passport", "2024-11-30"),
        ("Water plants", "2025-06-15"),
        ("Plan holiday", "2030-07-01"),
        ("Clean garage", "2025-01-10"),
    ] {
        let task = store.add_task(description, due)?;
        println!("   Added \"{}\" due {}", task.description, task.due_date);
    }
    println!();

    println!("2. COMPLETE task 4");
    store.complete_task(4)?;
    println!();

    println!("3. DELETE task 3");
    let removed = store.delete_task(3)?;
    println!("   Removed \"{}\"\n", removed.description);

    println!("4. LIST");
    if let Some(entries) = store.view_tasks() {
        for entry in entries {
            println!(
                "   {}. [{}] {} (Due: {})",
                entry.position, entry.status, entry.description, entry.due_date
            );
        }
    }
    println!();

    let today = NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date");
    println!("5. DUE CHECK as of {}", today);
    let report = store.check_due_tasks(today);
    for task in &report.overdue {
        println!("   overdue:   {}", task.description);
    }
    for task in &report.due_today {
        println!("   due today: {}", task.description);
    }
    println!();

    println!("6. REOPEN");
    let reopened = TaskStore::open(&path)?;
    println!("   {} tasks on disk:", reopened.len());
    print!("{}", std::fs::read_to_string(&path)?);

    Ok(())
}
