// Backing file operations

use crate::error::{Result, TodoError};
use crate::models::Task;
use crate::record;
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;
use tracing::{debug, info};

/// Read every task from the backing file
///
/// A missing file is an empty list. Any malformed line, blank ones included,
/// aborts the whole read with [`TodoError::Parse`].
pub fn read_tasks(path: &Path) -> Result<Vec<Task>> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(file = ?path, "Task file does not exist yet, starting empty");
            return Ok(Vec::new());
        }
        Err(e) => return Err(TodoError::io(path, e)),
    };

    FileExt::lock_shared(&file).map_err(|e| TodoError::io(path, e))?;

    let reader = BufReader::new(&file);
    let mut tasks = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| TodoError::io(path, e))?;

        let task = record::parse_line(&line).map_err(|e| TodoError::Parse {
            path: path.to_path_buf(),
            line: line_num + 1,
            reason: e.to_string(),
        })?;
        tasks.push(task);
    }

    info!(file = ?path, count = tasks.len(), "Loaded tasks");

    Ok(tasks)
}

/// Overwrite the backing file with `tasks`, one line each
pub fn write_tasks(path: &Path, tasks: &[Task]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| TodoError::io(parent, e))?;
    }

    // Truncate only once the lock is held
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(path)
        .map_err(|e| TodoError::io(path, e))?;

    file.lock_exclusive().map_err(|e| TodoError::io(path, e))?;
    file.set_len(0).map_err(|e| TodoError::io(path, e))?;

    let mut writer = BufWriter::new(&file);
    for task in tasks {
        writeln!(writer, "{}", record::format_line(task)).map_err(|e| TodoError::io(path, e))?;
    }
    writer.flush().map_err(|e| TodoError::io(path, e))?;
    drop(writer);

    file.sync_all().map_err(|e| TodoError::io(path, e))?;

    debug!(file = ?path, count = tasks.len(), "Saved tasks");

    // Lock is released when file is dropped
    Ok(())
}
