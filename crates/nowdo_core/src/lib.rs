pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod storage;

pub use controller::{Intent, Outcome, TaskList};
pub use error::AppError;
pub use model::Task;

use storage::{PrefsFile, TaskRepository};

/// Opens the task list stored in the named preferences file.
pub fn open_task_list(prefs_name: &str) -> Result<TaskList<PrefsFile>, AppError> {
    let store = PrefsFile::open_default(prefs_name)?;
    Ok(TaskList::open(TaskRepository::new(store)))
}
