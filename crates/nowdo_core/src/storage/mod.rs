pub mod kv;
pub mod task_repo;

pub use kv::{DEFAULT_PREFS_NAME, KeyValueStore, MemoryStore, PrefsFile};
pub use task_repo::{TASKS_KEY, TaskLoad, TaskRepository};
