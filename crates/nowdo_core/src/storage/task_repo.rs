use crate::error::AppError;
use crate::model::Task;
use crate::storage::kv::KeyValueStore;
use tracing::{debug, warn};

pub const TASKS_KEY: &str = "tasks";

#[derive(Debug, Clone)]
pub struct TaskLoad {
    pub tasks: Vec<Task>,
    pub error: Option<AppError>,
}

/// Reads and writes the whole task list as one JSON value under [`TASKS_KEY`].
#[derive(Debug)]
pub struct TaskRepository<S> {
    store: S,
}

impl<S: KeyValueStore> TaskRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn load(&self) -> Result<Vec<Task>, AppError> {
        let Some(content) = self.store.get(TASKS_KEY)? else {
            return Ok(Vec::new());
        };

        let tasks: Vec<Task> = serde_json::from_str(&content).map_err(|err| {
            warn!(error = %err, "stored task list is not valid JSON");
            AppError::invalid_data(format!("stored tasks: {err}"))
        })?;

        debug!(count = tasks.len(), "loaded tasks");
        Ok(tasks)
    }

    /// Never fails: an unreadable list comes back empty with the error attached.
    pub fn load_with_fallback(&self) -> TaskLoad {
        match self.load() {
            Ok(tasks) => TaskLoad { tasks, error: None },
            Err(err) => {
                warn!(error = %err, "starting with an empty task list");
                TaskLoad {
                    tasks: Vec::new(),
                    error: Some(err),
                }
            }
        }
    }

    pub fn save(&mut self, tasks: &[Task]) -> Result<(), AppError> {
        let content = serde_json::to_string(tasks)?;
        self.store.put(TASKS_KEY, content)?;
        debug!(count = tasks.len(), "saved tasks");
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), AppError> {
        self.store.remove(TASKS_KEY)?;
        debug!("cleared stored tasks");
        Ok(())
    }
}
