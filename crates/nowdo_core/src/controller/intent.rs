use crate::model::Task;

/// A user request, as sent by a front end.
///
/// Indexes are zero-based positions in the current sorted list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Add(String),
    PickRandom,
    CompleteSelected,
    Toggle { index: usize, completed: bool },
    Delete(usize),
    ClearAll,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Added(Task),
    Picked(Task),
    NothingPending,
    Completed(Task),
    NothingSelected,
    Toggled { task: Task, completed: bool },
    Deleted(Task),
    Cleared,
}

impl Outcome {
    /// Short message for the user.
    pub fn notice(&self) -> String {
        match self {
            Self::Added(_) => "Task added".to_string(),
            Self::Picked(task) => format!("Do this now: {}", task.text()),
            Self::NothingPending => "No pending tasks to choose from".to_string(),
            Self::Completed(_) => "Task marked as completed".to_string(),
            Self::NothingSelected => "No task selected. Pick one first".to_string(),
            Self::Toggled {
                completed: true, ..
            } => "Task marked as completed".to_string(),
            Self::Toggled {
                completed: false, ..
            } => "Task marked as pending".to_string(),
            Self::Deleted(_) => "Task deleted".to_string(),
            Self::Cleared => "All tasks cleared".to_string(),
        }
    }

    pub fn task(&self) -> Option<&Task> {
        match self {
            Self::Added(task)
            | Self::Picked(task)
            | Self::Completed(task)
            | Self::Toggled { task, .. }
            | Self::Deleted(task) => Some(task),
            Self::NothingPending | Self::NothingSelected | Self::Cleared => None,
        }
    }
}
