use crate::clock::Clock;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// A single entry in the task list.
///
/// Identity is the task text: two tasks with the same text compare equal and
/// hash the same, whatever their completion state or timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    text: String,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    created_at: i64,
    #[serde(default)]
    completed_at: i64,
}

impl Task {
    pub fn new(text: impl Into<String>, clock: &dyn Clock) -> Self {
        Self::new_at(text, clock.now_millis())
    }

    pub fn new_at(text: impl Into<String>, now: i64) -> Self {
        Self {
            text: text.into(),
            completed: false,
            created_at: now,
            completed_at: 0,
        }
    }

    /// Rebuilds a stored task exactly as recorded.
    pub fn rehydrate(
        text: impl Into<String>,
        completed: bool,
        created_at: i64,
        completed_at: i64,
    ) -> Self {
        Self {
            text: text.into(),
            completed,
            created_at,
            completed_at,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    /// Zero while the task is pending.
    pub fn completed_at(&self) -> i64 {
        self.completed_at
    }

    pub fn set_completed(&mut self, completed: bool, clock: &dyn Clock) {
        self.set_completed_at(completed, clock.now_millis());
    }

    /// Completing keeps an existing `completed_at`; un-completing always clears it.
    pub fn set_completed_at(&mut self, completed: bool, now: i64) {
        self.completed = completed;
        if completed {
            if self.completed_at == 0 {
                self.completed_at = now;
            }
        } else {
            self.completed_at = 0;
        }
    }

    pub(crate) fn display_order(&self, other: &Self) -> Ordering {
        match (self.completed, other.completed) {
            (false, true) => Ordering::Less,
            (true, false) => Ordering::Greater,
            (true, true) => other.completed_at.cmp(&self.completed_at),
            (false, false) => other.created_at.cmp(&self.created_at),
        }
    }
}

impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Task {}

impl Hash for Task {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

/// Pending tasks first, newest created first; then completed tasks, most
/// recently completed first. Ties keep their relative order.
pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by(Task::display_order);
}
