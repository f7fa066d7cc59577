//! The in-memory task list and the operations a front end can request on it.
//!
//! Every mutation re-sorts the list and writes it back through the
//! [`TaskRepository`]. A failed write restores the list as it was before the
//! operation and returns the error.

mod intent;

pub use intent::{Intent, Outcome};

use crate::clock::{Clock, SystemClock};
use crate::error::AppError;
use crate::model::{Task, sort_tasks};
use crate::storage::{KeyValueStore, TaskRepository};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, error, info};

pub struct TaskList<S, R = StdRng> {
    tasks: Vec<Task>,
    selection: Option<Task>,
    repo: TaskRepository<S>,
    clock: Box<dyn Clock>,
    rng: R,
    load_error: Option<AppError>,
}

struct Snapshot {
    tasks: Vec<Task>,
    selection: Option<Task>,
}

impl<S: KeyValueStore> TaskList<S, StdRng> {
    /// Loads the stored list with the wall clock and an entropy-seeded RNG.
    pub fn open(repo: TaskRepository<S>) -> Self {
        Self::with_parts(repo, Box::new(SystemClock), StdRng::from_entropy())
    }
}

impl<S: KeyValueStore, R: Rng> TaskList<S, R> {
    pub fn with_parts(repo: TaskRepository<S>, clock: Box<dyn Clock>, rng: R) -> Self {
        let loaded = repo.load_with_fallback();
        let mut tasks = loaded.tasks;
        sort_tasks(&mut tasks);

        Self {
            tasks,
            selection: None,
            repo,
            clock,
            rng,
            load_error: loaded.error,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn selection(&self) -> Option<&Task> {
        self.selection.as_ref()
    }

    /// Whether completing the selection is currently possible.
    pub fn can_complete(&self) -> bool {
        self.selection.is_some()
    }

    pub fn has_completed(&self) -> bool {
        self.tasks.iter().any(Task::is_completed)
    }

    pub fn pending_count(&self) -> usize {
        self.tasks.iter().filter(|task| !task.is_completed()).count()
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.len() - self.pending_count()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// The error hit while reading the stored list at startup, if any.
    pub fn load_error(&self) -> Option<&AppError> {
        self.load_error.as_ref()
    }

    pub fn repository(&self) -> &TaskRepository<S> {
        &self.repo
    }

    pub fn dispatch(&mut self, intent: Intent) -> Result<Outcome, AppError> {
        match intent {
            Intent::Add(text) => self.add(&text),
            Intent::PickRandom => Ok(self.pick_random()),
            Intent::CompleteSelected => self.complete_selected(),
            Intent::Toggle { index, completed } => self.toggle_completion(index, completed),
            Intent::Delete(index) => self.delete(index),
            Intent::ClearAll => self.clear_all(),
        }
    }

    pub fn add(&mut self, text: &str) -> Result<Outcome, AppError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(AppError::invalid_input("Please enter a task"));
        }

        let snapshot = self.snapshot();
        let task = Task::new(trimmed, self.clock.as_ref());
        self.tasks.push(task.clone());
        sort_tasks(&mut self.tasks);
        self.commit(snapshot)?;

        info!(text = task.text(), "task added");
        Ok(Outcome::Added(task))
    }

    /// Chooses uniformly among pending tasks. Nothing is written.
    pub fn pick_random(&mut self) -> Outcome {
        let pending: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|task| !task.is_completed())
            .collect();
        if pending.is_empty() {
            self.selection = None;
            return Outcome::NothingPending;
        }

        let index = self.rng.gen_range(0..pending.len());
        let picked = pending[index].clone();
        debug!(index, pending = pending.len(), text = picked.text(), "picked task");
        self.selection = Some(picked.clone());
        Outcome::Picked(picked)
    }

    /// Completes the first task whose text matches the selection.
    pub fn complete_selected(&mut self) -> Result<Outcome, AppError> {
        let Some(selected) = self.selection.clone() else {
            return Ok(Outcome::NothingSelected);
        };

        let Some(position) = self.tasks.iter().position(|task| *task == selected) else {
            self.selection = None;
            return Ok(Outcome::NothingSelected);
        };

        let snapshot = self.snapshot();
        self.tasks[position].set_completed(true, self.clock.as_ref());
        let completed = self.tasks[position].clone();
        sort_tasks(&mut self.tasks);
        self.selection = None;
        self.commit(snapshot)?;

        info!(text = completed.text(), "selected task completed");
        Ok(Outcome::Completed(completed))
    }

    pub fn toggle_completion(
        &mut self,
        index: usize,
        completed: bool,
    ) -> Result<Outcome, AppError> {
        self.check_index(index)?;

        let snapshot = self.snapshot();
        self.tasks[index].set_completed(completed, self.clock.as_ref());
        let toggled = self.tasks[index].clone();
        sort_tasks(&mut self.tasks);
        if self.selection.as_ref() == Some(&toggled) {
            self.selection = None;
        }
        self.commit(snapshot)?;

        info!(text = toggled.text(), completed, "task toggled");
        Ok(Outcome::Toggled {
            task: toggled,
            completed,
        })
    }

    pub fn delete(&mut self, index: usize) -> Result<Outcome, AppError> {
        self.check_index(index)?;

        let snapshot = self.snapshot();
        let removed = self.tasks.remove(index);
        if self.selection.as_ref() == Some(&removed) {
            self.selection = None;
        }
        self.commit(snapshot)?;

        info!(text = removed.text(), "task deleted");
        Ok(Outcome::Deleted(removed))
    }

    pub fn clear_all(&mut self) -> Result<Outcome, AppError> {
        let snapshot = self.snapshot();
        self.tasks.clear();
        self.selection = None;

        if let Err(err) = self.repo.clear() {
            error!(error = %err, "failed to clear stored tasks; keeping previous list");
            self.restore(snapshot);
            return Err(err);
        }

        info!("all tasks cleared");
        Ok(Outcome::Cleared)
    }

    fn check_index(&self, index: usize) -> Result<(), AppError> {
        if index >= self.tasks.len() {
            return Err(AppError::invalid_input(format!(
                "no task at position {} (list has {})",
                index + 1,
                self.tasks.len()
            )));
        }
        Ok(())
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            tasks: self.tasks.clone(),
            selection: self.selection.clone(),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.tasks = snapshot.tasks;
        self.selection = snapshot.selection;
    }

    fn commit(&mut self, snapshot: Snapshot) -> Result<(), AppError> {
        if let Err(err) = self.repo.save(&self.tasks) {
            error!(error = %err, "failed to save tasks; keeping previous list");
            self.restore(snapshot);
            return Err(err);
        }
        Ok(())
    }
}
