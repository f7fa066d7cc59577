mod task;

pub use task::{Task, sort_tasks};
