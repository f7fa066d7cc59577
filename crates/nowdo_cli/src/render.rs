use nowdo_core::config::{Palette, Tint};
use nowdo_core::{Outcome, Task};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

pub const EMPTY_LIST: &str = "No tasks yet. Add one to get started.";

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "#")]
    position: String,
    #[tabled(rename = "Done")]
    check: &'static str,
    #[tabled(rename = "Task")]
    text: String,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "When")]
    when: String,
}

pub fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

/// `-` for unset or unrepresentable timestamps.
pub fn format_timestamp(millis: i64, offset: UtcOffset) -> String {
    if millis <= 0 {
        return "-".to_string();
    }

    let format = format_description!("[year]-[month]-[day] [hour]:[minute]");
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
        .ok()
        .and_then(|moment| moment.to_offset(offset).format(&format).ok())
        .unwrap_or_else(|| "-".to_string())
}

pub fn status_label(task: &Task) -> &'static str {
    if task.is_completed() {
        "Completed"
    } else {
        "Pending"
    }
}

fn timestamps(task: &Task, offset: UtcOffset) -> String {
    let created = format!("Created: {}", format_timestamp(task.created_at(), offset));
    if task.is_completed() && task.completed_at() > 0 {
        format!(
            "{created}\nCompleted: {}",
            format_timestamp(task.completed_at(), offset)
        )
    } else {
        created
    }
}

pub fn render_table(tasks: &[Task], selection: Option<&Task>, offset: UtcOffset) -> String {
    let rows = tasks.iter().enumerate().map(|(index, task)| {
        let marker = if selection == Some(task) { "*" } else { "" };
        TaskRow {
            position: format!("{marker}{}", index + 1),
            check: if task.is_completed() { "[x]" } else { "[ ]" },
            text: task.text().to_string(),
            status: status_label(task),
            when: timestamps(task, offset),
        }
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

/// Counts for the line under the table, taken from the list's own queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub pending: usize,
    pub completed: usize,
    pub has_completed: bool,
}

pub fn summary_line(tally: Tally) -> String {
    format!("{} pending, {} completed", tally.pending, tally.completed)
}

pub fn render_list(
    tasks: &[Task],
    selection: Option<&Task>,
    tally: Tally,
    palette: &Palette,
    offset: UtcOffset,
) -> String {
    if tasks.is_empty() {
        return palette.paint(Tint::Hint, EMPTY_LIST);
    }

    let tint = if tally.has_completed {
        Tint::Done
    } else {
        Tint::Hint
    };
    let mut out = render_table(tasks, selection, offset);
    out.push('\n');
    out.push_str(&palette.paint(tint, &summary_line(tally)));
    out
}

pub fn outcome_kind(outcome: &Outcome) -> &'static str {
    match outcome {
        Outcome::Added(_) => "added",
        Outcome::Picked(_) => "picked",
        Outcome::NothingPending => "nothing_pending",
        Outcome::Completed(_) => "completed",
        Outcome::NothingSelected => "nothing_selected",
        Outcome::Toggled { .. } => "toggled",
        Outcome::Deleted(_) => "deleted",
        Outcome::Cleared => "cleared",
    }
}

pub fn outcome_json(outcome: &Outcome) -> serde_json::Value {
    serde_json::json!({
        "outcome": outcome_kind(outcome),
        "notice": outcome.notice(),
        "task": outcome.task(),
    })
}

pub fn render_outcome(outcome: &Outcome, palette: &Palette) -> String {
    match outcome {
        Outcome::Picked(task) => format!("Do this now: {}", palette.paint(Tint::Pick, task.text())),
        Outcome::NothingPending => format!(
            "{}\n{}",
            outcome.notice(),
            palette.paint(Tint::Hint, "Add some tasks to get started")
        ),
        Outcome::Completed(_) => format!(
            "{}\n{}",
            outcome.notice(),
            palette.paint(Tint::Hint, "Task completed! Generate another one")
        ),
        Outcome::Added(task) | Outcome::Deleted(task) => {
            format!("{}: {}", outcome.notice(), task.text())
        }
        Outcome::Toggled { task, .. } => format!("{}: {}", outcome.notice(), task.text()),
        Outcome::NothingSelected | Outcome::Cleared => outcome.notice(),
    }
}
