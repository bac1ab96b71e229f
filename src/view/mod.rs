//! Derived task views.
//!
//! Pure derivation (filter + stable sort) plus the latest-value join that
//! recombines the task stream and the preference stream into a display
//! model on every emission from either side.

mod feed;

pub use feed::UiFeed;

use serde::Serialize;

use crate::core::{SortOrder, Task, UserPrefs};

/// Filter and order a task list under the given preferences.
///
/// Completed tasks are dropped unless `show_completed` is set. Sorting is
/// stable: ties keep their original relative order except where a
/// secondary key applies.
pub fn derive_task_list(tasks: &[Task], show_completed: bool, sort_order: SortOrder) -> Vec<Task> {
    let mut out: Vec<Task> = tasks
        .iter()
        .filter(|task| show_completed || !task.completed)
        .cloned()
        .collect();

    match sort_order {
        // No ordering applied: filtered order is source order.
        SortOrder::Unspecified | SortOrder::None => {}
        SortOrder::ByDeadline => out.sort_by(|a, b| b.deadline_ms.cmp(&a.deadline_ms)),
        SortOrder::ByPriority => out.sort_by(|a, b| a.priority.cmp(&b.priority)),
        SortOrder::ByDeadlineAndPriority => out.sort_by(|a, b| {
            b.deadline_ms
                .cmp(&a.deadline_ms)
                .then_with(|| a.priority.cmp(&b.priority))
        }),
    }
    out
}

/// Snapshot handed to the display layer. Recomputed on every relevant
/// change, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TasksUiModel {
    pub tasks: Vec<Task>,
    pub show_completed: bool,
    pub sort_order: SortOrder,
    pub counter: u64,
}

impl TasksUiModel {
    pub fn assemble(tasks: &[Task], prefs: &UserPrefs) -> Self {
        Self {
            tasks: derive_task_list(tasks, prefs.show_completed, prefs.sort_order),
            show_completed: prefs.show_completed,
            sort_order: prefs.sort_order,
            counter: prefs.counter,
        }
    }
}

/// Latest-value join over the task and preference sources.
///
/// Emits nothing until both sides have produced a value, then recomputes
/// on every emission from either side, pairing it with the most recent
/// value from the other.
#[derive(Debug, Default)]
pub struct LatestJoin {
    tasks: Option<Vec<Task>>,
    prefs: Option<UserPrefs>,
}

impl LatestJoin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_tasks(&mut self, tasks: Vec<Task>) -> Option<TasksUiModel> {
        self.tasks = Some(tasks);
        self.emit()
    }

    pub fn on_prefs(&mut self, prefs: UserPrefs) -> Option<TasksUiModel> {
        self.prefs = Some(prefs);
        self.emit()
    }

    fn emit(&self) -> Option<TasksUiModel> {
        match (&self.tasks, &self.prefs) {
            (Some(tasks), Some(prefs)) => Some(TasksUiModel::assemble(tasks, prefs)),
            _ => None,
        }
    }
}
