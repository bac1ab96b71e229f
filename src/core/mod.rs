//! Domain types: the preference record and the tasks it orders.

mod prefs;
mod task;

pub use prefs::{InvalidSortOrder, SortOrder, UserPrefs};
pub use task::{Task, TaskLoadError, load_tasks_file, tasks_from_json};
