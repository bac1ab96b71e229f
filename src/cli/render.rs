//! Plain-text and JSON rendering for CLI output.

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::Result;
use crate::core::{Task, UserPrefs};
use crate::view::TasksUiModel;

pub fn prefs(prefs: &UserPrefs, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(prefs)?);
        return Ok(());
    }
    println!("show_completed = {}", prefs.show_completed);
    println!("sort_order     = {}", prefs.sort_order);
    println!("counter        = {}", prefs.counter);
    Ok(())
}

pub fn ui_model(model: &TasksUiModel, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(model)?);
        return Ok(());
    }
    println!(
        "{} task(s), show_completed={}, sort_order={}",
        model.tasks.len(),
        model.show_completed,
        model.sort_order
    );
    for task in &model.tasks {
        println!("{}", task_line(task));
    }
    Ok(())
}

fn task_line(task: &Task) -> String {
    let mark = if task.completed { 'x' } else { ' ' };
    format!(
        "[{mark}] #{:<4} p{}  {}  {}",
        task.id,
        task.priority,
        format_deadline(task.deadline_ms),
        task.title
    )
}

fn format_deadline(ms: u64) -> String {
    OffsetDateTime::from_unix_timestamp_nanos((ms as i128) * 1_000_000)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
        .unwrap_or_else(|| ms.to_string())
}
