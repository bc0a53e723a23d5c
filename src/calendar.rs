use crate::{task::Task, view::NO_DUE_DATE};
use std::collections::BTreeMap;

/// Tasks grouped by due date. Keys sort as plain strings, so the undated
/// group lands after every ISO date.
pub fn group_by_due_date(tasks: &[Task]) -> BTreeMap<&str, Vec<&Task>> {
    let mut days: BTreeMap<&str, Vec<&Task>> = BTreeMap::new();
    for task in tasks {
        let key = if task.due_date.is_empty() {
            NO_DUE_DATE
        } else {
            task.due_date.as_str()
        };
        days.entry(key).or_default().push(task);
    }
    days
}
