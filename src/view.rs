//! Projection of the task list into what the screen shows.

use crate::task::{Status, Task, TaskRef};
use chrono::{DateTime, TimeZone};
use std::fmt::Display;

pub const NO_DUE_DATE: &str = "No due date";
pub const EMPTY_PLACEHOLDER: &str = "No tasks found";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Pending,
    Completed,
    Overdue,
    Today,
}

impl Filter {
    pub const ALL: [Filter; 5] = [
        Filter::All,
        Filter::Pending,
        Filter::Completed,
        Filter::Overdue,
        Filter::Today,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Pending => "pending",
            Filter::Completed => "completed",
            Filter::Overdue => "overdue",
            Filter::Today => "today",
        }
    }

    /// Dates compare as `YYYY-MM-DD` strings, which is also chronological.
    pub fn matches(self, task: &Task, today: &str) -> bool {
        match self {
            Filter::All => true,
            Filter::Pending => task.status == Status::Pending,
            Filter::Completed => task.status == Status::Completed,
            Filter::Overdue => {
                task.status == Status::Pending
                    && !task.due_date.is_empty()
                    && task.due_date.as_str() < today
            }
            Filter::Today => task.due_date == today,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub task: TaskRef,
    pub text: String,
    pub due_date: String,
    pub priority: &'static str,
    pub status: String,
    pub completed: bool,
    pub overdue: bool,
}

impl Row {
    fn new(index: usize, task: &Task, today: &str) -> Self {
        Self {
            task: TaskRef(index),
            text: task.text.clone(),
            due_date: if task.due_date.is_empty() {
                NO_DUE_DATE.to_string()
            } else {
                task.due_date.clone()
            },
            priority: task.priority.label(),
            status: task.status.label(),
            completed: task.status.is_completed(),
            overdue: task.is_overdue(today),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// 0..=100
    pub percent_complete: f64,
}

impl Stats {
    pub fn of(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.status == Status::Completed).count();
        let pending = tasks.iter().filter(|t| t.status == Status::Pending).count();
        let percent_complete = if total == 0 {
            0.0
        } else {
            completed as f64 / total as f64 * 100.0
        };
        Self {
            total,
            completed,
            pending,
            percent_complete,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderModel {
    pub rows: Vec<Row>,
    pub stats: Stats,
}

impl RenderModel {
    /// The screen then shows a single placeholder row.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// `YYYY-MM-DD` of `now` in its own time zone; the app passes local time.
pub fn iso_date<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    now.format("%Y-%m-%d").to_string()
}

/// Indices of the tasks a filter or a search selects, in store order.
///
/// An active search replaces the filter: it scans the whole list and matches
/// text or due date case-insensitively. An empty search matches every task.
pub fn select(tasks: &[Task], filter: Filter, search: Option<&str>, today: &str) -> Vec<usize> {
    let needle = search.map(|s| s.trim().to_lowercase());
    tasks
        .iter()
        .enumerate()
        .filter(|(_, task)| match &needle {
            None => filter.matches(task, today),
            Some(needle) => {
                task.text.to_lowercase().contains(needle)
                    || task.due_date.to_lowercase().contains(needle)
            }
        })
        .map(|(index, _)| index)
        .collect()
}

pub fn project(
    tasks: &[Task],
    filter: Filter,
    search: Option<&str>,
    today: &str,
) -> RenderModel {
    let rows = select(tasks, filter, search, today)
        .into_iter()
        .map(|index| Row::new(index, &tasks[index], today))
        .collect();
    RenderModel {
        rows,
        stats: Stats::of(tasks),
    }
}
