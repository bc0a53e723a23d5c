//! Terminal to-do list: a task store persisted to one JSON slot, a pure view
//! projection over it, and a ratatui front end.

pub mod app;
pub mod calendar;
pub mod config;
pub mod input;
pub mod logging;
pub mod storage;
pub mod store;
pub mod task;
pub mod transfer;
pub mod ui;
pub mod view;
pub mod weather;

pub use app::{Action, App, FormMode};
pub use storage::{JsonFileSlot, MemorySlot, Slot, StorageError};
pub use store::{Confirmation, SortKey, TaskStore};
pub use task::{Priority, Status, Task, TaskDraft, TaskRef};
pub use view::{project, Filter, RenderModel, Row, Stats};
