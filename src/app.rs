use crate::{
    store::{Confirmation, SortKey, TaskStore},
    task::{Priority, TaskDraft, TaskRef},
    transfer,
    view::{self, Filter, RenderModel},
};
use log::{error, info, warn};
use std::path::PathBuf;

/// What `Submit` does with the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Idle,
    Editing(TaskRef),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Text,
    DueDate,
    Priority,
}

/// Where key presses go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Table,
    Form(FormField),
    Search,
    ImportPath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    None,
    ConfirmDeleteAll,
    Calendar,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Submit,
    BeginEdit(TaskRef),
    CancelEdit,
    Toggle(TaskRef),
    Delete(TaskRef),
    RequestDeleteAll,
    AnswerDeleteAll(Confirmation),
    SetFilter(Filter),
    SetSearch(String),
    ClearSearch,
    Sort(SortKey),
    Import(PathBuf),
    Export,
    ShowCalendar,
    HideCalendar,
}

pub struct App {
    store: TaskStore,
    export_dir: PathBuf,
    today: String,
    model: RenderModel,
    pub filter: Filter,
    /// `Some` once the user has typed into the search box; cleared by picking
    /// a filter.
    pub search: Option<String>,
    pub form: TaskDraft,
    pub mode: FormMode,
    pub focus: Focus,
    pub overlay: Overlay,
    pub import_path: String,
    /// Index into the projected rows.
    pub selected: usize,
    pub status_line: Option<String>,
    pub weather: Option<String>,
}

impl App {
    pub fn new(store: TaskStore, export_dir: PathBuf, today: String) -> Self {
        let mut app = Self {
            store,
            export_dir,
            today,
            model: RenderModel::default(),
            filter: Filter::default(),
            search: None,
            form: TaskDraft::default(),
            mode: FormMode::Idle,
            focus: Focus::Table,
            overlay: Overlay::None,
            import_path: String::new(),
            selected: 0,
            status_line: None,
            weather: None,
        };
        app.refresh();
        app
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn model(&self) -> &RenderModel {
        &self.model
    }

    pub fn today(&self) -> &str {
        &self.today
    }

    /// Re-projects when the date rolls over.
    pub fn set_today(&mut self, today: String) {
        if today != self.today {
            self.today = today;
            self.refresh();
        }
    }

    /// Task under the cursor, if the view is not empty.
    pub fn selected_task(&self) -> Option<TaskRef> {
        self.model.rows.get(self.selected).map(|row| row.task)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.model.rows.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Steps the form priority through unset, high, medium, low.
    pub fn cycle_priority(&mut self) {
        self.form.priority = match self.form.priority {
            Priority::High => Priority::Medium,
            Priority::Medium => Priority::Low,
            Priority::Low => Priority::default(),
            Priority::Other(_) => Priority::High,
        };
    }

    pub fn dispatch(&mut self, action: Action) {
        let outcome = match action {
            Action::Submit => self.submit(),
            Action::BeginEdit(target) => {
                self.begin_edit(target);
                Ok(())
            }
            Action::CancelEdit => {
                self.reset_form();
                Ok(())
            }
            Action::Toggle(target) => self.store.toggle_status(target).map(drop),
            Action::Delete(target) => self.delete(target),
            Action::RequestDeleteAll => {
                self.overlay = Overlay::ConfirmDeleteAll;
                Ok(())
            }
            Action::AnswerDeleteAll(answer) => {
                self.overlay = Overlay::None;
                let result = self.store.delete_all(answer);
                if matches!(result, Ok(true)) {
                    self.reset_form();
                }
                result.map(drop)
            }
            Action::SetFilter(filter) => {
                self.filter = filter;
                self.search = None;
                Ok(())
            }
            Action::SetSearch(search) => {
                self.search = Some(search);
                Ok(())
            }
            Action::ClearSearch => {
                self.search = None;
                Ok(())
            }
            Action::Sort(key) => {
                // Positions move, so an open edit would point at the wrong task.
                self.reset_form();
                self.store.sort_by(key)
            }
            Action::Import(path) => {
                self.import(path);
                Ok(())
            }
            Action::Export => {
                self.export();
                Ok(())
            }
            Action::ShowCalendar => {
                self.overlay = Overlay::Calendar;
                Ok(())
            }
            Action::HideCalendar => {
                self.overlay = Overlay::None;
                Ok(())
            }
        };
        if let Err(err) = outcome {
            error!("failed to save tasks: {err}");
            self.status_line = Some(format!("Failed to save tasks: {err}"));
        }
        self.refresh();
    }

    fn submit(&mut self) -> Result<(), crate::storage::StorageError> {
        let accepted = match self.mode {
            FormMode::Idle => self.store.create(&self.form)?.is_some(),
            FormMode::Editing(target) => self.store.update(target, &self.form)?,
        };
        if accepted {
            self.reset_form();
        }
        Ok(())
    }

    fn begin_edit(&mut self, target: TaskRef) {
        let Some(task) = self.store.get(target) else {
            return;
        };
        self.form = TaskDraft::new(task.text.clone(), task.due_date.clone(), task.priority.clone());
        self.mode = FormMode::Editing(target);
        self.focus = Focus::Form(FormField::Text);
    }

    fn delete(&mut self, target: TaskRef) -> Result<(), crate::storage::StorageError> {
        if let FormMode::Editing(editing) = self.mode {
            if editing == target {
                self.reset_form();
            } else if editing.0 > target.0 {
                self.mode = FormMode::Editing(TaskRef(editing.0 - 1));
            }
        }
        self.store.delete(target).map(drop)
    }

    fn import(&mut self, path: PathBuf) {
        match transfer::import_file(&path) {
            Ok(tasks) => {
                self.reset_form();
                let count = tasks.len();
                match self.store.replace_all(tasks) {
                    Ok(()) => self.status_line = Some(format!("Imported {count} tasks")),
                    Err(err) => {
                        error!("failed to save imported tasks: {err}");
                        self.status_line = Some(format!("Failed to save tasks: {err}"));
                    }
                }
            }
            Err(err) => {
                warn!("import from {} failed: {err}", path.display());
                self.status_line = Some(match err {
                    transfer::TransferError::InvalidJson(_) => err.to_string(),
                    other => format!("Import failed: {other}"),
                });
            }
        }
    }

    fn export(&mut self) {
        self.status_line = Some(match transfer::export_file(self.store.tasks(), &self.export_dir) {
            Ok(path) => format!("Exported to {}", path.display()),
            Err(err) => {
                warn!("export failed: {err}");
                format!("Export failed: {err}")
            }
        });
    }

    fn reset_form(&mut self) {
        self.form = TaskDraft::default();
        if self.mode != FormMode::Idle {
            info!("leaving edit mode");
        }
        self.mode = FormMode::Idle;
    }

    fn refresh(&mut self) {
        self.model = view::project(
            self.store.tasks(),
            self.filter,
            self.search.as_deref(),
            &self.today,
        );
        if self.selected >= self.model.rows.len() {
            self.selected = self.model.rows.len().saturating_sub(1);
        }
    }
}
