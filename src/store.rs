use crate::{
    storage::{Slot, StorageError},
    task::{Status, Task, TaskDraft, TaskRef},
};
use chrono::Local;
use log::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// high, medium, low, then anything else
    Priority,
    /// lexicographic on the date string, undated first
    DueDate,
    /// lexicographic on the status string
    Status,
}

/// Answer to the delete-all prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

/// The authoritative task list.
///
/// Every method that changes the list writes it to the slot before returning,
/// so memory and durable state never diverge between calls.
pub struct TaskStore {
    tasks: Vec<Task>,
    slot: Box<dyn Slot>,
}

impl TaskStore {
    pub fn open(slot: Box<dyn Slot>) -> Result<Self, StorageError> {
        let tasks = slot.load()?;
        info!("loaded {} tasks", tasks.len());
        Ok(Self { tasks, slot })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, task: TaskRef) -> Option<&Task> {
        self.tasks.get(task.0)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Appends a pending task. Returns `None` without touching anything when
    /// the draft has no text or no priority.
    pub fn create(&mut self, draft: &TaskDraft) -> Result<Option<TaskRef>, StorageError> {
        let Some(text) = draft.validated_text() else {
            return Ok(None);
        };
        let task = Task {
            id: self.fresh_id(),
            text: text.to_string(),
            due_date: draft.due_date.clone(),
            priority: draft.priority.clone(),
            status: Status::Pending,
        };
        debug!("creating task {}", task.id);
        self.tasks.push(task);
        self.persist()?;
        Ok(Some(TaskRef(self.tasks.len() - 1)))
    }

    /// Rewrites text, due date and priority. Returns whether anything changed.
    pub fn update(&mut self, target: TaskRef, draft: &TaskDraft) -> Result<bool, StorageError> {
        let Some(text) = draft.validated_text() else {
            return Ok(false);
        };
        let Some(task) = self.tasks.get_mut(target.0) else {
            return Ok(false);
        };
        task.text = text.to_string();
        task.due_date = draft.due_date.clone();
        task.priority = draft.priority.clone();
        debug!("updated task {}", task.id);
        self.persist()?;
        Ok(true)
    }

    pub fn toggle_status(&mut self, target: TaskRef) -> Result<bool, StorageError> {
        let Some(task) = self.tasks.get_mut(target.0) else {
            return Ok(false);
        };
        task.status = task.status.toggled();
        debug!("task {} is now {}", task.id, task.status.as_str());
        self.persist()?;
        Ok(true)
    }

    pub fn delete(&mut self, target: TaskRef) -> Result<Option<Task>, StorageError> {
        if target.0 >= self.tasks.len() {
            return Ok(None);
        }
        let removed = self.tasks.remove(target.0);
        debug!("deleted task {}", removed.id);
        self.persist()?;
        Ok(Some(removed))
    }

    pub fn delete_all(&mut self, confirmation: Confirmation) -> Result<bool, StorageError> {
        if confirmation != Confirmation::Confirmed {
            return Ok(false);
        }
        info!("deleting all {} tasks", self.tasks.len());
        self.tasks.clear();
        self.persist()?;
        Ok(true)
    }

    pub fn replace_all(&mut self, tasks: Vec<Task>) -> Result<(), StorageError> {
        info!("replacing {} tasks with {}", self.tasks.len(), tasks.len());
        self.tasks = tasks;
        self.persist()
    }

    /// Stable in-place sort.
    pub fn sort_by(&mut self, key: SortKey) -> Result<(), StorageError> {
        match key {
            SortKey::Priority => self.tasks.sort_by_key(|t| t.priority.rank()),
            SortKey::DueDate => self.tasks.sort_by(|a, b| a.due_date.cmp(&b.due_date)),
            SortKey::Status => self
                .tasks
                .sort_by(|a, b| a.status.as_str().cmp(b.status.as_str())),
        }
        debug!("sorted by {key:?}");
        self.persist()
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        self.slot.save(&self.tasks)
    }

    /// Creation time in milliseconds, bumped past any id already taken.
    fn fresh_id(&self) -> i64 {
        let mut id = Local::now().timestamp_millis();
        while self.tasks.iter().any(|t| t.id == id) {
            id += 1;
        }
        id
    }
}
