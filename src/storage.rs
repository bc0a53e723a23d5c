use crate::{task::Task, transfer};
use log::{debug, error};
use serde_json::Value;
use std::{
    cell::RefCell,
    fs, io,
    path::{Path, PathBuf},
    rc::Rc,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read `{path}`: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write `{path}`: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to encode tasks: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Durable key-value slot holding the whole task list.
pub trait Slot {
    /// Missing data is an empty list, not an error.
    fn load(&self) -> Result<Vec<Task>, StorageError>;
    fn save(&mut self, tasks: &[Task]) -> Result<(), StorageError>;
}

/// Slot backed by one JSON file, overwritten on every save.
#[derive(Debug, Clone)]
pub struct JsonFileSlot {
    path: PathBuf,
}

impl JsonFileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Slot for JsonFileSlot {
    fn load(&self) -> Result<Vec<Task>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&self.path).map_err(|source| StorageError::Read {
            path: self.path.clone(),
            source,
        })?;
        Ok(decode(&data, &self.path))
    }

    fn save(&mut self, tasks: &[Task]) -> Result<(), StorageError> {
        let data = serde_json::to_string(tasks)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        // Write beside the slot and rename so a crash never leaves half a file.
        let tmp = self.path.with_extension("json.tmp");
        let write_err = |source| StorageError::Write {
            path: self.path.clone(),
            source,
        };
        fs::write(&tmp, data).map_err(write_err)?;
        fs::rename(&tmp, &self.path).map_err(write_err)?;
        debug!("saved {} tasks to {}", tasks.len(), self.path.display());
        Ok(())
    }
}

/// Stored data is not revalidated: anything that is not a JSON array loads as
/// an empty list.
fn decode(data: &str, path: &Path) -> Vec<Task> {
    match serde_json::from_str::<Value>(data) {
        Ok(Value::Array(records)) => transfer::tasks_from_records(records),
        Ok(Value::Null) => Vec::new(),
        Ok(_) => {
            error!("{} does not hold a task array, starting empty", path.display());
            Vec::new()
        }
        Err(err) => {
            error!("{} is not valid JSON ({err}), starting empty", path.display());
            Vec::new()
        }
    }
}

/// In-process slot. Clones share the same contents, which lets a test keep a
/// handle on what the store persisted.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    contents: Rc<RefCell<Option<String>>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw serialized contents, `None` until the first save.
    pub fn raw(&self) -> Option<String> {
        self.contents.borrow().clone()
    }
}

impl Slot for MemorySlot {
    fn load(&self) -> Result<Vec<Task>, StorageError> {
        Ok(match self.contents.borrow().as_deref() {
            Some(data) => decode(data, Path::new("<memory>")),
            None => Vec::new(),
        })
    }

    fn save(&mut self, tasks: &[Task]) -> Result<(), StorageError> {
        *self.contents.borrow_mut() = Some(serde_json::to_string(tasks)?);
        Ok(())
    }
}
