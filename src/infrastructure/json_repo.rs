use std::collections::HashSet;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::domain::{repository::DocumentRepository, Document, TodoError};

/// Stores the whole [`Document`] as one pretty-printed JSON file.
///
/// Saves go through a temp file in the same directory that is synced and
/// then renamed over the target, so readers only ever see a complete
/// snapshot. There is no locking; one process is expected to own the file.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

    pub fn path(&self) -> &Path { &self.path }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// Writes and syncs the serialized document to a temp file beside the
    /// target. Dropping the returned handle without persisting removes it.
    pub(crate) fn stage(&self, document: &Document) -> Result<NamedTempFile, TodoError> {
        let dir = self.dir();
        let mut staged = tempfile::Builder::new()
            .prefix(".data-")
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(|e| TodoError::io(dir, e))?;
        let tmp_path = staged.path().to_path_buf();
        {
            let mut writer = BufWriter::new(staged.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, document)
                .map_err(|e| TodoError::io(&tmp_path, io::Error::from(e)))?;
            writer.flush().map_err(|e| TodoError::io(&tmp_path, e))?;
        }
        staged.as_file().sync_all().map_err(|e| TodoError::io(&tmp_path, e))?;
        Ok(staged)
    }
}

impl DocumentRepository for JsonFileRepository {
    fn load(&self) -> Result<Document, TodoError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no data file yet, starting empty");
                return Ok(Document::default());
            }
            Err(e) => return Err(TodoError::io(&self.path, e)),
        };
        let document: Document = serde_json::from_slice(&bytes).map_err(|e| TodoError::corrupt(&self.path, e))?;
        check_invariants(&document).map_err(|reason| TodoError::corrupt(&self.path, reason))?;
        info!(path = %self.path.display(), lists = document.lists.len(), "loaded");
        Ok(document)
    }

    fn save(&self, document: &Document) -> Result<(), TodoError> {
        let dir = self.dir();
        fs::create_dir_all(dir).map_err(|e| TodoError::io(dir, e))?;
        let staged = self.stage(document)?;
        debug!(tmp = %staged.path().display(), "staged snapshot");
        staged.persist(&self.path).map_err(|e| TodoError::io(&self.path, e.error))?;
        sync_dir(dir);
        debug!(path = %self.path.display(), lists = document.lists.len(), "saved");
        Ok(())
    }
}

/// What serde cannot express: non-blank ids and text, unique ids.
fn check_invariants(document: &Document) -> Result<(), String> {
    let mut list_ids = HashSet::new();
    for list in &document.lists {
        if list.id.0.trim().is_empty() {
            return Err("list with empty id".into());
        }
        if !list_ids.insert(&list.id) {
            return Err(format!("duplicate list id {}", list.id));
        }
        if list.name.trim().is_empty() {
            return Err(format!("list {} has an empty name", list.id));
        }
        let mut task_ids = HashSet::new();
        for task in &list.tasks {
            if task.id.0.trim().is_empty() {
                return Err(format!("task with empty id in list {}", list.id));
            }
            if !task_ids.insert(&task.id) {
                return Err(format!("duplicate task id {} in list {}", task.id, list.id));
            }
            if task.title.trim().is_empty() {
                return Err(format!("task {} has an empty title", task.id));
            }
        }
    }
    Ok(())
}

#[cfg(unix)]
fn sync_dir(dir: &Path) {
    if let Err(e) = fs::File::open(dir).and_then(|f| f.sync_all()) {
        warn!(dir = %dir.display(), error = %e, "could not sync data directory");
    }
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) {}
