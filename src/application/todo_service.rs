use tracing::{info, warn};

use crate::domain::{
    repository::DocumentRepository, Document, ListId, Task, TaskId, TodoError, TodoList,
};

/// Operations the UI drives. Lookups of unknown ids yield `None`/`false`;
/// every successful mutation has been saved by the time it returns.
pub trait TodoService {
    fn document(&self) -> &Document;
    fn lists(&self) -> &[TodoList] { &self.document().lists }
    fn list(&self, id: &ListId) -> Option<&TodoList> { self.document().list(id) }
    fn create_list(&mut self, name: Option<&str>) -> Result<TodoList, TodoError>;
    fn rename_list(&mut self, id: &ListId, name: &str) -> Result<Option<TodoList>, TodoError>;
    fn delete_list(&mut self, id: &ListId) -> Result<bool, TodoError>;
    fn add_task(&mut self, list: &ListId, title: &str) -> Result<Option<Task>, TodoError>;
    fn update_task(&mut self, list: &ListId, task: &TaskId, title: &str) -> Result<Option<Task>, TodoError>;
    fn delete_task(&mut self, list: &ListId, task: &TaskId) -> Result<bool, TodoError>;
    fn toggle_task(&mut self, list: &ListId, task: &TaskId) -> Result<Option<Task>, TodoError>;
}

/// Owns the process's single in-memory [`Document`] and the repository it
/// is persisted through.
pub struct TodoServiceImpl<R: DocumentRepository> {
    repo: R,
    document: Document,
}

impl<R: DocumentRepository> TodoServiceImpl<R> {
    pub fn new(repo: R, document: Document) -> Self { Self { repo, document } }

    /// Loads the stored document; a corrupt file is reported, never replaced.
    pub fn open(repo: R) -> Result<Self, TodoError> {
        let document = repo.load()?;
        Ok(Self::new(repo, document))
    }

    pub fn repository(&self) -> &R { &self.repo }

    fn has_task(&self, list: &ListId, task: &TaskId) -> bool {
        self.document.list(list).is_some_and(|l| l.task(task).is_some())
    }

    /// Applies `change` to a copy of the document and saves the copy. The
    /// copy replaces the live document only once it is on disk, so a failed
    /// save (or a rejected change) leaves memory as it was.
    fn commit<T>(
        &mut self,
        op: &'static str,
        change: impl FnOnce(&mut Document) -> Result<T, TodoError>,
    ) -> Result<T, TodoError> {
        let mut draft = self.document.clone();
        let out = change(&mut draft)?;
        if let Err(e) = self.repo.save(&draft) {
            warn!(op, error = %e, "save failed, change discarded");
            return Err(e);
        }
        self.document = draft;
        info!(op, lists = self.document.lists.len(), "saved");
        Ok(out)
    }
}

impl<R: DocumentRepository> TodoService for TodoServiceImpl<R> {
    fn document(&self) -> &Document { &self.document }

    fn create_list(&mut self, name: Option<&str>) -> Result<TodoList, TodoError> {
        self.commit("create_list", |doc| Ok(doc.create_list(name).clone()))
    }

    fn rename_list(&mut self, id: &ListId, name: &str) -> Result<Option<TodoList>, TodoError> {
        if self.document.list(id).is_none() {
            return Ok(None);
        }
        self.commit("rename_list", |doc| {
            doc.rename_list(id, name)?;
            Ok(doc.list(id).cloned())
        })
    }

    fn delete_list(&mut self, id: &ListId) -> Result<bool, TodoError> {
        if self.document.list(id).is_none() {
            return Ok(false);
        }
        self.commit("delete_list", |doc| Ok(doc.remove_list(id)))
    }

    fn add_task(&mut self, list: &ListId, title: &str) -> Result<Option<Task>, TodoError> {
        if self.document.list(list).is_none() {
            return Ok(None);
        }
        self.commit("add_task", |doc| match doc.list_mut(list) {
            Some(target) => Ok(Some(target.add_task(title)?.clone())),
            None => Ok(None),
        })
    }

    fn update_task(&mut self, list: &ListId, task: &TaskId, title: &str) -> Result<Option<Task>, TodoError> {
        if !self.has_task(list, task) {
            return Ok(None);
        }
        self.commit("update_task", |doc| match doc.list_mut(list).and_then(|l| l.task_mut(task)) {
            Some(found) => {
                found.set_title(title)?;
                Ok(Some(found.clone()))
            }
            None => Ok(None),
        })
    }

    fn delete_task(&mut self, list: &ListId, task: &TaskId) -> Result<bool, TodoError> {
        if !self.has_task(list, task) {
            return Ok(false);
        }
        self.commit("delete_task", |doc| Ok(doc.list_mut(list).is_some_and(|l| l.remove_task(task))))
    }

    fn toggle_task(&mut self, list: &ListId, task: &TaskId) -> Result<Option<Task>, TodoError> {
        if !self.has_task(list, task) {
            return Ok(None);
        }
        self.commit("toggle_task", |doc| {
            let toggled = doc.list_mut(list).and_then(|l| l.task_mut(task)).map(|t| {
                t.toggle();
                t.clone()
            });
            Ok(toggled)
        })
    }
}
