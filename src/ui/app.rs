use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::error;

use crate::application::todo_service::TodoService;
use crate::domain::{ListId, Task, TaskId, TodoError, TodoList};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus { Lists, Tasks }

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    NewList,
    RenameList(ListId),
    AddTask(ListId),
    EditTask(ListId, TaskId),
}

impl Prompt {
    pub fn label(&self) -> &'static str {
        match self {
            Prompt::NewList => "New list (blank for auto-name)",
            Prompt::RenameList(_) => "Rename list",
            Prompt::AddTask(_) => "New task",
            Prompt::EditTask(..) => "Edit task",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Browse,
    Input { prompt: Prompt, buffer: String, error: Option<String> },
    ConfirmDelete(ListId),
}

/// Everything the terminal front end shows, driven one key at a time.
pub struct App<S: TodoService> {
    pub(crate) service: S,
    pub(crate) focus: Focus,
    pub(crate) list_cursor: usize,
    /// Index into [`App::visible_tasks`]: pending first, then completed.
    pub(crate) task_cursor: usize,
    pub(crate) mode: Mode,
    pub(crate) status: Option<String>,
    quit: bool,
}

impl<S: TodoService> App<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            focus: Focus::Lists,
            list_cursor: 0,
            task_cursor: 0,
            mode: Mode::Browse,
            status: None,
            quit: false,
        }
    }

    pub fn service(&self) -> &S { &self.service }

    pub fn should_quit(&self) -> bool { self.quit }

    pub fn selected_list(&self) -> Option<&TodoList> { self.service.lists().get(self.list_cursor) }

    pub fn visible_tasks(&self) -> Vec<&Task> {
        match self.selected_list() {
            Some(list) => list.pending_tasks().chain(list.completed_tasks()).collect(),
            None => Vec::new(),
        }
    }

    pub fn selected_task(&self) -> Option<&Task> { self.visible_tasks().get(self.task_cursor).copied() }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit = true;
            return;
        }
        match self.mode.clone() {
            Mode::Browse => self.browse_key(key.code),
            Mode::Input { prompt, mut buffer, .. } => match key.code {
                KeyCode::Esc => self.mode = Mode::Browse,
                KeyCode::Enter => self.submit(prompt, buffer),
                KeyCode::Backspace => {
                    buffer.pop();
                    self.mode = Mode::Input { prompt, buffer, error: None };
                }
                KeyCode::Char(c) => {
                    buffer.push(c);
                    self.mode = Mode::Input { prompt, buffer, error: None };
                }
                _ => {}
            },
            Mode::ConfirmDelete(id) => {
                self.mode = Mode::Browse;
                if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
                    self.delete_list(&id);
                } else {
                    self.status = Some("Delete cancelled".into());
                }
            }
        }
    }

    fn browse_key(&mut self, code: KeyCode) {
        self.status = None;
        match code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus { Focus::Lists => Focus::Tasks, Focus::Tasks => Focus::Lists };
            }
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::Char('n') => self.open_prompt(Prompt::NewList, String::new()),
            KeyCode::Char('r') => {
                if let Some(list) = self.selected_list() {
                    let (id, name) = (list.id.clone(), list.name.clone());
                    self.open_prompt(Prompt::RenameList(id), name);
                }
            }
            KeyCode::Char('D') => self.confirm_delete_list(),
            KeyCode::Char('a') => {
                if let Some(id) = self.selected_list().map(|l| l.id.clone()) {
                    self.focus = Focus::Tasks;
                    self.open_prompt(Prompt::AddTask(id), String::new());
                }
            }
            _ => match self.focus {
                Focus::Lists => self.lists_key(code),
                Focus::Tasks => self.tasks_key(code),
            },
        }
    }

    fn lists_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter | KeyCode::Right => self.focus = Focus::Tasks,
            KeyCode::Char('d') => self.confirm_delete_list(),
            _ => {}
        }
    }

    fn tasks_key(&mut self, code: KeyCode) {
        let Some((list, task)) = self.selected_ids() else {
            if code == KeyCode::Left {
                self.focus = Focus::Lists;
            }
            return;
        };
        match code {
            KeyCode::Left => self.focus = Focus::Lists,
            KeyCode::Enter | KeyCode::Char(' ') => {
                let toggled = self.service.toggle_task(&list, &task);
                if let Some(toggled) = self.report(toggled).flatten() {
                    self.follow_task(&toggled.id);
                }
            }
            KeyCode::Char('e') => {
                let title = self.selected_task().map(|t| t.title.clone()).unwrap_or_default();
                self.open_prompt(Prompt::EditTask(list, task), title);
            }
            KeyCode::Char('d') => {
                let deleted = self.service.delete_task(&list, &task);
                if self.report(deleted) == Some(true) {
                    self.status = Some("Task deleted".into());
                }
                self.clamp();
            }
            _ => {}
        }
    }

    fn selected_ids(&self) -> Option<(ListId, TaskId)> {
        let list = self.selected_list()?.id.clone();
        let task = self.selected_task()?.id.clone();
        Some((list, task))
    }

    fn open_prompt(&mut self, prompt: Prompt, buffer: String) {
        self.mode = Mode::Input { prompt, buffer, error: None };
    }

    fn confirm_delete_list(&mut self) {
        if let Some(id) = self.selected_list().map(|l| l.id.clone()) {
            self.mode = Mode::ConfirmDelete(id);
        }
    }

    fn delete_list(&mut self, id: &ListId) {
        let deleted = self.service.delete_list(id);
        if self.report(deleted) == Some(true) {
            self.status = Some("List deleted".into());
            self.task_cursor = 0;
        }
        self.clamp();
    }

    /// Runs the prompt's operation. A validation failure keeps the prompt
    /// open with the reason; anything else closes it.
    fn submit(&mut self, prompt: Prompt, buffer: String) {
        let outcome = match &prompt {
            Prompt::NewList => self.service.create_list(Some(&buffer)).map(|l| Some(format!("Created \"{}\"", l.name))),
            Prompt::RenameList(id) => self.service.rename_list(id, &buffer).map(|l| l.map(|l| format!("Renamed to \"{}\"", l.name))),
            Prompt::AddTask(id) => self.service.add_task(id, &buffer).map(|t| t.map(|t| format!("Added \"{}\"", t.title))),
            Prompt::EditTask(list, task) => self.service.update_task(list, task, &buffer).map(|t| t.map(|_| "Task updated".to_string())),
        };
        match outcome {
            Err(TodoError::Validation(reason)) => {
                self.mode = Mode::Input { prompt, buffer, error: Some(reason.to_string()) };
                return;
            }
            Err(e) => self.fail(e),
            Ok(message) => {
                self.status = message;
                match prompt {
                    Prompt::NewList => {
                        self.list_cursor = self.service.lists().len().saturating_sub(1);
                        self.task_cursor = 0;
                    }
                    Prompt::AddTask(_) => self.task_cursor = self.pending_count().saturating_sub(1),
                    _ => {}
                }
            }
        }
        self.mode = Mode::Browse;
        self.clamp();
    }

    /// Surfaces an error in the status line and returns the success value.
    fn report<T>(&mut self, result: Result<T, TodoError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.fail(e);
                None
            }
        }
    }

    fn fail(&mut self, e: TodoError) {
        error!(error = %e, "operation failed");
        self.status = Some(format!("Error: {e}"));
    }

    fn pending_count(&self) -> usize { self.selected_list().map_or(0, |l| l.pending_tasks().count()) }

    fn follow_task(&mut self, id: &TaskId) {
        if let Some(pos) = self.visible_tasks().iter().position(|t| &t.id == id) {
            self.task_cursor = pos;
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        match self.focus {
            Focus::Lists => {
                let before = self.list_cursor;
                self.list_cursor = step(self.list_cursor, delta, self.service.lists().len());
                if before != self.list_cursor {
                    self.task_cursor = 0;
                }
            }
            Focus::Tasks => self.task_cursor = step(self.task_cursor, delta, self.visible_tasks().len()),
        }
    }

    fn clamp(&mut self) {
        self.list_cursor = self.list_cursor.min(self.service.lists().len().saturating_sub(1));
        self.task_cursor = self.task_cursor.min(self.visible_tasks().len().saturating_sub(1));
    }
}

fn step(cursor: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    cursor.saturating_add_signed(delta).min(len - 1)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use crossterm::event::{KeyCode, KeyEvent};

    use super::*;
    use crate::application::todo_service::TodoServiceImpl;
    use crate::domain::{repository::DocumentRepository, Document};

    #[derive(Default)]
    struct Scratch {
        fail: Cell<bool>,
    }

    impl DocumentRepository for Scratch {
        fn load(&self) -> Result<Document, TodoError> { Ok(Document::default()) }
        fn save(&self, _document: &Document) -> Result<(), TodoError> {
            if self.fail.get() {
                return Err(TodoError::io("scratch", std::io::Error::other("read-only")));
            }
            Ok(())
        }
    }

    fn app() -> App<TodoServiceImpl<Scratch>> { App::new(TodoServiceImpl::new(Scratch::default(), Document::default())) }

    fn press(app: &mut App<TodoServiceImpl<Scratch>>, keys: &str) {
        for c in keys.chars() {
            let code = match c {
                '\n' => KeyCode::Enter,
                '\t' => KeyCode::Tab,
                '\x1b' => KeyCode::Esc,
                c => KeyCode::Char(c),
            };
            app.handle_key(KeyEvent::from(code));
        }
    }

    #[test]
    fn creating_unnamed_lists_auto_names_them() {
        let mut app = app();
        press(&mut app, "n\nn\nn\n");
        let names: Vec<_> = app.service().lists().iter().map(|l| l.name.clone()).collect();
        assert_eq!(names, ["List 1", "List 2", "List 3"]);
        assert_eq!(app.selected_list().unwrap().name, "List 3");
    }

    #[test]
    fn blank_task_keeps_prompt_open_with_reason() {
        let mut app = app();
        press(&mut app, "n\na   \n");
        match &app.mode {
            Mode::Input { prompt: Prompt::AddTask(_), error: Some(reason), .. } => assert!(reason.contains("empty")),
            other => panic!("unexpected mode {other:?}"),
        }
        press(&mut app, "\x1b");
        assert_eq!(app.mode, Mode::Browse);
        assert!(app.selected_list().unwrap().tasks.is_empty());
    }

    #[test]
    fn toggled_task_moves_to_completed_and_cursor_follows() {
        let mut app = app();
        press(&mut app, "n\nafirst\nasecond\n");
        assert_eq!(app.selected_task().unwrap().title, "second");

        press(&mut app, "k ");
        let tasks: Vec<_> = app.visible_tasks().iter().map(|t| (t.title.clone(), t.completed)).collect();
        assert_eq!(tasks, [("second".to_string(), false), ("first".to_string(), true)]);
        assert_eq!(app.selected_task().unwrap().title, "first");
    }

    #[test]
    fn delete_list_requires_confirmation() {
        let mut app = app();
        press(&mut app, "n\n\tD");
        assert!(matches!(app.mode, Mode::ConfirmDelete(_)));
        press(&mut app, "n");
        assert_eq!(app.service().lists().len(), 1);
        press(&mut app, "Dy");
        assert!(app.service().lists().is_empty());
        assert_eq!(app.status.as_deref(), Some("List deleted"));
    }

    #[test]
    fn rename_prefills_current_name() {
        let mut app = app();
        press(&mut app, "nHome\nr");
        match &app.mode {
            Mode::Input { prompt: Prompt::RenameList(_), buffer, .. } => assert_eq!(buffer, "Home"),
            other => panic!("unexpected mode {other:?}"),
        }
        press(&mut app, "s\n");
        assert_eq!(app.selected_list().unwrap().name, "Homes");
    }

    #[test]
    fn escape_cancels_prompts_but_never_quits() {
        let mut app = app();
        press(&mut app, "n\x1b");
        assert_eq!(app.mode, Mode::Browse);
        press(&mut app, "\x1b\x1b");
        assert!(!app.should_quit());
        assert!(app.service().lists().is_empty());

        press(&mut app, "q");
        assert!(app.should_quit());
    }

    #[test]
    fn save_failure_is_reported_and_nothing_changes() {
        let mut app = app();
        press(&mut app, "n\natask\n");
        app.service.repository().fail.set(true);

        press(&mut app, " ");
        assert!(app.status.as_deref().unwrap().starts_with("Error:"));
        assert!(!app.selected_task().unwrap().completed);
    }

    #[test]
    fn edit_and_delete_task() {
        let mut app = app();
        press(&mut app, "n\naold\ne");
        app.handle_key(KeyEvent::from(KeyCode::Backspace));
        app.handle_key(KeyEvent::from(KeyCode::Backspace));
        app.handle_key(KeyEvent::from(KeyCode::Backspace));
        press(&mut app, "new\n");
        assert_eq!(app.selected_task().unwrap().title, "new");

        press(&mut app, "d");
        assert!(app.visible_tasks().is_empty());
        assert_eq!(app.status.as_deref(), Some("Task deleted"));
    }
}
