pub mod document;
pub mod error;
pub mod repository;
pub mod text;
pub mod todo;

pub use document::Document;
pub use error::{TodoError, ValidationError};
pub use repository::DocumentRepository;
pub use todo::{ListId, Task, TaskId, TodoList};
