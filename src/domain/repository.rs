use super::document::Document;
use super::error::TodoError;

/// Whole-document persistence: every save replaces the stored snapshot.
pub trait DocumentRepository {
    fn load(&self) -> Result<Document, TodoError>;
    fn save(&self, document: &Document) -> Result<(), TodoError>;
}
