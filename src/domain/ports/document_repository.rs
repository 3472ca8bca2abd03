use crate::domain::entities::document::Document;
use crate::domain::error::DomainError;

pub trait DocumentRepository: Send + Sync {
    fn get_by_id(&self, id: &str) -> Result<Option<Document>, DomainError>;
    fn get_all(&self) -> Result<Vec<Document>, DomainError>;
    fn create(&self, document: &Document) -> Result<(), DomainError>;
    fn update(&self, document: &Document) -> Result<(), DomainError>;
    fn delete(&self, id: &str) -> Result<(), DomainError>;
}
