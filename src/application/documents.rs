use crate::domain::entities::document::Document;
use crate::domain::error::DomainError;
use crate::domain::ports::document_repository::DocumentRepository;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::ports::vector_index::{IndexMetadata, VectorIndex};
use chrono::Utc;
use std::sync::Arc;

/// Document CRUD. The store is authoritative; index maintenance after a
/// write is best-effort and never fails the write.
pub struct DocumentUseCase {
    repo: Arc<dyn DocumentRepository>,
    embedder: Arc<dyn EmbeddingProvider>,
    vector_index: Arc<dyn VectorIndex>,
}

impl DocumentUseCase {
    pub fn new(
        repo: Arc<dyn DocumentRepository>,
        embedder: Arc<dyn EmbeddingProvider>,
        vector_index: Arc<dyn VectorIndex>,
    ) -> Self {
        Self {
            repo,
            embedder,
            vector_index,
        }
    }

    pub fn get(&self, id: &str) -> Result<Document, DomainError> {
        tracing::debug!(id, "Retrieving document");
        self.repo.get_by_id(id)?.ok_or_else(|| {
            tracing::warn!(id, "Document not found");
            DomainError::NotFound(format!("document {id}"))
        })
    }

    pub fn list(&self) -> Result<Vec<Document>, DomainError> {
        self.repo.get_all()
    }

    pub async fn create(&self, id: Option<String>, name: String, value: String) -> Result<Document, DomainError> {
        validate_name(&name)?;
        let document = Document::new(id, name, value);
        tracing::info!(id = %document.id, name = %document.name, "Creating document");

        self.repo.create(&document)?;
        self.index(&document).await;
        Ok(document)
    }

    pub async fn update(&self, id: &str, name: String, value: String) -> Result<Document, DomainError> {
        validate_name(&name)?;
        tracing::info!(id, "Updating document");

        let existing = self.repo.get_by_id(id)?.ok_or_else(|| {
            tracing::warn!(id, "Document not found for update");
            DomainError::NotFound(format!("document {id}"))
        })?;

        let document = Document {
            name,
            value,
            updated_at: Utc::now(),
            ..existing
        };
        self.repo.update(&document)?;
        self.index(&document).await;
        Ok(document)
    }

    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        tracing::info!(id, "Deleting document");
        if self.repo.get_by_id(id)?.is_none() {
            tracing::warn!(id, "Document not found for deletion");
            return Err(DomainError::NotFound(format!("document {id}")));
        }

        self.repo.delete(id)?;
        if let Err(e) = self.vector_index.delete(id).await {
            tracing::warn!(id, error = %e, "Failed to remove document from vector index");
        }
        Ok(())
    }

    async fn index(&self, document: &Document) {
        let vector = match self.embedder.create_embedding(document.embedding_text()).await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(id = %document.id, error = %e, "Failed to embed document, skipping index");
                return;
            }
        };
        if let Err(e) = self
            .vector_index
            .upsert(&document.id, &vector, &IndexMetadata::from(document))
            .await
        {
            tracing::warn!(id = %document.id, error = %e, "Failed to index document");
        }
    }
}

pub(crate) fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidInput("name must not be empty".into()));
    }
    Ok(())
}
