use crate::domain::error::DomainError;
use crate::domain::ports::document_repository::DocumentRepository;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::ports::vector_index::{IndexMetadata, VectorIndex};
use std::sync::Arc;

/// Re-embeds every stored document and upserts it into the vector index.
/// Used after switching provider or index backend.
pub struct ReindexUseCase {
    repo: Arc<dyn DocumentRepository>,
    embedder: Arc<dyn EmbeddingProvider>,
    vector_index: Arc<dyn VectorIndex>,
}

impl ReindexUseCase {
    pub fn new(
        repo: Arc<dyn DocumentRepository>,
        embedder: Arc<dyn EmbeddingProvider>,
        vector_index: Arc<dyn VectorIndex>,
    ) -> Self {
        Self { repo, embedder, vector_index }
    }

    /// Stops at the first failure.
    pub async fn execute(&self) -> Result<usize, DomainError> {
        let documents = self.repo.get_all()?;
        let total = documents.len();
        if total == 0 {
            return Ok(0);
        }

        for document in &documents {
            let vector = self.embedder.create_embedding(document.embedding_text()).await?;
            self.vector_index
                .upsert(&document.id, &vector, &IndexMetadata::from(document))
                .await?;
            tracing::debug!(id = %document.id, "Reindexed document");
        }

        tracing::info!(count = total, "Reindexed documents");
        Ok(total)
    }
}
