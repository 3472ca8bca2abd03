use crate::domain::error::DomainError;
use crate::domain::ports::document_repository::DocumentRepository;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::ports::vector_index::{Candidate, VectorIndex};
use crate::domain::values::reconcile_policy::ReconcilePolicy;
use crate::domain::values::search::{SearchQuery, SearchResponse, SearchResult};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(60);

/// Embeds the query, asks the vector index for candidates, then read-repairs
/// candidates whose snapshot has no body from the Document Store.
///
/// Result order is the index's order. Nothing is re-ranked or deduplicated.
pub struct SearchUseCase {
    repo: Arc<dyn DocumentRepository>,
    embedder: Arc<dyn EmbeddingProvider>,
    vector_index: Arc<dyn VectorIndex>,
    policy: ReconcilePolicy,
    deadline: Duration,
}

impl SearchUseCase {
    pub fn new(
        repo: Arc<dyn DocumentRepository>,
        embedder: Arc<dyn EmbeddingProvider>,
        vector_index: Arc<dyn VectorIndex>,
    ) -> Self {
        Self {
            repo,
            embedder,
            vector_index,
            policy: ReconcilePolicy::default(),
            deadline: DEFAULT_DEADLINE,
        }
    }

    pub fn with_policy(mut self, policy: ReconcilePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Upper bound on the embedding and index calls together.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub async fn execute(&self, query: SearchQuery) -> Result<SearchResponse, DomainError> {
        if query.query.is_empty() {
            return Err(DomainError::InvalidQuery("query must not be empty".into()));
        }
        let limit = query.normalized_limit();
        tracing::info!(query = %query.query, limit, "Searching documents");

        let candidates = tokio::time::timeout(self.deadline, self.candidates(&query.query, limit))
            .await
            .map_err(|_| {
                tracing::error!(query = %query.query, deadline = ?self.deadline, "Search deadline exceeded");
                DomainError::search_failed(DomainError::DeadlineExceeded(self.deadline))
            })??;

        let mut results = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            results.push(self.reconcile(candidate)?);
        }

        tracing::debug!(query = %query.query, results = results.len(), "Search complete");
        Ok(SearchResponse {
            results,
            query: query.query,
        })
    }

    async fn candidates(&self, text: &str, limit: usize) -> Result<Vec<Candidate>, DomainError> {
        let vector = self.embedder.create_embedding(text).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to create query embedding");
            DomainError::search_failed(e)
        })?;

        self.vector_index
            .query(text, &vector, limit)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to query vector index");
                DomainError::search_failed(e)
            })
    }

    fn reconcile(&self, candidate: Candidate) -> Result<SearchResult, DomainError> {
        let Candidate {
            id,
            distance,
            snapshot,
        } = candidate;

        if !snapshot.value.is_empty() {
            return Ok(SearchResult {
                id,
                score: distance,
                document: snapshot,
            });
        }

        let document = match self.repo.get_by_id(&id) {
            Ok(Some(doc)) => doc,
            Ok(None) => {
                tracing::debug!(id = %id, "Indexed document missing from store, keeping snapshot");
                snapshot
            }
            Err(e) => match self.policy {
                ReconcilePolicy::BestEffort => {
                    tracing::warn!(id = %id, error = %e, "Failed to get document from store, keeping snapshot");
                    snapshot
                }
                ReconcilePolicy::FailFast => {
                    tracing::error!(id = %id, error = %e, "Failed to get document from store");
                    return Err(DomainError::search_failed(e));
                }
            },
        };

        Ok(SearchResult {
            id,
            score: distance,
            document,
        })
    }
}
