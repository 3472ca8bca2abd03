use crate::domain::entities::document::Document;
use crate::domain::error::DomainError;
use chrono::{DateTime, Utc};

/// Display data stored next to a vector at upsert time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexMetadata {
    pub name: String,
    pub text: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&Document> for IndexMetadata {
    fn from(doc: &Document) -> Self {
        Self {
            name: doc.name.clone(),
            text: doc.value.clone(),
            created_at: Some(doc.created_at),
        }
    }
}

/// A tentative match from the index. The snapshot holds whatever metadata
/// was stored at upsert time and may be stale or have an empty body.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub id: String,
    pub distance: f64,
    pub snapshot: Document,
}

impl Candidate {
    pub fn new(id: impl Into<String>, distance: f64, metadata: IndexMetadata) -> Self {
        let id = id.into();
        Self {
            snapshot: Document {
                id: id.clone(),
                name: metadata.name,
                value: metadata.text,
                created_at: metadata.created_at.unwrap_or_default(),
                updated_at: metadata.created_at.unwrap_or_default(),
            },
            id,
            distance,
        }
    }
}

#[async_trait::async_trait]
pub trait VectorIndex: Send + Sync {
    async fn upsert(&self, id: &str, vector: &[f32], metadata: &IndexMetadata) -> Result<(), DomainError>;

    /// At most `limit` candidates ordered by ascending distance. An empty
    /// index yields an empty vec. `query_text` is advisory; the vector decides.
    async fn query(&self, query_text: &str, vector: &[f32], limit: usize) -> Result<Vec<Candidate>, DomainError>;

    /// Deleting an unknown id is not an error.
    async fn delete(&self, id: &str) -> Result<(), DomainError>;
}
