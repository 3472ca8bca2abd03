use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored document. The Document Store owns the authoritative copy; the
/// vector index only keeps a possibly stale snapshot of it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub name: String,
    pub value: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub fn new(id: Option<String>, name: String, value: String) -> Self {
        let now = Utc::now();
        Self {
            id: id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            name,
            value,
            created_at: now,
            updated_at: now,
        }
    }

    /// Text handed to the embedding provider when indexing.
    pub fn embedding_text(&self) -> &str {
        &self.value
    }
}
