use crate::domain::entities::document::Document;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: usize = 5;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>, limit: Option<i64>) -> Self {
        Self {
            query: query.into(),
            limit,
        }
    }

    /// Absent and non-positive limits fall back to [`DEFAULT_LIMIT`].
    pub fn normalized_limit(&self) -> usize {
        match self.limit {
            Some(n) if n > 0 => usize::try_from(n).unwrap_or(usize::MAX),
            _ => DEFAULT_LIMIT,
        }
    }
}

/// A ranked match. `score` is the index's distance: lower is closer, and the
/// unit depends on the backing index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub score: f64,
    pub document: Document,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub query: String,
}
