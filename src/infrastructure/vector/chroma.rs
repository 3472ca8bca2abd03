//! Chroma HTTP client implementing [`VectorIndex`].
//!
//! The collection is resolved lazily by name (list, then create with
//! `get_or_create`) and its id cached for the life of the client. Creating a
//! client performs no I/O; call [`ChromaIndex::ensure_ready`] during startup
//! to resolve eagerly.

use crate::domain::error::DomainError;
use crate::domain::ports::vector_index::{Candidate, IndexMetadata, VectorIndex};
use chrono::{DateTime, Utc};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use tokio::sync::OnceCell;

pub const DEFAULT_URL: &str = "http://localhost:8000";
pub const DEFAULT_COLLECTION: &str = "documents";

pub struct ChromaIndex {
    client: Client,
    base_url: String,
    collection_name: String,
    collection_id: OnceCell<String>,
}

#[derive(Debug, Deserialize)]
struct Collection {
    id: String,
    name: String,
}

/// Older servers wrap the listing, newer ones return a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListCollectionsResponse {
    Bare(Vec<Collection>),
    Wrapped { collections: Vec<Collection> },
}

impl ListCollectionsResponse {
    fn into_vec(self) -> Vec<Collection> {
        match self {
            ListCollectionsResponse::Bare(v) => v,
            ListCollectionsResponse::Wrapped { collections } => collections,
        }
    }
}

#[derive(Serialize)]
struct CreateCollectionRequest<'a> {
    name: &'a str,
    get_or_create: bool,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    ids: [&'a str; 1],
    embeddings: [&'a [f32]; 1],
    metadatas: [Map<String, Value>; 1],
    documents: [&'a str; 1],
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    query_embeddings: [&'a [f32]; 1],
    n_results: usize,
    include: [&'static str; 3],
}

#[derive(Debug, Default, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    ids: Vec<Vec<String>>,
    #[serde(default)]
    documents: Option<Vec<Vec<Option<String>>>>,
    #[serde(default)]
    metadatas: Option<Vec<Vec<Option<Map<String, Value>>>>>,
    #[serde(default)]
    distances: Option<Vec<Vec<f64>>>,
}

#[derive(Serialize)]
struct DeleteRequest<'a> {
    ids: [&'a str; 1],
}

impl ChromaIndex {
    pub fn new(base_url: &str, collection_name: &str, timeout: Duration) -> Result<Self, DomainError> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::IndexNotReady(format!("HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            collection_name: collection_name.to_string(),
            collection_id: OnceCell::new(),
        })
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    /// Resolve (and create if needed) the collection. Concurrent callers share
    /// one resolution; a failure is not cached.
    pub async fn ensure_ready(&self) -> Result<&str, DomainError> {
        self.collection_id
            .get_or_try_init(|| self.get_or_create_collection())
            .await
            .map(String::as_str)
    }

    async fn get_or_create_collection(&self) -> Result<String, DomainError> {
        let not_ready = |e: DomainError| {
            tracing::error!(collection = %self.collection_name, error = %e, "Vector collection unavailable");
            DomainError::IndexNotReady(format!("collection '{}': {e}", self.collection_name))
        };

        let existing = self.list_collections().await.map_err(not_ready)?;
        if let Some(col) = existing.into_iter().find(|c| c.name == self.collection_name) {
            tracing::debug!(collection = %col.name, id = %col.id, "Resolved existing vector collection");
            return Ok(col.id);
        }

        let id = self.create_collection().await.map_err(not_ready)?;
        tracing::info!(collection = %self.collection_name, id = %id, "Created vector collection");
        Ok(id)
    }

    async fn list_collections(&self) -> Result<Vec<Collection>, DomainError> {
        let url = format!("{}/api/v1/collections", self.base_url);
        let resp = self.client.get(&url).send().await.map_err(transport_error)?;
        let resp = check_status(resp, "list collections").await?;
        let listing: ListCollectionsResponse = resp.json().await.map_err(decode_error)?;
        Ok(listing.into_vec())
    }

    async fn create_collection(&self) -> Result<String, DomainError> {
        let url = format!("{}/api/v1/collections", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(&CreateCollectionRequest {
                name: &self.collection_name,
                get_or_create: true,
            })
            .send()
            .await
            .map_err(transport_error)?;
        let resp = check_status(resp, "create collection").await?;
        let created: Collection = resp.json().await.map_err(decode_error)?;
        Ok(created.id)
    }

    fn collection_url(&self, collection_id: &str, op: &str) -> String {
        format!("{}/api/v1/collections/{collection_id}/{op}", self.base_url)
    }

    fn to_candidates(resp: QueryResponse, limit: usize) -> Vec<Candidate> {
        let Some(ids) = resp.ids.into_iter().next() else {
            return Vec::new();
        };
        let mut documents = resp
            .documents
            .and_then(|d| d.into_iter().next())
            .unwrap_or_default()
            .into_iter();
        let mut metadatas = resp
            .metadatas
            .and_then(|m| m.into_iter().next())
            .unwrap_or_default()
            .into_iter();
        let mut distances = resp
            .distances
            .and_then(|d| d.into_iter().next())
            .unwrap_or_default()
            .into_iter();

        ids.into_iter()
            .take(limit)
            .map(|id| {
                let text = documents.next().flatten().unwrap_or_default();
                let meta = metadatas.next().flatten().unwrap_or_default();
                let distance = distances.next().unwrap_or(f64::MAX);
                let metadata = IndexMetadata {
                    name: meta
                        .get("name")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    text,
                    created_at: meta
                        .get("created_at")
                        .and_then(Value::as_str)
                        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                        .map(|dt| dt.with_timezone(&Utc)),
                };
                Candidate::new(id, distance, metadata)
            })
            .collect()
    }
}

fn transport_error(e: reqwest::Error) -> DomainError {
    tracing::error!(error = %e, "Vector index request failed");
    DomainError::IndexUnavailable(format!("request failed: {e}"))
}

fn decode_error(e: reqwest::Error) -> DomainError {
    tracing::error!(error = %e, "Failed to decode vector index response");
    DomainError::IndexUnavailable(format!("malformed response: {e}"))
}

async fn check_status(resp: Response, op: &str) -> Result<Response, DomainError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    tracing::error!(%status, body = %body, op, "Vector index API error");
    Err(DomainError::IndexUnavailable(format!("{op}: status {status}")))
}

#[async_trait::async_trait]
impl VectorIndex for ChromaIndex {
    async fn upsert(&self, id: &str, vector: &[f32], metadata: &IndexMetadata) -> Result<(), DomainError> {
        let collection_id = self.ensure_ready().await?;

        let mut meta = Map::new();
        meta.insert("name".into(), Value::String(metadata.name.clone()));
        if let Some(created) = metadata.created_at {
            meta.insert("created_at".into(), Value::String(created.to_rfc3339()));
        }

        let resp = self
            .client
            .post(self.collection_url(collection_id, "upsert"))
            .json(&UpsertRequest {
                ids: [id],
                embeddings: [vector],
                metadatas: [meta],
                documents: [metadata.text.as_str()],
            })
            .send()
            .await
            .map_err(transport_error)?;
        check_status(resp, "upsert").await?;
        Ok(())
    }

    async fn query(&self, _query_text: &str, vector: &[f32], limit: usize) -> Result<Vec<Candidate>, DomainError> {
        let collection_id = self.ensure_ready().await?;
        let resp = self
            .client
            .post(self.collection_url(collection_id, "query"))
            .json(&QueryRequest {
                query_embeddings: [vector],
                n_results: limit,
                include: ["metadatas", "documents", "distances"],
            })
            .send()
            .await
            .map_err(transport_error)?;
        let resp = check_status(resp, "query").await?;
        let parsed: QueryResponse = resp.json().await.map_err(decode_error)?;
        Ok(Self::to_candidates(parsed, limit))
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let collection_id = self.ensure_ready().await?;
        let resp = self
            .client
            .post(self.collection_url(collection_id, "delete"))
            .json(&DeleteRequest { ids: [id] })
            .send()
            .await
            .map_err(transport_error)?;
        check_status(resp, "delete").await?;
        Ok(())
    }
}
