//! Shared test helpers.
#![allow(dead_code)]

use docrag::domain::entities::document::Document;
use docrag::domain::error::DomainError;
use docrag::domain::ports::document_repository::DocumentRepository;
use docrag::domain::ports::embedding_port::EmbeddingProvider;
use docrag::domain::ports::vector_index::{Candidate, IndexMetadata, VectorIndex};
use docrag::domain::values::reconcile_policy::ReconcilePolicy;
use docrag::infrastructure::embeddings::stub::StubProvider;
use docrag::infrastructure::sqlite::document_repo::SqliteDocumentRepo;
use docrag::infrastructure::sqlite::migrations::run_migrations;
use docrag::infrastructure::sqlite::vector_index::SqliteVectorIndex;
use docrag::infrastructure::sqlite::widget_repo::SqliteWidgetRepo;
use docrag::{DocRag, SearchOptions};
use rusqlite::Connection;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Stub embeddings and a local SQLite index, all in memory.
pub fn setup() -> DocRag {
    let conn = Connection::open_in_memory().unwrap();
    run_migrations(&conn).unwrap();
    DocRag::with_providers(
        ":memory:",
        Arc::new(StubProvider::default()),
        Arc::new(SqliteVectorIndex::new(conn)),
        SearchOptions::default(),
    )
    .unwrap()
}

pub fn setup_with(
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    policy: ReconcilePolicy,
) -> DocRag {
    DocRag::with_providers(
        ":memory:",
        embedder,
        index,
        SearchOptions {
            reconcile: policy,
            ..SearchOptions::default()
        },
    )
    .unwrap()
}

/// Wires a caller-supplied document repository so store failures can be
/// injected.
pub fn setup_with_repo(
    repo: Arc<dyn DocumentRepository>,
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    options: SearchOptions,
) -> DocRag {
    let widget_conn = Connection::open_in_memory().unwrap();
    run_migrations(&widget_conn).unwrap();
    DocRag::from_parts(
        repo,
        Arc::new(SqliteWidgetRepo::new(widget_conn)),
        embedder,
        index,
        options,
    )
}

pub fn memory_document_repo() -> SqliteDocumentRepo {
    let conn = Connection::open_in_memory().unwrap();
    run_migrations(&conn).unwrap();
    SqliteDocumentRepo::new(conn)
}

pub fn candidate(id: &str, distance: f64, name: &str, text: &str) -> Candidate {
    Candidate::new(
        id,
        distance,
        IndexMetadata {
            name: name.into(),
            text: text.into(),
            created_at: None,
        },
    )
}

/// Stub embeddings that count invocations.
#[derive(Default)]
pub struct CountingEmbedder {
    pub calls: AtomicUsize,
}

impl CountingEmbedder {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for CountingEmbedder {
    async fn create_embedding(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(StubProvider::default().embed_sync(text))
    }

    fn dimension(&self) -> usize {
        StubProvider::default().dimension()
    }
}

pub struct FailingEmbedder;

#[async_trait::async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn create_embedding(&self, _text: &str) -> Result<Vec<f32>, DomainError> {
        Err(DomainError::ProviderUnavailable("status 503 Service Unavailable".into()))
    }

    fn dimension(&self) -> usize {
        384
    }
}

/// Never answers; used to trip the search deadline.
pub struct HangingEmbedder;

#[async_trait::async_trait]
impl EmbeddingProvider for HangingEmbedder {
    async fn create_embedding(&self, _text: &str) -> Result<Vec<f32>, DomainError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(vec![0.0; 384])
    }

    fn dimension(&self) -> usize {
        384
    }
}

/// Returns preset candidates and records every call.
#[derive(Default)]
pub struct FakeIndex {
    pub candidates: Vec<Candidate>,
    pub fail_queries: bool,
    pub fail_writes: bool,
    pub queries: AtomicUsize,
    pub last_limit: AtomicUsize,
    pub upserts: Mutex<Vec<String>>,
    pub deletes: Mutex<Vec<String>>,
}

impl FakeIndex {
    pub fn with_candidates(candidates: Vec<Candidate>) -> Self {
        Self {
            candidates,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_queries: true,
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn last_limit(&self) -> usize {
        self.last_limit.load(Ordering::SeqCst)
    }

    pub fn upserted(&self) -> Vec<String> {
        self.upserts.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deletes.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl VectorIndex for FakeIndex {
    async fn upsert(&self, id: &str, _vector: &[f32], _metadata: &IndexMetadata) -> Result<(), DomainError> {
        self.upserts.lock().unwrap().push(id.to_string());
        if self.fail_writes {
            return Err(DomainError::IndexUnavailable("upsert: status 500".into()));
        }
        Ok(())
    }

    async fn query(&self, _query_text: &str, _vector: &[f32], limit: usize) -> Result<Vec<Candidate>, DomainError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.last_limit.store(limit, Ordering::SeqCst);
        if self.fail_queries {
            return Err(DomainError::IndexUnavailable("query: status 500".into()));
        }
        Ok(self.candidates.iter().take(limit).cloned().collect())
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        self.deletes.lock().unwrap().push(id.to_string());
        if self.fail_writes {
            return Err(DomainError::IndexUnavailable("delete: status 500".into()));
        }
        Ok(())
    }
}

/// Document store whose lookups always fail; writes are discarded.
pub struct BrokenDocumentRepo;

impl DocumentRepository for BrokenDocumentRepo {
    fn get_by_id(&self, _id: &str) -> Result<Option<Document>, DomainError> {
        Err(DomainError::Database("disk I/O error".into()))
    }

    fn get_all(&self) -> Result<Vec<Document>, DomainError> {
        Err(DomainError::Database("disk I/O error".into()))
    }

    fn create(&self, _document: &Document) -> Result<(), DomainError> {
        Err(DomainError::Database("disk I/O error".into()))
    }

    fn update(&self, _document: &Document) -> Result<(), DomainError> {
        Err(DomainError::Database("disk I/O error".into()))
    }

    fn delete(&self, _id: &str) -> Result<(), DomainError> {
        Err(DomainError::Database("disk I/O error".into()))
    }
}
