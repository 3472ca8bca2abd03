pub mod api;
pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use crate::application::documents::DocumentUseCase;
use crate::application::reindex::ReindexUseCase;
use crate::application::search::SearchUseCase;
use crate::application::seed::{SeedReport, SeedUseCase};
use crate::application::widgets::WidgetUseCase;
use crate::config::{Config, EmbeddingBackend, IndexBackend};
use crate::domain::entities::document::Document;
use crate::domain::entities::widget::Widget;
use crate::domain::error::DomainError;
use crate::domain::ports::document_repository::DocumentRepository;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::ports::vector_index::VectorIndex;
use crate::domain::ports::widget_repository::WidgetRepository;
use crate::domain::values::reconcile_policy::ReconcilePolicy;
use crate::domain::values::search::{SearchQuery, SearchResponse};
use crate::infrastructure::embeddings::openai::OpenAiProvider;
use crate::infrastructure::embeddings::stub::StubProvider;
use crate::infrastructure::sqlite::document_repo::SqliteDocumentRepo;
use crate::infrastructure::sqlite::migrations::run_migrations;
use crate::infrastructure::sqlite::vector_index::SqliteVectorIndex;
use crate::infrastructure::sqlite::widget_repo::SqliteWidgetRepo;
use crate::infrastructure::vector::chroma::ChromaIndex;
use rusqlite::Connection;
use std::sync::Arc;
use std::time::Duration;

/// Application facade. Construction only wires dependencies; seeding and
/// collection resolution are separate, explicit steps ([`DocRag::seed`],
/// [`DocRag::bootstrap`]).
pub struct DocRag {
    documents: Arc<DocumentUseCase>,
    widgets: Arc<WidgetUseCase>,
    search_uc: SearchUseCase,
    seed_uc: SeedUseCase,
    reindex_uc: ReindexUseCase,
    chroma: Option<Arc<ChromaIndex>>,
}

/// Knobs for [`DocRag::with_providers`].
#[derive(Debug, Clone, Copy)]
pub struct SearchOptions {
    pub reconcile: ReconcilePolicy,
    pub deadline: Duration,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            reconcile: ReconcilePolicy::default(),
            deadline: crate::application::search::DEFAULT_DEADLINE,
        }
    }
}

/// `:memory:` becomes a uniquely named shared-cache database so every
/// connection opened for it sees the same data.
fn resolve_db_path(db_path: &str) -> String {
    if db_path == ":memory:" {
        format!("file:docrag-{}?mode=memory&cache=shared", uuid::Uuid::new_v4())
    } else {
        db_path.to_string()
    }
}

fn open_connections(path: &str, count: usize) -> Result<Vec<Connection>, DomainError> {
    (0..count)
        .map(|_| {
            let conn = Connection::open(path)
                .map_err(|e| DomainError::Database(format!("DB error: {e}")))?;
            conn.pragma_update(None, "journal_mode", "WAL")
                .map_err(|e| DomainError::Database(format!("WAL error: {e}")))?;
            conn.busy_timeout(Duration::from_secs(5))
                .map_err(|e| DomainError::Database(format!("DB error: {e}")))?;
            Ok(conn)
        })
        .collect()
}

impl DocRag {
    pub fn new(config: &Config) -> Result<Self, DomainError> {
        let embedder: Arc<dyn EmbeddingProvider> = match config.embedding {
            EmbeddingBackend::OpenAi => {
                let provider = OpenAiProvider::new(
                    config.openai_api_key.clone(),
                    config.openai_model.clone(),
                    config.openai_base_url.clone(),
                    config.http_timeout,
                )?;
                tracing::info!(model = provider.model(), dimension = provider.dimension(), "Using OpenAI embeddings");
                Arc::new(provider)
            }
            EmbeddingBackend::Stub => {
                tracing::info!("Using stub embeddings");
                Arc::new(StubProvider::default())
            }
        };
        let options = SearchOptions {
            reconcile: config.reconcile,
            deadline: config.search_deadline,
        };

        match config.index {
            IndexBackend::Chroma => {
                let chroma = Arc::new(ChromaIndex::new(
                    &config.chroma_url,
                    &config.chroma_collection,
                    config.http_timeout,
                )?);
                let mut app = Self::with_providers(&config.db_path, embedder, chroma.clone(), options)?;
                app.chroma = Some(chroma);
                Ok(app)
            }
            IndexBackend::Sqlite => {
                let db_path = resolve_db_path(&config.db_path);
                let conn = open_connections(&db_path, 1)?
                    .pop()
                    .ok_or_else(|| DomainError::Database("no connection".into()))?;
                run_migrations(&conn)?;
                let local = SqliteVectorIndex::new(conn);

                let provider_dim = embedder.dimension();
                if let Ok(Some(stored_dim)) = local.stored_dimension() {
                    if stored_dim != provider_dim {
                        tracing::warn!(
                            stored_dim,
                            provider_dim,
                            "Stored vectors do not match the embedding provider; run `reindex` to re-embed all documents"
                        );
                    }
                }

                Self::with_providers(&db_path, embedder, Arc::new(local), options)
            }
        }
    }

    pub fn with_providers(
        db_path: &str,
        embedder: Arc<dyn EmbeddingProvider>,
        vector_index: Arc<dyn VectorIndex>,
        options: SearchOptions,
    ) -> Result<Self, DomainError> {
        let mut conns = open_connections(&resolve_db_path(db_path), 2)?;
        run_migrations(&conns[0])?;
        let widget_conn = conns
            .pop()
            .ok_or_else(|| DomainError::Database("no connection".into()))?;
        let document_conn = conns
            .pop()
            .ok_or_else(|| DomainError::Database("no connection".into()))?;

        let document_repo: Arc<dyn DocumentRepository> = Arc::new(SqliteDocumentRepo::new(document_conn));
        let widget_repo: Arc<dyn WidgetRepository> = Arc::new(SqliteWidgetRepo::new(widget_conn));
        Ok(Self::from_parts(document_repo, widget_repo, embedder, vector_index, options))
    }

    /// Wire the facade from already-built stores. Tests use this to inject
    /// failing or instrumented repositories.
    pub fn from_parts(
        document_repo: Arc<dyn DocumentRepository>,
        widget_repo: Arc<dyn WidgetRepository>,
        embedder: Arc<dyn EmbeddingProvider>,
        vector_index: Arc<dyn VectorIndex>,
        options: SearchOptions,
    ) -> Self {
        let documents = Arc::new(DocumentUseCase::new(
            document_repo.clone(),
            embedder.clone(),
            vector_index.clone(),
        ));
        let widgets = Arc::new(WidgetUseCase::new(widget_repo));

        Self {
            search_uc: SearchUseCase::new(document_repo.clone(), embedder.clone(), vector_index.clone())
                .with_policy(options.reconcile)
                .with_deadline(options.deadline),
            seed_uc: SeedUseCase::new(documents.clone(), widgets.clone()),
            reindex_uc: ReindexUseCase::new(document_repo, embedder, vector_index),
            documents,
            widgets,
            chroma: None,
        }
    }

    /// Resolve the external vector collection, if one is configured.
    pub async fn bootstrap(&self) -> Result<(), DomainError> {
        if let Some(chroma) = &self.chroma {
            let id = chroma.ensure_ready().await?;
            tracing::info!(collection = chroma.collection_name(), id, "Vector collection ready");
        }
        Ok(())
    }

    pub async fn search(&self, query: SearchQuery) -> Result<SearchResponse, DomainError> {
        self.search_uc.execute(query).await
    }

    pub async fn seed(&self) -> Result<SeedReport, DomainError> {
        self.seed_uc.execute().await
    }

    pub async fn reindex(&self) -> Result<usize, DomainError> {
        self.reindex_uc.execute().await
    }

    // Documents

    pub fn get_document(&self, id: &str) -> Result<Document, DomainError> {
        self.documents.get(id)
    }

    pub fn list_documents(&self) -> Result<Vec<Document>, DomainError> {
        self.documents.list()
    }

    pub async fn create_document(&self, id: Option<String>, name: String, value: String) -> Result<Document, DomainError> {
        self.documents.create(id, name, value).await
    }

    pub async fn update_document(&self, id: &str, name: String, value: String) -> Result<Document, DomainError> {
        self.documents.update(id, name, value).await
    }

    pub async fn delete_document(&self, id: &str) -> Result<(), DomainError> {
        self.documents.delete(id).await
    }

    // Widgets

    pub fn get_widget(&self, id: &str) -> Result<Widget, DomainError> {
        self.widgets.get(id)
    }

    pub fn list_widgets(&self) -> Result<Vec<Widget>, DomainError> {
        self.widgets.list()
    }

    pub fn create_widget(&self, id: Option<String>, name: String, value: String) -> Result<Widget, DomainError> {
        self.widgets.create(id, name, value)
    }

    pub fn update_widget(&self, id: &str, name: String, value: String) -> Result<Widget, DomainError> {
        self.widgets.update(id, name, value)
    }

    pub fn delete_widget(&self, id: &str) -> Result<(), DomainError> {
        self.widgets.delete(id)
    }
}
