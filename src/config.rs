use crate::domain::values::reconcile_policy::ReconcilePolicy;
use crate::infrastructure::vector::chroma;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingBackend {
    OpenAi,
    Stub,
}

impl FromStr for EmbeddingBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(EmbeddingBackend::OpenAi),
            "stub" | "mock" => Ok(EmbeddingBackend::Stub),
            _ => Err(format!("Unknown embedding provider: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexBackend {
    Chroma,
    Sqlite,
}

impl FromStr for IndexBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chroma" => Ok(IndexBackend::Chroma),
            "sqlite" | "local" => Ok(IndexBackend::Sqlite),
            _ => Err(format!("Unknown vector index: {s}")),
        }
    }
}

/// Runtime settings, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub addr: String,
    pub embedding: EmbeddingBackend,
    pub openai_api_key: String,
    pub openai_model: Option<String>,
    pub openai_base_url: Option<String>,
    pub index: IndexBackend,
    pub chroma_url: String,
    pub chroma_collection: String,
    pub http_timeout: Duration,
    pub search_deadline: Duration,
    pub reconcile: ReconcilePolicy,
    pub seed: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: "./docrag.db".into(),
            addr: "0.0.0.0:8711".into(),
            embedding: EmbeddingBackend::Stub,
            openai_api_key: String::new(),
            openai_model: None,
            openai_base_url: None,
            index: IndexBackend::Sqlite,
            chroma_url: chroma::DEFAULT_URL.into(),
            chroma_collection: chroma::DEFAULT_COLLECTION.into(),
            http_timeout: Duration::from_secs(30),
            search_deadline: crate::application::search::DEFAULT_DEADLINE,
            reconcile: ReconcilePolicy::default(),
            seed: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unparseable values keep the
    /// default and log a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            db_path: get("DOCRAG_DB").unwrap_or(defaults.db_path),
            addr: get("DOCRAG_ADDR").unwrap_or(defaults.addr),
            embedding: parse_or(get("DOCRAG_EMBEDDING_PROVIDER"), "DOCRAG_EMBEDDING_PROVIDER", defaults.embedding),
            openai_api_key: get("OPENAI_API_KEY").unwrap_or_default(),
            openai_model: get("OPENAI_EMBEDDING_MODEL"),
            openai_base_url: get("OPENAI_BASE_URL"),
            index: parse_or(get("DOCRAG_VECTOR_INDEX"), "DOCRAG_VECTOR_INDEX", defaults.index),
            chroma_url: get("CHROMA_URL").unwrap_or(defaults.chroma_url),
            chroma_collection: get("CHROMA_COLLECTION").unwrap_or(defaults.chroma_collection),
            http_timeout: secs(get("DOCRAG_HTTP_TIMEOUT_SECS"), "DOCRAG_HTTP_TIMEOUT_SECS", defaults.http_timeout),
            search_deadline: secs(get("DOCRAG_SEARCH_DEADLINE_SECS"), "DOCRAG_SEARCH_DEADLINE_SECS", defaults.search_deadline),
            reconcile: parse_or(get("DOCRAG_RECONCILE"), "DOCRAG_RECONCILE", defaults.reconcile),
            seed: parse_or(get("DOCRAG_SEED"), "DOCRAG_SEED", defaults.seed),
        }
    }
}

/// Whole seconds, at least one.
fn secs(raw: Option<String>, key: &str, default: Duration) -> Duration {
    Duration::from_secs(parse_or(raw, key, default.as_secs()).max(1))
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            tracing::warn!(key, value = %raw, error = %e, "Ignoring invalid setting");
            default
        }),
    }
}
