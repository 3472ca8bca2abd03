use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Embedding provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Embedding provider misconfigured: {0}")]
    ProviderConfig(String),

    #[error("Vector index unavailable: {0}")]
    IndexUnavailable(String),

    #[error("Vector index not ready: {0}")]
    IndexNotReady(String),

    #[error("Deadline exceeded after {0:?}")]
    DeadlineExceeded(std::time::Duration),

    #[error("Search failed: {0}")]
    SearchFailed(#[source] Box<DomainError>),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn search_failed(cause: DomainError) -> Self {
        DomainError::SearchFailed(Box::new(cause))
    }

    /// Whether the error was caused by the caller rather than by a dependency.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidQuery(_)
                | DomainError::InvalidInput(_)
                | DomainError::NotFound(_)
                | DomainError::Conflict(_)
        )
    }
}

impl From<rusqlite::Error> for DomainError {
    fn from(e: rusqlite::Error) -> Self {
        match &e {
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                DomainError::Conflict(e.to_string())
            }
            _ => DomainError::Database(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_failed_keeps_cause() {
        let err = DomainError::search_failed(DomainError::ProviderUnavailable("503".into()));
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("Embedding provider unavailable: 503"));
        assert!(!err.is_client_error());
    }

    #[test]
    fn constraint_violation_maps_to_conflict() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (name TEXT UNIQUE); INSERT INTO t VALUES ('a');")
            .unwrap();
        let err: DomainError = conn
            .execute("INSERT INTO t VALUES ('a')", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, DomainError::Conflict(_)));
    }
}
