pub mod document_repo;
pub mod migrations;
pub mod vector_index;
pub mod widget_repo;

use chrono::{DateTime, Utc};

/// Stored timestamps are RFC 3339. Unreadable values fall back to the epoch
/// rather than failing the whole row.
pub(crate) fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|e| {
            tracing::warn!(value = s, error = %e, "Invalid timestamp in store");
            DateTime::<Utc>::default()
        })
}
