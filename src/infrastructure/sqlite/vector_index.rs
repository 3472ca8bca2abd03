use crate::domain::error::DomainError;
use crate::domain::ports::vector_index::{Candidate, IndexMetadata, VectorIndex};
use crate::infrastructure::sqlite::parse_timestamp;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::Mutex;

/// Local nearest-neighbour index kept in the same SQLite file as the
/// documents. Brute-force cosine distance over every stored vector.
pub struct SqliteVectorIndex {
    conn: Mutex<Connection>,
}

impl SqliteVectorIndex {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// `1 - cos(a, b)`; 1.0 when either side is zero or the lengths differ.
    fn cosine_distance(a: &[f32], b: &[f32]) -> f64 {
        if a.len() != b.len() || a.is_empty() {
            return 1.0;
        }
        let mut dot = 0.0_f64;
        let mut norm_a = 0.0_f64;
        let mut norm_b = 0.0_f64;
        for (x, y) in a.iter().zip(b.iter()) {
            let x = f64::from(*x);
            let y = f64::from(*y);
            dot += x * y;
            norm_a += x * x;
            norm_b += y * y;
        }
        let denom = norm_a.sqrt() * norm_b.sqrt();
        if denom == 0.0 {
            1.0
        } else {
            1.0 - dot / denom
        }
    }

    fn serialize_vector(v: &[f32]) -> Vec<u8> {
        v.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    fn deserialize_vector(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, DomainError> {
        self.conn
            .lock()
            .map_err(|e| DomainError::IndexUnavailable(e.to_string()))
    }

    /// Dimension of an arbitrary stored vector, if any are stored.
    pub fn stored_dimension(&self) -> Result<Option<usize>, DomainError> {
        let conn = self.lock()?;
        let len: Option<i64> = conn
            .query_row("SELECT length(vector) FROM vector_index LIMIT 1", [], |r| r.get(0))
            .optional()
            .map_err(|e| DomainError::IndexUnavailable(e.to_string()))?;
        Ok(len.map(|bytes| bytes as usize / 4))
    }
}

#[async_trait::async_trait]
impl VectorIndex for SqliteVectorIndex {
    async fn upsert(&self, id: &str, vector: &[f32], metadata: &IndexMetadata) -> Result<(), DomainError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO vector_index (id, vector, name, body, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                id,
                Self::serialize_vector(vector),
                metadata.name,
                metadata.text,
                metadata.created_at.map(|t| t.to_rfc3339()),
            ],
        )
        .map_err(|e| DomainError::IndexUnavailable(format!("Failed to store vector: {e}")))?;
        Ok(())
    }

    async fn query(&self, _query_text: &str, vector: &[f32], limit: usize) -> Result<Vec<Candidate>, DomainError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT id, vector, name, body, created_at FROM vector_index")
            .map_err(|e| DomainError::IndexUnavailable(e.to_string()))?;
        let rows = stmt
            .query_map([], |row| {
                let id: String = row.get(0)?;
                let blob: Vec<u8> = row.get(1)?;
                let name: String = row.get(2)?;
                let body: String = row.get(3)?;
                let created: Option<String> = row.get(4)?;
                Ok((id, blob, name, body, created))
            })
            .map_err(|e| DomainError::IndexUnavailable(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DomainError::IndexUnavailable(e.to_string()))?;

        let mut candidates: Vec<Candidate> = rows
            .into_iter()
            .map(|(id, blob, name, text, created)| {
                let distance = Self::cosine_distance(vector, &Self::deserialize_vector(&blob));
                let metadata = IndexMetadata {
                    name,
                    text,
                    created_at: created.as_deref().map(parse_timestamp),
                };
                Candidate::new(id, distance, metadata)
            })
            .collect();

        candidates.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        candidates.truncate(limit);
        Ok(candidates)
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM vector_index WHERE id = ?1", params![id])
            .map_err(|e| DomainError::IndexUnavailable(format!("Failed to delete vector: {e}")))?;
        Ok(())
    }
}
