use crate::domain::entities::document::Document;
use crate::domain::error::DomainError;
use crate::domain::ports::document_repository::DocumentRepository;
use crate::infrastructure::sqlite::parse_timestamp;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::Mutex;

const SELECT_COLS: &str = "id, name, value, created_at, updated_at";

pub struct SqliteDocumentRepo {
    conn: Mutex<Connection>,
}

impl SqliteDocumentRepo {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn row_to_document(row: &rusqlite::Row) -> Result<Document, rusqlite::Error> {
        let created_str: String = row.get(3)?;
        let updated_str: String = row.get(4)?;
        Ok(Document {
            id: row.get(0)?,
            name: row.get(1)?,
            value: row.get(2)?,
            created_at: parse_timestamp(&created_str),
            updated_at: parse_timestamp(&updated_str),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, DomainError> {
        self.conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))
    }
}

impl DocumentRepository for SqliteDocumentRepo {
    fn get_by_id(&self, id: &str) -> Result<Option<Document>, DomainError> {
        let conn = self.lock()?;
        let sql = format!("SELECT {SELECT_COLS} FROM documents WHERE id = ?1");
        let doc = conn
            .query_row(&sql, params![id], Self::row_to_document)
            .optional()?;
        Ok(doc)
    }

    fn get_all(&self) -> Result<Vec<Document>, DomainError> {
        let conn = self.lock()?;
        let sql = format!("SELECT {SELECT_COLS} FROM documents ORDER BY created_at ASC");
        let mut stmt = conn.prepare(&sql)?;
        let docs = stmt
            .query_map([], Self::row_to_document)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(docs)
    }

    fn create(&self, document: &Document) -> Result<(), DomainError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO documents (id, name, value, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                document.id,
                document.name,
                document.value,
                document.created_at.to_rfc3339(),
                document.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn update(&self, document: &Document) -> Result<(), DomainError> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE documents SET name = ?2, value = ?3, created_at = ?4, updated_at = ?5 WHERE id = ?1",
            params![
                document.id,
                document.name,
                document.value,
                document.created_at.to_rfc3339(),
                document.updated_at.to_rfc3339(),
            ],
        )?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("document {}", document.id)));
        }
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), DomainError> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM documents WHERE id = ?1", params![id])?;
        Ok(())
    }
}
