use crate::domain::entities::widget::Widget;
use crate::domain::error::DomainError;
use crate::domain::ports::widget_repository::WidgetRepository;
use crate::infrastructure::sqlite::parse_timestamp;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::Mutex;

const SELECT_COLS: &str = "id, name, value, created_at, updated_at";

pub struct SqliteWidgetRepo {
    conn: Mutex<Connection>,
}

impl SqliteWidgetRepo {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn row_to_widget(row: &rusqlite::Row) -> Result<Widget, rusqlite::Error> {
        let created_str: String = row.get(3)?;
        let updated_str: String = row.get(4)?;
        Ok(Widget {
            id: row.get(0)?,
            name: row.get(1)?,
            value: row.get(2)?,
            created_at: parse_timestamp(&created_str),
            updated_at: parse_timestamp(&updated_str),
        })
    }
}

impl WidgetRepository for SqliteWidgetRepo {
    fn get_by_id(&self, id: &str) -> Result<Option<Widget>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let sql = format!("SELECT {SELECT_COLS} FROM widgets WHERE id = ?1");
        Ok(conn
            .query_row(&sql, params![id], Self::row_to_widget)
            .optional()?)
    }

    fn get_all(&self) -> Result<Vec<Widget>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let sql = format!("SELECT {SELECT_COLS} FROM widgets ORDER BY created_at ASC");
        let mut stmt = conn.prepare(&sql)?;
        let widgets = stmt
            .query_map([], Self::row_to_widget)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(widgets)
    }

    fn create(&self, widget: &Widget) -> Result<(), DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        conn.execute(
            "INSERT INTO widgets (id, name, value, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                widget.id,
                widget.name,
                widget.value,
                widget.created_at.to_rfc3339(),
                widget.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn update(&self, widget: &Widget) -> Result<(), DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let changed = conn.execute(
            "UPDATE widgets SET name = ?2, value = ?3, created_at = ?4, updated_at = ?5 WHERE id = ?1",
            params![
                widget.id,
                widget.name,
                widget.value,
                widget.created_at.to_rfc3339(),
                widget.updated_at.to_rfc3339(),
            ],
        )?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("widget {}", widget.id)));
        }
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        conn.execute("DELETE FROM widgets WHERE id = ?1", params![id])?;
        Ok(())
    }
}
