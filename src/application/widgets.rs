use crate::application::documents::validate_name;
use crate::domain::entities::widget::Widget;
use crate::domain::error::DomainError;
use crate::domain::ports::widget_repository::WidgetRepository;
use chrono::Utc;
use std::sync::Arc;

pub struct WidgetUseCase {
    repo: Arc<dyn WidgetRepository>,
}

impl WidgetUseCase {
    pub fn new(repo: Arc<dyn WidgetRepository>) -> Self {
        Self { repo }
    }

    pub fn get(&self, id: &str) -> Result<Widget, DomainError> {
        self.repo.get_by_id(id)?.ok_or_else(|| {
            tracing::warn!(id, "Widget not found");
            DomainError::NotFound(format!("widget {id}"))
        })
    }

    pub fn list(&self) -> Result<Vec<Widget>, DomainError> {
        self.repo.get_all()
    }

    pub fn create(&self, id: Option<String>, name: String, value: String) -> Result<Widget, DomainError> {
        validate_name(&name)?;
        let widget = Widget::new(id, name, value);
        tracing::info!(id = %widget.id, name = %widget.name, "Creating widget");
        self.repo.create(&widget)?;
        Ok(widget)
    }

    pub fn update(&self, id: &str, name: String, value: String) -> Result<Widget, DomainError> {
        validate_name(&name)?;
        tracing::info!(id, "Updating widget");
        let existing = self.get(id)?;
        let widget = Widget {
            name,
            value,
            updated_at: Utc::now(),
            ..existing
        };
        self.repo.update(&widget)?;
        Ok(widget)
    }

    pub fn delete(&self, id: &str) -> Result<(), DomainError> {
        tracing::info!(id, "Deleting widget");
        self.get(id)?;
        self.repo.delete(id)
    }
}
