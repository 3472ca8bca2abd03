use crate::domain::entities::widget::Widget;
use crate::domain::error::DomainError;

pub trait WidgetRepository: Send + Sync {
    fn get_by_id(&self, id: &str) -> Result<Option<Widget>, DomainError>;
    fn get_all(&self) -> Result<Vec<Widget>, DomainError>;
    fn create(&self, widget: &Widget) -> Result<(), DomainError>;
    fn update(&self, widget: &Widget) -> Result<(), DomainError>;
    fn delete(&self, id: &str) -> Result<(), DomainError>;
}
