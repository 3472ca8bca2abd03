use crate::domain::error::DomainError;

/// Turns text into a fixed-dimension vector.
///
/// Implementations trim the input before use. Empty text is legal and still
/// yields a vector.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn create_embedding(&self, text: &str) -> Result<Vec<f32>, DomainError>;

    /// Fixed for the lifetime of the provider.
    fn dimension(&self) -> usize;
}
