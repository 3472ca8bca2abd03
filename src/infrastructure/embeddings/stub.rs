use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::EmbeddingProvider;

pub const DEFAULT_DIMENSION: usize = 384;

/// Deterministic provider for tests and offline runs.
///
/// Every component equals `(len % 10) / 10` where `len` is the byte length
/// of the trimmed input, so identical text always maps to an identical
/// vector.
pub struct StubProvider {
    dimension: usize,
}

impl StubProvider {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let value = (text.trim().len() % 10) as f32 / 10.0;
        vec![value; self.dimension]
    }
}

impl Default for StubProvider {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for StubProvider {
    async fn create_embedding(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        Ok(self.embed_sync(text))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
