use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "text-embedding-3-small";

pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct OpenAiRequest<'a> {
    input: &'a str,
    model: &'a str,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    data: Vec<OpenAiEmbedding>,
}

#[derive(Deserialize)]
struct OpenAiEmbedding {
    embedding: Vec<f32>,
}

impl OpenAiProvider {
    pub fn new(
        api_key: String,
        model: Option<String>,
        base_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::ProviderConfig(format!("HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn model_dimension(model: &str) -> usize {
        match model {
            "text-embedding-3-large" => 3072,
            "text-embedding-3-small" | "text-embedding-ada-002" => 1536,
            _ => 1536,
        }
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for OpenAiProvider {
    async fn create_embedding(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        if self.api_key.is_empty() {
            return Err(DomainError::ProviderConfig("OpenAI API key not set".into()));
        }

        let url = format!("{}/embeddings", self.base_url);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&OpenAiRequest {
                input: text.trim(),
                model: &self.model,
            })
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to call embedding API");
                DomainError::ProviderUnavailable(format!("request failed: {e}"))
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            tracing::error!(%status, body = %body, "Embedding API error");
            return Err(DomainError::ProviderUnavailable(format!("status {status}")));
        }

        let result: OpenAiResponse = resp.json().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to decode embedding response");
            DomainError::ProviderUnavailable(format!("malformed response: {e}"))
        })?;

        result
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| DomainError::ProviderUnavailable("empty embedding result".into()))
    }

    fn dimension(&self) -> usize {
        Self::model_dimension(&self.model)
    }
}
