//! Gemini-backed text generator.

use async_trait::async_trait;
use gemini_client::GeminiClient;
use tracing::debug;

use crate::ai::TextGenerator;
use crate::error::{PipelineError, Result};

/// Default model used for pipeline prompts.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// [`TextGenerator`] backed by the Gemini REST API.
pub struct GeminiGenerator {
    client: GeminiClient,
    model: String,
}

impl GeminiGenerator {
    /// Wrap an existing client with the default model.
    pub fn new(client: GeminiClient) -> Self {
        Self {
            client,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Build from the `GEMINI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let client = GeminiClient::from_env().map_err(|e| PipelineError::Assistant(Box::new(e)))?;
        Ok(Self::new(client))
    }

    /// Use a specific model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!(model = %self.model, prompt_len = prompt.len(), "generating completion");
        let response = self
            .client
            .generate_content(&self.model, prompt)
            .await
            .map_err(|e| PipelineError::Assistant(Box::new(e)))?;
        Ok(response.text)
    }
}
