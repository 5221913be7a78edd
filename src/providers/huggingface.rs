//! Hugging Face Generator
//!
//! Chamada remota autenticada à Inference API hospedada.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use super::{Generated, GenerationConfig, GeneratorError, TextGenerator};

const HF_INFERENCE_URL: &str = "https://api-inference.huggingface.co/models";

/// Backend remoto (bearer token)
pub struct HuggingFaceGenerator {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl HuggingFaceGenerator {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: HF_INFERENCE_URL.to_string(),
        }
    }

    /// Overrides the inference endpoint (used by tests)
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/{}", self.base_url, self.model)
    }
}

#[async_trait]
impl TextGenerator for HuggingFaceGenerator {
    fn name(&self) -> &str {
        "huggingface"
    }

    async fn generate(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<Vec<Generated>, GeneratorError> {
        if self.api_key.trim().is_empty() {
            return Err(GeneratorError::ConfigError(
                "HUGGINGFACE_API_KEY not set".to_string(),
            ));
        }

        let body = json!({
            "inputs": prompt,
            "parameters": config,
        });

        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| GeneratorError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(match status.as_u16() {
                401 | 403 => GeneratorError::InvalidApiKey,
                429 => GeneratorError::RateLimited,
                503 => GeneratorError::ModelLoading,
                _ => GeneratorError::ApiError(format!("{status}: {text}")),
            });
        }

        response
            .json::<Vec<Generated>>()
            .await
            .map_err(|e| GeneratorError::ParseError(e.to_string()))
    }
}
