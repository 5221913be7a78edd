//! Local Generator
//!
//! Servidor de inferência local via HTTP (mesmo contrato do backend remoto).

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{Generated, GenerationConfig, GeneratorError, TextGenerator};

const DEFAULT_LOCAL_URL: &str = "http://localhost:8080/generate";

/// Backend local (sem autenticação)
pub struct LocalGenerator {
    client: Client,
    endpoint: String,
}

/// Servidores locais respondem como lista ou objeto único
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LocalResponse {
    Many(Vec<Generated>),
    One(Generated),
}

impl LocalGenerator {
    pub fn new(endpoint: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_LOCAL_URL.to_string()),
        }
    }
}

#[async_trait]
impl TextGenerator for LocalGenerator {
    fn name(&self) -> &str {
        "local"
    }

    async fn generate(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<Vec<Generated>, GeneratorError> {
        let body = json!({
            "inputs": prompt,
            "parameters": config,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| GeneratorError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(GeneratorError::ApiError(format!("{status}: {text}")));
        }

        let parsed: LocalResponse = response
            .json()
            .await
            .map_err(|e| GeneratorError::ParseError(e.to_string()))?;

        Ok(match parsed {
            LocalResponse::Many(outputs) => outputs,
            LocalResponse::One(output) => vec![output],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoint() {
        let generator = LocalGenerator::new(None);
        assert_eq!(generator.endpoint, DEFAULT_LOCAL_URL);
    }

    #[test]
    fn test_response_shapes_parse() {
        let many: LocalResponse =
            serde_json::from_str(r#"[{"generated_text": "hello"}]"#).unwrap();
        assert!(matches!(many, LocalResponse::Many(ref v) if v.len() == 1));

        let one: LocalResponse = serde_json::from_str(r#"{"generated_text": "hello"}"#).unwrap();
        assert!(matches!(one, LocalResponse::One(_)));
    }
}
