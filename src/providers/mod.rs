//! Text-Generation Backend Abstraction
//!
//! Dois transportes com o mesmo contrato de entrada/saída:
//! - Hugging Face Inference API (remoto, bearer token)
//! - Servidor de inferência local (HTTP, sem autenticação)

mod huggingface;
mod local;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{AppConfig, BackendKind, HUGGINGFACE_API_KEY};

pub use huggingface::HuggingFaceGenerator;
pub use local::LocalGenerator;

/// Sampling parameters sent with every generation request
#[derive(Debug, Clone, Serialize)]
pub struct GenerationConfig {
    pub max_length: usize,
    pub min_length: usize,
    pub temperature: f32,
    pub top_p: f32,
    pub do_sample: bool,
    pub num_return_sequences: usize,
    pub truncation: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_length: 200,
            min_length: 10,
            temperature: 0.7,
            top_p: 0.9,
            do_sample: true,
            num_return_sequences: 1,
            truncation: true,
        }
    }
}

impl GenerationConfig {
    pub fn with_max_length(mut self, max: usize) -> Self {
        self.max_length = max;
        self
    }
}

/// Uma sequência gerada pelo backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Generated {
    pub generated_text: String,
}

/// Erros do backend de geração
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Model is still loading, try again shortly")]
    ModelLoading,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Trait principal para backends de geração de texto
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Nome do backend
    fn name(&self) -> &str;

    /// Gera texto a partir de um prompt com a configuração de amostragem dada
    async fn generate(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<Vec<Generated>, GeneratorError>;
}

/// Cria o generator escolhido pela configuração.
///
/// A chave ausente não impede a criação: o backend remoto falha em
/// `generate`, e a camada de cima trata isso como erro reportável.
pub fn create_generator(config: &AppConfig) -> Arc<dyn TextGenerator> {
    match config.backend {
        BackendKind::HuggingFace => {
            let api_key = std::env::var(HUGGINGFACE_API_KEY).unwrap_or_default();
            Arc::new(HuggingFaceGenerator::new(&api_key, &config.model))
        }
        BackendKind::Local => Arc::new(LocalGenerator::new(config.local_endpoint.clone())),
    }
}
