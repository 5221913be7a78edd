//! Application Configuration
//!
//! Configuração persistente em TOML + segredos via ambiente (.env).

use std::env;
use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, TechdeskError};

/// Environment variable holding the Hugging Face token
pub const HUGGINGFACE_API_KEY: &str = "HUGGINGFACE_API_KEY";

/// Environment variable holding the NewsAPI key
pub const NEWS_API_KEY: &str = "NEWS_API_KEY";

/// Default conversational model for the remote backend
pub const DEFAULT_MODEL: &str = "facebook/blenderbot-3B";

/// Which transport backs text generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// Hosted inference API, authenticated with a bearer token
    #[default]
    HuggingFace,
    /// Locally hosted inference server, no authentication
    Local,
}

/// How the prompt is assembled from conversation history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PromptStrategy {
    /// Concatenate only the previous turn's content with the new message
    LastTurn,
    /// Join recent turns into a role-labelled transcript
    #[default]
    Transcript,
}

/// Configuração do aplicativo
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Backend de geração de texto
    pub backend: BackendKind,

    /// Modelo conversacional usado no backend remoto
    pub model: String,

    /// Endpoint do servidor de inferência local
    pub local_endpoint: Option<String>,

    /// Estratégia de montagem de prompt
    pub prompt_strategy: PromptStrategy,

    /// Idioma das notícias (código ISO)
    pub news_language: String,

    /// Domínios consultados na busca de notícias
    pub news_domains: String,

    /// Quantidade de notícias por atualização
    pub news_page_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            model: DEFAULT_MODEL.to_string(),
            local_endpoint: None,
            prompt_strategy: PromptStrategy::default(),
            news_language: "en".to_string(),
            news_domains: "techcrunch.com,theverge.com,arstechnica.com,wired.com".to_string(),
            news_page_size: 5,
        }
    }
}

impl AppConfig {
    /// Diretório de configuração
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "techdesk", "techdesk")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Diretório de dados (perfil, etc)
    pub fn data_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "techdesk", "techdesk")
            .map(|dirs| dirs.data_dir().to_path_buf())
    }

    /// Caminho do arquivo de config
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.toml"))
    }
}

/// Caminho do arquivo de perfil do usuário
pub fn profile_path() -> PathBuf {
    AppConfig::data_dir()
        .map(|dir| dir.join("profile.json"))
        .unwrap_or_else(|| PathBuf::from("data/profile.json"))
}

/// Carrega configuração do arquivo (defaults se ausente)
pub fn load_config() -> Result<AppConfig> {
    let path = AppConfig::config_path().ok_or_else(|| {
        TechdeskError::ConfigurationError("Could not determine config path".to_string())
    })?;

    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| TechdeskError::ConfigurationError(format!("Failed to read config: {e}")))?;

    toml::from_str(&content)
        .map_err(|e| TechdeskError::ConfigurationError(format!("Invalid TOML config: {e}")))
}

/// Salva configuração no arquivo
pub fn save_config(config: &AppConfig) -> Result<()> {
    let path = AppConfig::config_path().ok_or_else(|| {
        TechdeskError::ConfigurationError("Could not determine config path".to_string())
    })?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            TechdeskError::ConfigurationError(format!("Failed to create config dir: {e}"))
        })?;
    }

    let content = toml::to_string_pretty(config)
        .map_err(|e| TechdeskError::ConfigurationError(format!("Failed to serialize config: {e}")))?;

    fs::write(&path, content)
        .map_err(|e| TechdeskError::ConfigurationError(format!("Failed to write config: {e}")))?;

    Ok(())
}

/// A required key that is absent from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingKey {
    pub name: &'static str,
    pub obtain: &'static str,
}

/// Checks both required API keys, returning the ones that are missing.
///
/// Empty values count as missing.
pub fn missing_api_keys() -> Vec<MissingKey> {
    let mut missing = Vec::new();

    if env_key_missing(HUGGINGFACE_API_KEY) {
        missing.push(MissingKey {
            name: HUGGINGFACE_API_KEY,
            obtain: "https://huggingface.co/settings/tokens (free, create an account and generate a token)",
        });
    }
    if env_key_missing(NEWS_API_KEY) {
        missing.push(MissingKey {
            name: NEWS_API_KEY,
            obtain: "https://newsapi.org/ (free tier, 100 requests/day)",
        });
    }

    missing
}

fn env_key_missing(name: &str) -> bool {
    env::var(name).map_or(true, |v| v.trim().is_empty())
}

/// Renders an actionable report for missing keys
pub fn key_report(missing: &[MissingKey]) -> String {
    let mut out = String::from(
        "API keys not configured!\n\nAdd the following to a .env file in the project root:\n\n",
    );
    for key in missing {
        out.push_str(&format!("  {}=your_key_here\n", key.name));
    }
    out.push_str("\nYou can obtain the keys at:\n");
    for key in missing {
        out.push_str(&format!("  - {}: {}\n", key.name, key.obtain));
    }
    out
}

/// Valida as chaves antes de qualquer chamada de rede
pub fn validate_api_keys() -> Result<()> {
    let missing = missing_api_keys();
    if missing.is_empty() {
        return Ok(());
    }

    let names: Vec<&str> = missing.iter().map(|k| k.name).collect();
    tracing::error!("required API keys not found: {}", names.join(", "));
    Err(TechdeskError::MissingApiKeys(names.join(", ")))
}
