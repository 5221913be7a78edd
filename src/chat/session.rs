//! Chat Session
//!
//! Gerencia uma sessão de conversa com histórico limitado e medeia todas as
//! chamadas ao backend de geração, normalizando a resposta.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::PromptStrategy;
use crate::providers::{GenerationConfig, TextGenerator};

/// Maximum turns retained after each exchange (2 full exchanges)
pub const HISTORY_CAP: usize = 4;

/// Turns included in a transcript-style prompt
const TRANSCRIPT_WINDOW: usize = 5;

/// Reply used when the backend yields no usable output
pub const FALLBACK_REPLY: &str = "Sorry, I could not process the message correctly.";

/// Reply used when the backend call fails
pub const APOLOGY_REPLY: &str =
    "Sorry, I had a problem processing your message. Please try again.";

/// Role de um turno da conversa
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// Uma mensagem trocada, marcada com seu role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: &str) -> Self {
        Self {
            role: Role::User,
            content: content.to_string(),
        }
    }

    pub fn assistant(content: &str) -> Self {
        Self {
            role: Role::Assistant,
            content: content.to_string(),
        }
    }
}

/// Sessão de conversa.
///
/// O estado é privado e `send_message` exige `&mut self`: o contrato de "no
/// máximo uma chamada lógica em andamento" vira propriedade de compilação em
/// vez de convenção.
pub struct ChatSession {
    generator: Arc<dyn TextGenerator>,
    strategy: PromptStrategy,
    history: Vec<Turn>,
}

impl ChatSession {
    pub fn new(generator: Arc<dyn TextGenerator>, strategy: PromptStrategy) -> Self {
        Self {
            generator,
            strategy,
            history: Vec::new(),
        }
    }

    /// Histórico atual, do mais antigo ao mais recente
    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    /// Número de turnos retidos
    pub fn turn_count(&self) -> usize {
        self.history.len()
    }

    /// Limpa o histórico de conversa
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Envia uma mensagem e obtém a resposta pós-processada.
    ///
    /// Nunca propaga erros do backend: falhas de transporte viram uma resposta
    /// fixa de desculpas e vão pro log. Saída vazia ou malformada vira a
    /// resposta de fallback, que entra no histórico como qualquer outra.
    pub async fn send_message(&mut self, message: &str) -> String {
        let prompt = self.build_prompt(message);
        let config = self.generation_config();

        tracing::info!(backend = self.generator.name(), "processing message");

        let reply = match self.generator.generate(&prompt, &config).await {
            Ok(outputs) => {
                let text = outputs
                    .first()
                    .map(|g| postprocess(&prompt, &g.generated_text))
                    .unwrap_or_default();

                if text.is_empty() {
                    FALLBACK_REPLY.to_string()
                } else {
                    text
                }
            }
            Err(err) => {
                tracing::error!("failed to process message: {err}");
                return APOLOGY_REPLY.to_string();
            }
        };

        self.history.push(Turn::user(message));
        self.history.push(Turn::assistant(&reply));
        if self.history.len() > HISTORY_CAP {
            self.history.drain(..self.history.len() - HISTORY_CAP);
        }

        tracing::info!("reply generated");
        reply
    }

    fn build_prompt(&self, message: &str) -> String {
        match self.strategy {
            PromptStrategy::LastTurn => match self.history.last() {
                Some(turn) => format!("{} {}", turn.content, message),
                None => message.to_string(),
            },
            PromptStrategy::Transcript => {
                let start = self.history.len().saturating_sub(TRANSCRIPT_WINDOW);
                let mut lines: Vec<String> = self.history[start..]
                    .iter()
                    .map(|t| format!("{}: {}", t.role.as_str(), t.content))
                    .collect();
                lines.push(format!("user: {message}"));
                lines.join("\n")
            }
        }
    }

    fn generation_config(&self) -> GenerationConfig {
        let max_length = match self.strategy {
            PromptStrategy::LastTurn => 128,
            PromptStrategy::Transcript => 200,
        };
        GenerationConfig::default().with_max_length(max_length)
    }
}

/// Remove o eco do prompt e marcadores de role da saída bruta
fn postprocess(prompt: &str, raw: &str) -> String {
    let mut text = raw.to_string();

    if !prompt.is_empty() && text.contains(prompt) {
        text = text.replace(prompt, "");
    }

    if let Some((_, tail)) = text.rsplit_once("assistant:") {
        text = tail.to_string();
    }

    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{Generated, GeneratorError};
    use async_trait::async_trait;

    struct FixedGenerator(&'static str);

    #[async_trait]
    impl TextGenerator for FixedGenerator {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn generate(
            &self,
            _prompt: &str,
            _config: &GenerationConfig,
        ) -> Result<Vec<Generated>, GeneratorError> {
            Ok(vec![Generated {
                generated_text: self.0.to_string(),
            }])
        }
    }

    fn session(strategy: PromptStrategy) -> ChatSession {
        ChatSession::new(Arc::new(FixedGenerator("a reply")), strategy)
    }

    #[test]
    fn test_last_turn_prompt_uses_only_previous_turn() {
        let mut s = session(PromptStrategy::LastTurn);
        s.history.push(Turn::user("first"));
        s.history.push(Turn::assistant("nice to meet you"));

        let prompt = s.build_prompt("second");
        assert_eq!(prompt, "nice to meet you second");
    }

    #[test]
    fn test_last_turn_prompt_without_history_is_message() {
        let s = session(PromptStrategy::LastTurn);
        assert_eq!(s.build_prompt("hello"), "hello");
    }

    #[test]
    fn test_transcript_prompt_labels_roles_and_bounds_window() {
        let mut s = session(PromptStrategy::Transcript);
        for i in 0..4 {
            s.history.push(Turn::user(&format!("q{i}")));
            s.history.push(Turn::assistant(&format!("a{i}")));
        }

        let prompt = s.build_prompt("latest");
        let lines: Vec<&str> = prompt.lines().collect();

        // window of 5 prior turns plus the new message
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "assistant: a1");
        assert_eq!(*lines.last().unwrap(), "user: latest");
    }

    #[test]
    fn test_generation_max_length_per_strategy() {
        assert_eq!(session(PromptStrategy::LastTurn).generation_config().max_length, 128);
        assert_eq!(session(PromptStrategy::Transcript).generation_config().max_length, 200);
    }

    #[test]
    fn test_postprocess_strips_echo() {
        let out = postprocess("how are you", "how are you I am fine");
        assert_eq!(out, "I am fine");
        assert!(!out.contains("how are you"));
    }

    #[test]
    fn test_postprocess_keeps_tail_after_role_marker() {
        let out = postprocess("", "user: hi\nassistant: hello there");
        assert_eq!(out, "hello there");
    }

    #[test]
    fn test_postprocess_trims_whitespace() {
        assert_eq!(postprocess("", "  spaced out \n"), "spaced out");
    }

    #[tokio::test]
    async fn test_clear_history() {
        let mut s = session(PromptStrategy::Transcript);
        s.send_message("hello").await;
        assert_eq!(s.turn_count(), 2);

        s.clear_history();
        assert!(s.history().is_empty());
    }
}
