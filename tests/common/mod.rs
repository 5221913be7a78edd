//! Shared test support: a scripted text-generation backend.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use techdesk::providers::{Generated, GenerationConfig, GeneratorError, TextGenerator};

/// One canned backend response
#[allow(dead_code)]
pub enum Reply {
    /// Return this text as the generated output
    Text(&'static str),
    /// Echo the prompt back with this suffix appended
    Echo(&'static str),
    /// Return an empty output list
    Empty,
    /// Fail with a transport error
    Fail,
}

/// Generator that plays back canned replies in order and records every prompt
pub struct ScriptedGenerator {
    replies: Mutex<Vec<Reply>>,
    prompts: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl ScriptedGenerator {
    pub fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn seen_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(
        &self,
        prompt: &str,
        _config: &GenerationConfig,
    ) -> Result<Vec<Generated>, GeneratorError> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let reply = {
            let mut replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                Reply::Text("ok")
            } else {
                replies.remove(0)
            }
        };

        match reply {
            Reply::Text(text) => Ok(vec![Generated {
                generated_text: text.to_string(),
            }]),
            Reply::Echo(suffix) => Ok(vec![Generated {
                generated_text: format!("{prompt}{suffix}"),
            }]),
            Reply::Empty => Ok(Vec::new()),
            Reply::Fail => Err(GeneratorError::NetworkError(
                "connection refused".to_string(),
            )),
        }
    }
}
