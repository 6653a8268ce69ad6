//! The generative text backend seam used by the generator and MVG flows

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::client::LlmClient;
use super::types::Message;

/// Text produced by a backend call, with its token counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub text: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl Generation {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            input_tokens: 0,
            output_tokens: 0,
        }
    }
}

/// A prompt-in, text-out generative backend
#[async_trait]
pub trait TextBackend: Send + Sync {
    /// Generate text for a prompt; fails with `EmptyGeneration` when nothing usable came back
    async fn generate(&self, prompt: &str) -> Result<Generation>;

    /// Convenience wrapper returning only the text
    async fn complete(&self, prompt: &str) -> Result<String> {
        Ok(self.generate(prompt).await?.text)
    }
}

#[async_trait]
impl TextBackend for LlmClient {
    async fn generate(&self, prompt: &str) -> Result<Generation> {
        let messages = vec![Message::system(self.system_prompt()), Message::user(prompt)];
        let response = self.complete_with_fallback(messages).await?;

        let text = response.content.trim();
        if text.is_empty() {
            return Err(Error::EmptyGeneration);
        }

        Ok(Generation {
            text: text.to_string(),
            input_tokens: response.input_tokens,
            output_tokens: response.output_tokens,
        })
    }
}
