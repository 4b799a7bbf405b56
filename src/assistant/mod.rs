//! AI text-generation wrapper
//!
//! Upstream responses are normalized here: an empty reply or a transport
//! error becomes a short user-facing warning string instead of a fault the
//! caller has to handle.

pub mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;
use thiserror::Error;

/// Warning shown when the upstream reply is empty or malformed
pub const EMPTY_RESPONSE_WARNING: &str =
    "No valid response from the AI. Try rephrasing your request.";

/// Errors that can occur while calling the text-generation service
#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("API key is not configured")]
    MissingCredential,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream returned no usable content")]
    EmptyResponse,

    #[error("Upstream rejected the call: {0}")]
    Api(String),
}

/// Text-generation capability
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AssistantError>;
}

/// Normalizing front end over a text generator
pub struct Assistant {
    generator: Box<dyn TextGenerator>,
}

impl Assistant {
    pub fn new(generator: Box<dyn TextGenerator>) -> Self {
        Assistant { generator }
    }

    /// Ask the generator for a reply.
    ///
    /// Never fails: empty replies and upstream errors are mapped to short
    /// warning strings the caller can show as-is.
    pub async fn respond(&self, prompt: &str) -> String {
        match self.generator.generate(prompt).await {
            Ok(text) if text.trim().is_empty() => EMPTY_RESPONSE_WARNING.to_string(),
            Ok(text) => text,
            Err(AssistantError::EmptyResponse) => EMPTY_RESPONSE_WARNING.to_string(),
            Err(e) => {
                log::error!("Assistant call failed: {}", e);
                format!("An error occurred: {}", e)
            }
        }
    }
}
