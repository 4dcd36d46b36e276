//! Chat-completion client module.
//!
//! The summary service talks to the language model only through [`CompletionClient`],
//! so the reqwest-backed [`OpenRouterClient`] can be swapped for a stub in tests.

mod openrouter;

pub use openrouter::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced while calling the completion endpoint.
///
/// Callers treat every variant the same way; the variants only exist for logs.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("no completion API key configured")]
    MissingCredential,

    #[error("request to completion endpoint failed: {source}")]
    Transport {
        #[from]
        source: reqwest::Error,
    },

    #[error("completion endpoint returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("completion response could not be decoded: {0}")]
    Decode(String),

    #[error("completion response contained no message")]
    EmptyResponse,
}

/// Port for generating text from a prompt.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send `prompt` as a single user message to `model` and return the reply text.
    async fn complete(&self, prompt: &str, model: &str) -> Result<String, CompletionError>;
}
