use std::sync::{Arc, Mutex};

use super::LlmError;

/// Text generation backend (allows mocking).
pub trait LlmClient {
    fn generate(&self, model: &str, prompt: &str, system: &str) -> Result<String, LlmError>;
}

/// Mock LLM client for testing. Returns a canned reply, or a canned
/// failure, and records every prompt it receives.
pub struct MockLlmClient {
    reply: Option<String>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockLlmClient {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            prompts: Arc::default(),
        }
    }

    /// Client whose every call fails with a connection error.
    pub fn failing() -> Self {
        Self {
            reply: None,
            prompts: Arc::default(),
        }
    }

    /// Shared handle to the prompts seen so far. Stays valid after the
    /// client is boxed into a `LanguageModel`.
    pub fn prompts(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.prompts)
    }
}

impl LlmClient for MockLlmClient {
    fn generate(&self, _model: &str, prompt: &str, _system: &str) -> Result<String, LlmError> {
        if let Ok(mut seen) = self.prompts.lock() {
            seen.push(prompt.to_string());
        }
        match &self.reply {
            Some(reply) => Ok(reply.clone()),
            None => Err(LlmError::Connection("mock".into())),
        }
    }
}
