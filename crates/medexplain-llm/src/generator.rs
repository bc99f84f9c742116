//! Text generation seam between the pipeline and an LLM backend.

use std::collections::VecDeque;
use std::sync::Mutex;

use thiserror::Error;

/// Completion errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompletionError {
    #[error("LLM backend unreachable at {0}")]
    Connection(String),

    #[error("LLM backend returned {status}: {body}")]
    Backend { status: u16, body: String },

    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    #[error("LLM inference error: {0}")]
    Inference(String),
}

pub type CompletionResult<T> = Result<T, CompletionError>;

/// Anything that can turn a prompt into text.
pub trait TextGenerator {
    fn complete(&self, prompt: &str) -> CompletionResult<String>;
}

/// Strip echoed labels and surrounding whitespace from a raw completion.
pub fn clean_completion(raw: &str) -> CompletionResult<String> {
    let mut text = raw.trim();
    for label in ["RESPONSE:", "Plain English version:"] {
        if let Some(rest) = text.strip_prefix(label) {
            text = rest.trim_start();
        }
    }

    if text.is_empty() {
        return Err(CompletionError::InvalidFormat("empty completion".into()));
    }
    Ok(text.to_string())
}

/// Scripted generator for tests and offline runs.
///
/// Replies are consumed in order; once the script runs out the fallback
/// reply is repeated. Every prompt is recorded.
pub struct MockGenerator {
    script: Mutex<VecDeque<CompletionResult<String>>>,
    fallback: CompletionResult<String>,
    prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    /// Always answer with `reply`.
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Ok(reply.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Always fail with an inference error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Err(CompletionError::Inference(message.into())),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Queue a reply ahead of the fallback.
    pub fn then(self, reply: CompletionResult<String>) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(reply);
        }
        self
    }

    /// Prompts seen so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or_default()
    }
}

impl TextGenerator for MockGenerator {
    fn complete(&self, prompt: &str) -> CompletionResult<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        let scripted = self
            .script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front());

        scripted.unwrap_or_else(|| self.fallback.clone())
    }
}
