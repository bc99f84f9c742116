//! Text generation for MedExplain.
//!
//! This crate holds the prompt templates, the [`TextGenerator`] seam the
//! pipeline calls through, a scripted [`MockGenerator`], and (behind the
//! `ollama` feature) an HTTP generator for a local Ollama instance.

pub mod config;
pub mod generator;
pub mod prompts;

#[cfg(feature = "ollama")]
pub mod ollama;

pub use config::*;
pub use generator::*;
pub use prompts::*;

#[cfg(feature = "ollama")]
pub use ollama::OllamaGenerator;
