//! `gemini-client` — minimal async client for the Gemini `generateContent`
//! REST API, covering exactly the text-prompt surface the orchestrator needs.

pub mod client;
pub mod error;
pub mod types;

pub use client::{GeminiClient, DEFAULT_BASE_URL};
pub use error::GeminiError;
