use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Prompt blocked by safety filter: {0}")]
    Blocked(String),

    #[error("Response contained no candidates")]
    NoCandidates,
}
