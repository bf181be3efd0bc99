use crate::error::GeminiError;
use crate::types::{ErrorResponse, GenerateContentRequest, GenerateContentResponse};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Thin client for the `generateContent` endpoint. One instance per process;
/// the underlying `reqwest::Client` pools connections.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_base_url(api_key, model, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one prompt, return the first candidate's concatenated text.
    pub async fn generate_content(&self, prompt: &str) -> Result<String, GeminiError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        let body = GenerateContentRequest::from_text(prompt);

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            tracing::warn!(status = status.as_u16(), %message, "generateContent failed");
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        extract_text(parsed)
    }
}

fn extract_text(response: GenerateContentResponse) -> Result<String, GeminiError> {
    if let Some(feedback) = &response.prompt_feedback {
        if let Some(reason) = &feedback.block_reason {
            return Err(GeminiError::Blocked(reason.clone()));
        }
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(GeminiError::NoCandidates)?;

    let text: String = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(GeminiError::NoCandidates);
    }
    Ok(text)
}

// ─── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Candidate, CandidateContent, CandidatePart, PromptFeedback};

    fn response_with_parts(parts: Vec<Option<&str>>) -> GenerateContentResponse {
        GenerateContentResponse {
            candidates: vec![Candidate {
                content: Some(CandidateContent {
                    parts: parts
                        .into_iter()
                        .map(|text| CandidatePart {
                            text: text.map(str::to_string),
                        })
                        .collect(),
                }),
                finish_reason: Some("STOP".into()),
            }],
            prompt_feedback: None,
        }
    }

    #[test]
    fn extract_concatenates_parts() {
        let resp = response_with_parts(vec![Some("{\"action\":"), Some("\"error\"}")]);
        assert_eq!(extract_text(resp).unwrap(), "{\"action\":\"error\"}");
    }

    #[test]
    fn extract_skips_textless_parts() {
        let resp = response_with_parts(vec![None, Some("ok")]);
        assert_eq!(extract_text(resp).unwrap(), "ok");
    }

    #[test]
    fn no_candidates_is_an_error() {
        let resp = GenerateContentResponse {
            candidates: vec![],
            prompt_feedback: None,
        };
        assert!(matches!(extract_text(resp), Err(GeminiError::NoCandidates)));
    }

    #[test]
    fn blocked_prompt_is_surfaced_with_reason() {
        let resp = GenerateContentResponse {
            candidates: vec![],
            prompt_feedback: Some(PromptFeedback {
                block_reason: Some("SAFETY".into()),
            }),
        };
        match extract_text(resp) {
            Err(GeminiError::Blocked(reason)) => assert_eq!(reason, "SAFETY"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn empty_candidate_text_is_an_error() {
        let resp = response_with_parts(vec![None]);
        assert!(matches!(extract_text(resp), Err(GeminiError::NoCandidates)));
    }
}
