//! Response synthesis: the second model call, turning the execution result
//! back into one or two spoken sentences.

use crate::executor::ExecutionResult;
use crate::model::LanguageModel;
use std::sync::Arc;

const RESPONSE_PROMPT: &str = include_str!("../prompts/response.txt");

/// Fixed user-facing reply when the synthesis call itself fails. Raw model or
/// transport errors are never spoken to the user.
pub const FALLBACK_REPLY: &str =
    "申し訳ありません。うまく応答を作成できませんでした。もう一度お試しください。";

pub struct ResponseSynthesizer {
    model: Arc<dyn LanguageModel>,
}

impl ResponseSynthesizer {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Free text in, free text out: the model's reply is passed through with
    /// only whitespace trimming. A failed or empty model call becomes
    /// [`FALLBACK_REPLY`], with the real error kept in the logs.
    pub async fn synthesize(&self, utterance: &str, result: &ExecutionResult) -> String {
        let prompt = RESPONSE_PROMPT
            .replace("{user_utterance}", utterance)
            .replace("{tool_result}", &result.to_prompt_payload());

        match self.model.generate(&prompt).await {
            Ok(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    tracing::warn!("synthesis model returned an empty reply");
                    FALLBACK_REPLY.to_string()
                } else {
                    trimmed.to_string()
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "response synthesis model call failed");
                FALLBACK_REPLY.to_string()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
