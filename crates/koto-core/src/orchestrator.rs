//! The single entry point transport collaborators call: one utterance in,
//! one reply string out.

use crate::executor::{ActionExecutor, ExecutionResult};
use crate::generator::CommandGenerator;
use crate::model::LanguageModel;
use crate::registry::SchemaRegistry;
use crate::store::DocumentStore;
use crate::synthesizer::ResponseSynthesizer;
use std::sync::Arc;

/// Sequences generation → execution → synthesis for one request.
///
/// Terminal-failure-free by construction: the generator degrades malformed
/// model replies into `error` descriptors, the executor folds every failure
/// into the result envelope, and the synthesizer falls back to a fixed
/// apology, so `handle` always returns a reply string. Each call is one
/// independent pass; the only shared state is the read-only registry.
pub struct Orchestrator {
    generator: CommandGenerator,
    executor: ActionExecutor,
    synthesizer: ResponseSynthesizer,
}

impl Orchestrator {
    pub fn new(
        registry: Arc<SchemaRegistry>,
        model: Arc<dyn LanguageModel>,
        store: Arc<dyn DocumentStore>,
    ) -> Self {
        Self {
            generator: CommandGenerator::new(model.clone(), registry.clone()),
            executor: ActionExecutor::new(registry, store),
            synthesizer: ResponseSynthesizer::new(model),
        }
    }

    /// Interpret the utterance against the reference date, execute the
    /// resulting action, and synthesize the spoken reply.
    pub async fn handle(&self, utterance: &str, reference_date: &str) -> String {
        let descriptor = self.generator.generate(utterance, reference_date).await;
        tracing::info!(action = descriptor.name(), "command generated");

        let result = self.executor.execute(&descriptor).await;
        match &result {
            ExecutionResult::Success { .. } => {
                tracing::info!(action = descriptor.name(), "action executed");
            }
            ExecutionResult::Error { kind, message } => {
                // The user gets synthesized text; operators keep the kind.
                tracing::warn!(action = descriptor.name(), kind = ?kind, %message, "action failed");
            }
        }

        self.synthesizer.synthesize(utterance, &result).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
