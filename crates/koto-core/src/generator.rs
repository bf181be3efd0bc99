//! Command generation: one model call turning an utterance into an
//! [`ActionDescriptor`].

use crate::command::{self, ActionDescriptor};
use crate::model::LanguageModel;
use crate::registry::{PropertyKind, SchemaRegistry};
use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::sync::Arc;

const COMMAND_PROMPT: &str = include_str!("../prompts/command.txt");

pub struct CommandGenerator {
    model: Arc<dyn LanguageModel>,
    registry: Arc<SchemaRegistry>,
}

impl CommandGenerator {
    pub fn new(model: Arc<dyn LanguageModel>, registry: Arc<SchemaRegistry>) -> Self {
        Self { model, registry }
    }

    /// Produce a descriptor for the utterance. Never fails: a model outage,
    /// unparseable reply, or missing field degrades into
    /// `ActionDescriptor::Error` so the pipeline can still answer the user.
    pub async fn generate(&self, utterance: &str, reference_date: &str) -> ActionDescriptor {
        let prompt = self.render_prompt(utterance, reference_date);

        let raw = match self.model.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "command generation model call failed");
                return ActionDescriptor::Error {
                    message: format!("言語モデルの呼び出しに失敗しました: {e}"),
                };
            }
        };

        let descriptor = match command::parse_model_output(&raw) {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!(error = %e, raw = %raw, "model reply did not parse as a command");
                return ActionDescriptor::Error {
                    message: format!("コマンドの解析に失敗しました: {e}"),
                };
            }
        };

        // The prompt makes the model normalize relative dates itself; this is
        // the check on top of that contract, before anything reaches the store.
        if let Some(message) = self.reject_malformed_dates(&descriptor) {
            tracing::warn!(%message, "generated command carried a malformed date");
            return ActionDescriptor::Error { message };
        }

        descriptor
    }

    pub fn render_prompt(&self, utterance: &str, reference_date: &str) -> String {
        COMMAND_PROMPT
            .replace("{database_descriptions}", &self.registry.render_descriptions())
            .replace("{user_utterance}", utterance)
            .replace("{reference_date}", reference_date)
    }

    fn reject_malformed_dates(&self, descriptor: &ActionDescriptor) -> Option<String> {
        match descriptor {
            ActionDescriptor::CreatePage {
                database_name,
                properties,
            } => {
                let entry = self.registry.resolve(database_name).ok()?;
                check_date_values(properties, |name| {
                    entry.properties.get(name).map(|schema| schema.kind)
                })
            }
            ActionDescriptor::UpdatePage { properties, .. } => {
                check_date_values(properties, |name| {
                    self.registry.infer_property_kind(name).map(|(_, kind)| kind)
                })
            }
            _ => None,
        }
    }
}

fn check_date_values(
    properties: &Map<String, Value>,
    kind_of: impl Fn(&str) -> Option<PropertyKind>,
) -> Option<String> {
    for (name, value) in properties {
        if kind_of(name) != Some(PropertyKind::Date) {
            continue;
        }
        let Some(text) = value.as_str() else { continue };
        if NaiveDate::parse_from_str(text, "%Y-%m-%d").is_err() {
            return Some(format!(
                "日付プロパティ '{name}' の値 '{text}' が YYYY-MM-DD 形式ではありません"
            ));
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
