use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

// ---------------------------------------------------------------------------
// ActionDescriptor
// ---------------------------------------------------------------------------

/// The model's structured intent, parsed from its JSON reply.
///
/// A closed union: adding an action means adding a variant here and a handler
/// arm in the executor. Anything the model invents outside this set becomes
/// [`ActionDescriptor::Unsupported`] so the executor can report it without
/// crashing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionDescriptor {
    GetDatabase {
        database_name: String,
    },
    QueryDatabase {
        database_name: String,
        /// Already in backing-store filter syntax; passed through untouched.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        filter: Option<Value>,
    },
    CreatePage {
        database_name: String,
        #[serde(default)]
        properties: Map<String, Value>,
    },
    UpdatePage {
        /// Optional at the descriptor level so a model that omits it still
        /// parses; the executor reports the missing id as a validation
        /// failure instead of the generator swallowing the whole intent.
        #[serde(default)]
        page_id: Option<String>,
        #[serde(default)]
        properties: Map<String, Value>,
    },
    /// The model chose an action outside the supported set.
    Unsupported {
        requested: String,
    },
    /// The model itself reported that it could not form a command, or the
    /// generator degraded a malformed reply into this.
    Error {
        message: String,
    },
}

impl ActionDescriptor {
    pub fn name(&self) -> &'static str {
        match self {
            ActionDescriptor::GetDatabase { .. } => "get_database",
            ActionDescriptor::QueryDatabase { .. } => "query_database",
            ActionDescriptor::CreatePage { .. } => "create_page",
            ActionDescriptor::UpdatePage { .. } => "update_page",
            ActionDescriptor::Unsupported { .. } => "unsupported",
            ActionDescriptor::Error { .. } => "error",
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum CommandParseError {
    #[error("model output is not valid JSON: {0}")]
    Syntax(#[source] serde_json::Error),

    #[error("model output has no 'action' field")]
    MissingAction,

    #[error("malformed '{action}' command: {source}")]
    Shape {
        action: String,
        #[source]
        source: serde_json::Error,
    },
}

const KNOWN_ACTIONS: &[&str] = &[
    "get_database",
    "query_database",
    "create_page",
    "update_page",
    "error",
];

/// Parse the model's raw reply into an [`ActionDescriptor`].
///
/// The prompt contract forbids code fences and surrounding prose, but models
/// occasionally wrap JSON in a ```json block anyway; stripping that is the
/// one repair we perform. Everything else is strict.
pub fn parse_model_output(raw: &str) -> Result<ActionDescriptor, CommandParseError> {
    let cleaned = strip_code_fences(raw);
    let value: Value = serde_json::from_str(cleaned).map_err(CommandParseError::Syntax)?;

    let action = value
        .get("action")
        .and_then(Value::as_str)
        .ok_or(CommandParseError::MissingAction)?;

    if !KNOWN_ACTIONS.contains(&action) {
        return Ok(ActionDescriptor::Unsupported {
            requested: action.to_string(),
        });
    }

    let action = action.to_string();
    serde_json::from_value(value).map_err(|source| CommandParseError::Shape { action, source })
}

fn strip_code_fences(raw: &str) -> &str {
    let mut s = raw.trim();
    if let Some(rest) = s.strip_prefix("```json") {
        s = rest;
    } else if let Some(rest) = s.strip_prefix("```") {
        s = rest;
    }
    if let Some(rest) = s.strip_suffix("```") {
        s = rest;
    }
    s.trim()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_create_page() {
        let raw = r#"{"action":"create_page","database_name":"shopping_list","properties":{"名前":"牛乳"}}"#;
        let descriptor = parse_model_output(raw).unwrap();
        match descriptor {
            ActionDescriptor::CreatePage {
                database_name,
                properties,
            } => {
                assert_eq!(database_name, "shopping_list");
                assert_eq!(properties.get("名前"), Some(&json!("牛乳")));
            }
            other => panic!("unexpected descriptor: {other:?}"),
        }
    }

    #[test]
    fn parse_query_with_filter_passthrough() {
        let raw = r#"{
            "action": "query_database",
            "database_name": "menu",
            "filter": {"property": "日付", "date": {"equals": "2024-03-05"}}
        }"#;
        let descriptor = parse_model_output(raw).unwrap();
        match descriptor {
            ActionDescriptor::QueryDatabase {
                database_name,
                filter,
            } => {
                assert_eq!(database_name, "menu");
                assert_eq!(filter.unwrap()["date"]["equals"], "2024-03-05");
            }
            other => panic!("unexpected descriptor: {other:?}"),
        }
    }

    #[test]
    fn parse_strips_code_fences() {
        let raw = "```json\n{\"action\":\"get_database\",\"database_name\":\"menu\"}\n```";
        let descriptor = parse_model_output(raw).unwrap();
        assert_eq!(
            descriptor,
            ActionDescriptor::GetDatabase {
                database_name: "menu".to_string()
            }
        );
    }

    #[test]
    fn parse_error_action() {
        let raw = r#"{"action":"error","message":"聞き取れませんでした"}"#;
        let descriptor = parse_model_output(raw).unwrap();
        assert!(matches!(descriptor, ActionDescriptor::Error { ref message } if message.contains("聞き取れ")));
    }

    #[test]
    fn parse_non_json_is_syntax_error() {
        let err = parse_model_output("sure! here is the command you asked for").unwrap_err();
        assert!(matches!(err, CommandParseError::Syntax(_)));
    }

    #[test]
    fn parse_missing_action_field() {
        let err = parse_model_output(r#"{"database_name":"menu"}"#).unwrap_err();
        assert!(matches!(err, CommandParseError::MissingAction));
    }

    #[test]
    fn parse_missing_required_field_is_shape_error() {
        let err = parse_model_output(r#"{"action":"create_page"}"#).unwrap_err();
        match err {
            CommandParseError::Shape { action, .. } => assert_eq!(action, "create_page"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_unknown_action_becomes_unsupported() {
        let raw = r#"{"action":"delete_everything","database_name":"menu"}"#;
        let descriptor = parse_model_output(raw).unwrap();
        assert_eq!(
            descriptor,
            ActionDescriptor::Unsupported {
                requested: "delete_everything".to_string()
            }
        );
    }

    #[test]
    fn update_page_without_page_id_still_parses() {
        let raw = r#"{"action":"update_page","properties":{"完了":true}}"#;
        let descriptor = parse_model_output(raw).unwrap();
        match descriptor {
            ActionDescriptor::UpdatePage {
                page_id,
                properties,
            } => {
                assert!(page_id.is_none());
                assert_eq!(properties.get("完了"), Some(&json!(true)));
            }
            other => panic!("unexpected descriptor: {other:?}"),
        }
    }
}
