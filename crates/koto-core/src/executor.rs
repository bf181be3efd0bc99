//! Action execution: resolve logical names, wrap typed properties, dispatch
//! the store call, normalize every outcome into an [`ExecutionResult`].

use crate::command::ActionDescriptor;
use crate::error::KotoError;
use crate::properties;
use crate::registry::SchemaRegistry;
use crate::store::{DocumentStore, StoreError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// ExecutionResult
// ---------------------------------------------------------------------------

/// Normalized failure categories, independent of the store's native error
/// shapes. Logged for operators; the user only ever sees synthesized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The command generator could not produce a usable descriptor.
    Generation,
    /// A logical database or property name did not resolve.
    Resolution,
    /// The descriptor was missing a required field or carried a bad value.
    Validation,
    /// The external store rejected or failed the call.
    Remote,
    /// The descriptor named an action outside the supported set.
    UnsupportedAction,
}

/// The uniform success/error envelope handed to the response synthesizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExecutionResult {
    Success { data: Value },
    Error { kind: FailureKind, message: String },
}

impl ExecutionResult {
    pub fn success(data: Value) -> Self {
        ExecutionResult::Success { data }
    }

    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        ExecutionResult::Error {
            kind,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionResult::Success { .. })
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            ExecutionResult::Success { .. } => None,
            ExecutionResult::Error { kind, .. } => Some(*kind),
        }
    }

    /// Serialized form embedded into the response prompt.
    pub fn to_prompt_payload(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

// ---------------------------------------------------------------------------
// ActionExecutor
// ---------------------------------------------------------------------------

pub struct ActionExecutor {
    registry: Arc<SchemaRegistry>,
    store: Arc<dyn DocumentStore>,
}

impl ActionExecutor {
    pub fn new(registry: Arc<SchemaRegistry>, store: Arc<dyn DocumentStore>) -> Self {
        Self { registry, store }
    }

    /// Execute one descriptor. Infallible at the type level: every failure
    /// mode is folded into the result envelope so the orchestrator can always
    /// hand the user a spoken explanation.
    ///
    /// `create_page`/`update_page` hit the store exactly once, with no
    /// internal retry: a retried create would duplicate records.
    pub async fn execute(&self, descriptor: &ActionDescriptor) -> ExecutionResult {
        match descriptor {
            ActionDescriptor::GetDatabase { database_name } => {
                let entry = match self.registry.resolve(database_name) {
                    Ok(entry) => entry,
                    Err(e) => return resolution_failure(e),
                };
                self.store
                    .retrieve_database(&entry.id)
                    .await
                    .map_or_else(remote_failure, ExecutionResult::success)
            }

            ActionDescriptor::QueryDatabase {
                database_name,
                filter,
            } => {
                let entry = match self.registry.resolve(database_name) {
                    Ok(entry) => entry,
                    Err(e) => return resolution_failure(e),
                };
                self.store
                    .query_database(&entry.id, filter.clone())
                    .await
                    .map_or_else(remote_failure, ExecutionResult::success)
            }

            ActionDescriptor::CreatePage {
                database_name,
                properties,
            } => {
                let entry = match self.registry.resolve(database_name) {
                    Ok(entry) => entry,
                    Err(e) => return resolution_failure(e),
                };
                let wrapped = match properties::wrap_properties(entry, database_name, properties) {
                    Ok(v) => v,
                    Err(e) => return wrap_failure(e),
                };
                match self.store.create_page(&entry.id, wrapped).await {
                    Ok(response) => ExecutionResult::success(created_page_payload(response)),
                    Err(e) => remote_failure(e),
                }
            }

            ActionDescriptor::UpdatePage {
                page_id,
                properties,
            } => {
                // page_id names a store record, not a logical database, so it
                // bypasses the registry entirely.
                let Some(page_id) = page_id else {
                    return ExecutionResult::failure(
                        FailureKind::Validation,
                        "update_page には page_id が必要です",
                    );
                };
                let wrapped =
                    match properties::wrap_properties_inferred(&self.registry, properties) {
                        Ok(v) => v,
                        Err(e) => return wrap_failure(e),
                    };
                self.store
                    .update_page(page_id, wrapped)
                    .await
                    .map_or_else(remote_failure, ExecutionResult::success)
            }

            ActionDescriptor::Unsupported { requested } => ExecutionResult::failure(
                FailureKind::UnsupportedAction,
                format!("サポートされていない操作です: '{requested}'"),
            ),

            // The generator already decided this request cannot be executed;
            // pass its message straight through without touching the store.
            ActionDescriptor::Error { message } => {
                ExecutionResult::failure(FailureKind::Generation, message.clone())
            }
        }
    }
}

/// The caller mostly wants the new record's identity, not the store's full
/// page object; keep the identifier and url, fall back to the raw response.
fn created_page_payload(response: Value) -> Value {
    match response.get("id") {
        Some(id) => json!({ "id": id, "url": response.get("url").cloned().unwrap_or(Value::Null) }),
        None => response,
    }
}

fn resolution_failure(e: KotoError) -> ExecutionResult {
    ExecutionResult::failure(FailureKind::Resolution, e.to_string())
}

fn wrap_failure(e: KotoError) -> ExecutionResult {
    let kind = match e {
        KotoError::PropertyNotFound { .. } | KotoError::DatabaseNotFound(_) => {
            FailureKind::Resolution
        }
        _ => FailureKind::Validation,
    };
    ExecutionResult::failure(kind, e.to_string())
}

fn remote_failure(e: StoreError) -> ExecutionResult {
    ExecutionResult::failure(FailureKind::Remote, e.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
