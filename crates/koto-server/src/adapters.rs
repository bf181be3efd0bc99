//! Driver-crate adapters: the HTTP clients behind the core's seams.

use async_trait::async_trait;
use gemini_client::{GeminiClient, GeminiError};
use koto_core::model::{LanguageModel, ModelError};
use koto_core::store::{DocumentStore, StoreError};
use notion_client::{NotionClient, NotionError};
use serde_json::Value;

// ---------------------------------------------------------------------------
// GeminiModel
// ---------------------------------------------------------------------------

pub struct GeminiModel {
    client: GeminiClient,
}

impl GeminiModel {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LanguageModel for GeminiModel {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        self.client
            .generate_content(prompt)
            .await
            .map_err(map_model_error)
    }
}

fn map_model_error(e: GeminiError) -> ModelError {
    match e {
        GeminiError::Http(e) => ModelError::Transport(e.to_string()),
        GeminiError::Api { status, message } => ModelError::Api { status, message },
        // A safety block is a successful call that yields nothing usable.
        GeminiError::Blocked(reason) => ModelError::Api {
            status: 200,
            message: format!("prompt blocked by safety filter: {reason}"),
        },
        GeminiError::NoCandidates => ModelError::Empty,
    }
}

// ---------------------------------------------------------------------------
// NotionStore
// ---------------------------------------------------------------------------

pub struct NotionStore {
    client: NotionClient,
}

impl NotionStore {
    pub fn new(client: NotionClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DocumentStore for NotionStore {
    async fn retrieve_database(&self, database_id: &str) -> Result<Value, StoreError> {
        self.client
            .retrieve_database(database_id)
            .await
            .map_err(map_store_error)
    }

    async fn query_database(
        &self,
        database_id: &str,
        filter: Option<Value>,
    ) -> Result<Value, StoreError> {
        self.client
            .query_database(database_id, filter)
            .await
            .map_err(map_store_error)
    }

    async fn create_page(&self, database_id: &str, properties: Value) -> Result<Value, StoreError> {
        self.client
            .create_page(database_id, properties)
            .await
            .map_err(map_store_error)
    }

    async fn update_page(&self, page_id: &str, properties: Value) -> Result<Value, StoreError> {
        self.client
            .update_page(page_id, properties)
            .await
            .map_err(map_store_error)
    }
}

fn map_store_error(e: NotionError) -> StoreError {
    match e {
        NotionError::Http(e) => StoreError::Transport(e.to_string()),
        NotionError::Api {
            status,
            code,
            message,
        } => StoreError::Api {
            status,
            message: format!("{code}: {message}"),
        },
        NotionError::InvalidId(id) => StoreError::Api {
            status: 400,
            message: format!("invalid id: {id}"),
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
