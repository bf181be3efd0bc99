//! Document-store seam: the four-call contract against the backing store.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The store accepted the connection but rejected the call.
    #[error("store API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The store could not be reached at all.
    #[error("store transport error: {0}")]
    Transport(String),
}

/// The only four operations the core ever performs against the store.
/// Concrete wire protocol lives in the store-adapter crate.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn retrieve_database(&self, database_id: &str) -> Result<Value, StoreError>;

    async fn query_database(
        &self,
        database_id: &str,
        filter: Option<Value>,
    ) -> Result<Value, StoreError>;

    async fn create_page(&self, database_id: &str, properties: Value) -> Result<Value, StoreError>;

    async fn update_page(&self, page_id: &str, properties: Value) -> Result<Value, StoreError>;
}
