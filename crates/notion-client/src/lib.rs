//! `notion-client` — async client for the Notion data plane: retrieve and
//! query databases, create and patch pages. Property payloads are passed as
//! pre-wrapped JSON; the typed envelope rules live upstream in `koto-core`.

pub mod client;
pub mod error;
pub mod types;

pub use client::{normalize_id, NotionClient, DEFAULT_BASE_URL, NOTION_VERSION};
pub use error::NotionError;
