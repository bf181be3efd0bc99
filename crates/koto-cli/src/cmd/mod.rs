pub mod ask;
pub mod schema;
pub mod serve;

use anyhow::{Context, Result};
use gemini_client::GeminiClient;
use koto_core::{Config, Orchestrator};
use koto_server::{GeminiModel, NotionStore};
use notion_client::NotionClient;
use std::path::Path;
use std::sync::Arc;

/// Load the config and wire up the orchestrator against the live APIs.
/// Both keys are checked up front so a misconfigured environment fails
/// before any network call.
pub fn build_orchestrator(config_path: &Path) -> Result<Orchestrator> {
    let config = Config::load(config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    let gemini_key = std::env::var("GEMINI_API_KEY")
        .context("GEMINI_API_KEY is not set")?;
    let notion_key = std::env::var("NOTION_API_KEY")
        .context("NOTION_API_KEY is not set")?;

    let model = GeminiModel::new(GeminiClient::new(gemini_key, &config.model.name));
    let notion = match &config.store.base_url {
        Some(base_url) => NotionClient::with_base_url(notion_key, base_url),
        None => NotionClient::new(notion_key),
    };
    let store = NotionStore::new(notion);

    Ok(Orchestrator::new(
        Arc::new(config.registry()),
        Arc::new(model),
        Arc::new(store),
    ))
}
