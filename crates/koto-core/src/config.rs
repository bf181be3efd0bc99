use crate::error::{KotoError, Result};
use crate::registry::{DatabaseEntry, PropertyKind, SchemaRegistry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ModelConfig / StoreConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_model_name")]
    pub name: String,
}

fn default_model_name() -> String {
    "gemini-2.0-flash-lite".to_string()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_model_name(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Override for tests and self-hosted proxies; production uses the
    /// store client's built-in default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { base_url: None }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

/// The read-once process configuration: model settings plus the logical
/// database schemas the registry is built from. Loaded at startup; API keys
/// come from the environment, never from this file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub databases: BTreeMap<String, DatabaseEntry>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(KotoError::ConfigNotFound(path.display().to_string()));
        }
        let data = std::fs::read_to_string(path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn registry(&self) -> SchemaRegistry {
        SchemaRegistry::new(self.databases.clone())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.databases.is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "no databases configured: every command will fail to resolve".to_string(),
            });
        }

        let mut seen_ids: BTreeMap<&str, &str> = BTreeMap::new();
        for (name, entry) in &self.databases {
            if entry.description.trim().is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!(
                        "database '{name}' has an empty description: the model cannot choose it"
                    ),
                });
            }

            let has_title = entry
                .properties
                .values()
                .any(|schema| schema.kind == PropertyKind::Title);
            if !entry.properties.is_empty() && !has_title {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("database '{name}' declares no title property"),
                });
            }

            if let Some(previous) = seen_ids.insert(entry.id.as_str(), name.as_str()) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!(
                        "databases '{previous}' and '{name}' share backing id '{}'",
                        entry.id
                    ),
                });
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
