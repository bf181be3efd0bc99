use crate::error::{KotoError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;

// ---------------------------------------------------------------------------
// PropertyKind / PropertySchema
// ---------------------------------------------------------------------------

/// The backing store's property kinds we know how to wrap.
///
/// The set mirrors the schema documents the configuration source holds; a
/// kind outside this set fails config deserialization rather than silently
/// producing an unwrappable payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    Title,
    RichText,
    Date,
    Checkbox,
    Select,
    MultiSelect,
    Number,
    Status,
    Url,
    Relation,
}

impl PropertyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyKind::Title => "title",
            PropertyKind::RichText => "rich_text",
            PropertyKind::Date => "date",
            PropertyKind::Checkbox => "checkbox",
            PropertyKind::Select => "select",
            PropertyKind::MultiSelect => "multi_select",
            PropertyKind::Number => "number",
            PropertyKind::Status => "status",
            PropertyKind::Url => "url",
            PropertyKind::Relation => "relation",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub kind: PropertyKind,
    /// Choices for select/status properties, surfaced to the model so it
    /// picks an existing option instead of inventing one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl PropertySchema {
    pub fn new(kind: PropertyKind) -> Self {
        Self {
            kind,
            options: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// DatabaseEntry
// ---------------------------------------------------------------------------

/// One logical database: the human/LLM-facing alias plus everything needed
/// to talk to the backing store about it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseEntry {
    /// Opaque backing-store identifier. Never shown to the model.
    pub id: String,
    /// Human display name (e.g. the page title in the store).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Natural-language description, embedded into the command prompt.
    pub description: String,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertySchema>,
}

// ---------------------------------------------------------------------------
// SchemaRegistry
// ---------------------------------------------------------------------------

/// Immutable lookup from logical database names to backing-store entries.
///
/// Built once at startup from the configuration source and shared read-only
/// across requests (`Arc<SchemaRegistry>`); there is deliberately no way to
/// mutate it after construction.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    databases: BTreeMap<String, DatabaseEntry>,
}

impl SchemaRegistry {
    pub fn new(databases: BTreeMap<String, DatabaseEntry>) -> Self {
        Self { databases }
    }

    pub fn len(&self) -> usize {
        self.databases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.databases.is_empty()
    }

    /// Resolve a logical name to its entry. A miss is an error, never a
    /// default: a wrong backing identifier would corrupt the external store.
    pub fn resolve(&self, logical_name: &str) -> Result<&DatabaseEntry> {
        self.databases
            .get(logical_name)
            .ok_or_else(|| KotoError::DatabaseNotFound(logical_name.to_string()))
    }

    /// All entries in deterministic (name) order.
    pub fn describe_all(&self) -> impl Iterator<Item = (&str, &DatabaseEntry)> {
        self.databases.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn property_kind(&self, logical_name: &str, property: &str) -> Result<PropertyKind> {
        let entry = self.resolve(logical_name)?;
        entry
            .properties
            .get(property)
            .map(|schema| schema.kind)
            .ok_or_else(|| KotoError::PropertyNotFound {
                database: logical_name.to_string(),
                property: property.to_string(),
            })
    }

    /// Find a property kind by name alone, scanning databases in name order.
    ///
    /// Used for `update_page`, where the descriptor carries a page id rather
    /// than a logical database name. First match wins.
    pub fn infer_property_kind(&self, property: &str) -> Option<(&str, PropertyKind)> {
        self.databases.iter().find_map(|(name, entry)| {
            entry
                .properties
                .get(property)
                .map(|schema| (name.as_str(), schema.kind))
        })
    }

    /// Render the database-descriptions block embedded into the command
    /// prompt: one line per database, plus its property schema so the model
    /// can name properties and pick valid select options.
    pub fn render_descriptions(&self) -> String {
        let mut out = String::new();
        for (name, entry) in self.describe_all() {
            match &entry.title {
                Some(title) => {
                    let _ = writeln!(out, "- {name} ({title}): {}", entry.description);
                }
                None => {
                    let _ = writeln!(out, "- {name}: {}", entry.description);
                }
            }
            for (prop, schema) in &entry.properties {
                if schema.options.is_empty() {
                    let _ = writeln!(out, "    - {prop} ({})", schema.kind.as_str());
                } else {
                    let _ = writeln!(
                        out,
                        "    - {prop} ({}) [options: {}]",
                        schema.kind.as_str(),
                        schema.options.join(", ")
                    );
                }
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
