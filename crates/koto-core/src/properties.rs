//! Typed-property wrapping: raw model values into the store's envelopes.

use crate::error::{KotoError, Result};
use crate::registry::{DatabaseEntry, PropertyKind, SchemaRegistry};
use serde_json::{json, Map, Value};

/// Wrap every raw property value into the backing store's typed envelope,
/// using the property schema of `entry`. Unknown property names are an
/// error: silently passing them through would make the store reject the
/// whole call with a much less helpful message.
pub fn wrap_properties(entry: &DatabaseEntry, database_name: &str, raw: &Map<String, Value>) -> Result<Value> {
    let mut wrapped = Map::new();
    for (name, value) in raw {
        let schema = entry
            .properties
            .get(name)
            .ok_or_else(|| KotoError::PropertyNotFound {
                database: database_name.to_string(),
                property: name.to_string(),
            })?;
        wrapped.insert(name.clone(), wrap_value(schema.kind, name, value)?);
    }
    Ok(Value::Object(wrapped))
}

/// Same wrapping for `update_page`, where no logical database accompanies
/// the page id: property kinds are inferred by name across the registry.
pub fn wrap_properties_inferred(registry: &SchemaRegistry, raw: &Map<String, Value>) -> Result<Value> {
    let mut wrapped = Map::new();
    for (name, value) in raw {
        let (_, kind) =
            registry
                .infer_property_kind(name)
                .ok_or_else(|| KotoError::PropertyNotFound {
                    database: "<any>".to_string(),
                    property: name.to_string(),
                })?;
        wrapped.insert(name.clone(), wrap_value(kind, name, value)?);
    }
    Ok(Value::Object(wrapped))
}

pub fn wrap_value(kind: PropertyKind, name: &str, value: &Value) -> Result<Value> {
    let wrapped = match kind {
        PropertyKind::Title => json!({ "title": [{ "text": { "content": as_text(value) } }] }),
        PropertyKind::RichText => {
            json!({ "rich_text": [{ "text": { "content": as_text(value) } }] })
        }
        PropertyKind::Date => json!({ "date": { "start": as_text(value) } }),
        PropertyKind::Checkbox => json!({ "checkbox": as_bool(name, value)? }),
        PropertyKind::Select => json!({ "select": { "name": as_text(value) } }),
        PropertyKind::Status => json!({ "status": { "name": as_text(value) } }),
        PropertyKind::MultiSelect => {
            let names: Vec<Value> = as_list(value)
                .into_iter()
                .map(|v| json!({ "name": as_text(&v) }))
                .collect();
            json!({ "multi_select": names })
        }
        PropertyKind::Number => json!({ "number": as_number(name, value)? }),
        PropertyKind::Url => json!({ "url": as_text(value) }),
        PropertyKind::Relation => {
            let ids: Vec<Value> = as_list(value)
                .into_iter()
                .map(|v| json!({ "id": as_text(&v) }))
                .collect();
            json!({ "relation": ids })
        }
    };
    Ok(wrapped)
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Scalars are treated as a one-element list so the model may say
/// `"Tags": "A"` as well as `"Tags": ["A", "B"]`.
fn as_list(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        other => vec![other.clone()],
    }
}

fn as_bool(name: &str, value: &Value) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => Ok(n.as_f64().unwrap_or(0.0) != 0.0),
        Value::String(s) => match s.to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(true),
            "false" | "no" | "0" => Ok(false),
            _ => Err(KotoError::InvalidValue {
                property: name.to_string(),
                reason: format!("'{s}' is not a boolean"),
            }),
        },
        other => Err(KotoError::InvalidValue {
            property: name.to_string(),
            reason: format!("{other} is not a boolean"),
        }),
    }
}

fn as_number(name: &str, value: &Value) -> Result<f64> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| KotoError::InvalidValue {
            property: name.to_string(),
            reason: "not representable as f64".to_string(),
        }),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| KotoError::InvalidValue {
            property: name.to_string(),
            reason: format!("'{s}' is not a number"),
        }),
        other => Err(KotoError::InvalidValue {
            property: name.to_string(),
            reason: format!("{other} is not a number"),
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
