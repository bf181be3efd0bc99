use serde::{Deserialize, Serialize};
use serde_json::Value;

// ─── Request bodies ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Parent {
    pub database_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePageRequest {
    pub parent: Parent,
    pub properties: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdatePageRequest {
    pub properties: Value,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
}

// ─── Error body ───────────────────────────────────────────────────────────

/// Shape of a non-2xx response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

// ─── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_request_serializes_in_api_shape() {
        let req = CreatePageRequest {
            parent: Parent {
                database_id: "db-1".into(),
            },
            properties: json!({ "名前": { "title": [{ "text": { "content": "牛乳" } }] } }),
        };
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["parent"]["database_id"], "db-1");
        assert_eq!(
            body["properties"]["名前"]["title"][0]["text"]["content"],
            "牛乳"
        );
    }

    #[test]
    fn empty_query_request_omits_filter() {
        let body = serde_json::to_value(QueryRequest::default()).unwrap();
        assert_eq!(body, json!({}));
    }

    #[test]
    fn query_request_passes_filter_through() {
        let filter = json!({ "property": "名前", "title": { "equals": "牛乳" } });
        let body = serde_json::to_value(QueryRequest {
            filter: Some(filter.clone()),
        })
        .unwrap();
        assert_eq!(body["filter"], filter);
    }

    #[test]
    fn api_error_body_parses() {
        let body: ApiErrorBody = serde_json::from_str(
            r#"{ "object": "error", "status": 404, "code": "object_not_found", "message": "Could not find page" }"#,
        )
        .unwrap();
        assert_eq!(body.code, "object_not_found");
        assert_eq!(body.message, "Could not find page");
    }
}
