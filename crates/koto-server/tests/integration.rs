use async_trait::async_trait;
use axum::http::StatusCode;
use http_body_util::BodyExt;
use koto_core::model::{LanguageModel, ModelError};
use koto_core::registry::{DatabaseEntry, PropertyKind, PropertySchema};
use koto_core::store::{DocumentStore, StoreError};
use koto_core::{Orchestrator, SchemaRegistry};
use serde_json::{json, Value};
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct ScriptedModel {
    replies: Mutex<VecDeque<String>>,
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn generate(&self, _prompt: &str) -> Result<String, ModelError> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(ModelError::Empty)
    }
}

struct StubStore;

#[async_trait]
impl DocumentStore for StubStore {
    async fn retrieve_database(&self, database_id: &str) -> Result<Value, StoreError> {
        Ok(json!({ "id": database_id }))
    }

    async fn query_database(
        &self,
        _database_id: &str,
        _filter: Option<Value>,
    ) -> Result<Value, StoreError> {
        Ok(json!({ "results": [] }))
    }

    async fn create_page(&self, _database_id: &str, _properties: Value) -> Result<Value, StoreError> {
        Ok(json!({ "id": "page-1", "url": "https://store.example/page-1" }))
    }

    async fn update_page(&self, _page_id: &str, _properties: Value) -> Result<Value, StoreError> {
        Ok(json!({ "id": "page-1" }))
    }
}

fn app(replies: Vec<&str>) -> axum::Router {
    let mut properties = BTreeMap::new();
    properties.insert("名前".to_string(), PropertySchema::new(PropertyKind::Title));
    let mut databases = BTreeMap::new();
    databases.insert(
        "shopping_list".to_string(),
        DatabaseEntry {
            id: "db-1".into(),
            title: Some("買い物リスト".into()),
            description: "日々の買い物メモ".into(),
            properties,
        },
    );
    let registry = Arc::new(SchemaRegistry::new(databases));

    let model = Arc::new(ScriptedModel {
        replies: Mutex::new(replies.into_iter().map(str::to_string).collect()),
    });
    let orchestrator = Arc::new(Orchestrator::new(registry, model, Arc::new(StubStore)));
    koto_server::build_router(orchestrator)
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let req = axum::http::Request::builder()
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

async fn post_json(app: axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let req = axum::http::Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(axum::body::Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

// ---------------------------------------------------------------------------
// /health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_returns_ok() {
    let (status, body) = get(app(vec![]), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

// ---------------------------------------------------------------------------
// /v1/interpret
// ---------------------------------------------------------------------------

#[tokio::test]
async fn interpret_returns_synthesized_reply() {
    let app = app(vec![
        r#"{"action":"create_page","database_name":"shopping_list","properties":{"名前":"牛乳"}}"#,
        "買い物リストに牛乳を追加しました。",
    ]);
    let (status, body) = post_json(
        app,
        "/v1/interpret",
        json!({ "text": "買い物リストに牛乳を追加して", "date": "2024-01-01" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "買い物リストに牛乳を追加しました。");
}

#[tokio::test]
async fn interpret_defaults_the_date() {
    let app = app(vec![
        r#"{"action":"query_database","database_name":"shopping_list"}"#,
        "リストは空です。",
    ]);
    let (status, body) = post_json(app, "/v1/interpret", json!({ "text": "一覧を見せて" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "リストは空です。");
}

#[tokio::test]
async fn interpret_rejects_malformed_date() {
    let app = app(vec![]);
    let (status, body) = post_json(
        app,
        "/v1/interpret",
        json!({ "text": "一覧を見せて", "date": "明日" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("YYYY-MM-DD"));
}

#[tokio::test]
async fn interpret_rejects_empty_text() {
    let app = app(vec![]);
    let (status, body) = post_json(
        app,
        "/v1/interpret",
        json!({ "text": "   ", "date": "2024-01-01" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("empty"));
}

#[tokio::test]
async fn model_outage_still_answers_200_with_fallback() {
    // No scripted replies: every model call fails.
    let app = app(vec![]);
    let (status, body) = post_json(
        app,
        "/v1/interpret",
        json!({ "text": "牛乳", "date": "2024-01-01" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], koto_core::synthesizer::FALLBACK_REPLY);
}
