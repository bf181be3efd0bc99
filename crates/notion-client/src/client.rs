use crate::error::NotionError;
use crate::types::{ApiErrorBody, CreatePageRequest, Parent, QueryRequest, UpdatePageRequest};
use serde_json::Value;
use uuid::Uuid;

pub const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1";
pub const NOTION_VERSION: &str = "2022-06-28";

/// Accept ids as the API hands them out (dashed UUID) or as pasted from a
/// page URL (32 hex chars, no dashes), and return the canonical dashed form.
pub fn normalize_id(raw: &str) -> Result<String, NotionError> {
    let trimmed = raw.trim();
    match Uuid::parse_str(trimmed) {
        Ok(uuid) => Ok(uuid.hyphenated().to_string()),
        Err(_) => Err(NotionError::InvalidId(trimmed.to_string())),
    }
}

/// Client for the four data-plane endpoints the orchestrator uses. Auth and
/// the pinned `Notion-Version` header go on every request.
#[derive(Clone)]
pub struct NotionClient {
    http: reqwest::Client,
    token: String,
    base_url: String,
}

impl NotionClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            token: token.into(),
            base_url: base_url.into(),
        }
    }

    pub async fn retrieve_database(&self, database_id: &str) -> Result<Value, NotionError> {
        let id = normalize_id(database_id)?;
        let url = format!("{}/databases/{id}", self.base());
        let response = self.request(self.http.get(&url)).await?;
        Self::into_json(response).await
    }

    pub async fn query_database(
        &self,
        database_id: &str,
        filter: Option<Value>,
    ) -> Result<Value, NotionError> {
        let id = normalize_id(database_id)?;
        let url = format!("{}/databases/{id}/query", self.base());
        let body = QueryRequest { filter };
        let response = self.request(self.http.post(&url).json(&body)).await?;
        Self::into_json(response).await
    }

    pub async fn create_page(
        &self,
        database_id: &str,
        properties: Value,
    ) -> Result<Value, NotionError> {
        let id = normalize_id(database_id)?;
        let url = format!("{}/pages", self.base());
        let body = CreatePageRequest {
            parent: Parent { database_id: id },
            properties,
        };
        let response = self.request(self.http.post(&url).json(&body)).await?;
        Self::into_json(response).await
    }

    pub async fn update_page(&self, page_id: &str, properties: Value) -> Result<Value, NotionError> {
        let id = normalize_id(page_id)?;
        let url = format!("{}/pages/{id}", self.base());
        let body = UpdatePageRequest { properties };
        let response = self.request(self.http.patch(&url).json(&body)).await?;
        Self::into_json(response).await
    }

    fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    async fn request(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, NotionError> {
        let response = builder
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let body: ApiErrorBody = serde_json::from_str(&text).unwrap_or(ApiErrorBody {
            code: "unknown".to_string(),
            message: text,
        });
        tracing::warn!(
            status = status.as_u16(),
            code = %body.code,
            message = %body.message,
            "Notion API call failed"
        );
        Err(NotionError::Api {
            status: status.as_u16(),
            code: body.code,
            message: body.message,
        })
    }

    async fn into_json(response: reqwest::Response) -> Result<Value, NotionError> {
        Ok(response.json().await?)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashed_uuid_is_kept_canonical() {
        let id = "1f3a8b9c-0d1e-4f2a-9b3c-5d6e7f8a9b0c";
        assert_eq!(normalize_id(id).unwrap(), id);
    }

    #[test]
    fn undashed_hex_gains_dashes() {
        let id = "1f3a8b9c0d1e4f2a9b3c5d6e7f8a9b0c";
        assert_eq!(
            normalize_id(id).unwrap(),
            "1f3a8b9c-0d1e-4f2a-9b3c-5d6e7f8a9b0c"
        );
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let id = "  1f3a8b9c-0d1e-4f2a-9b3c-5d6e7f8a9b0c\n";
        assert_eq!(
            normalize_id(id).unwrap(),
            "1f3a8b9c-0d1e-4f2a-9b3c-5d6e7f8a9b0c"
        );
    }

    #[test]
    fn garbage_id_is_rejected() {
        assert!(matches!(
            normalize_id("not-an-id"),
            Err(NotionError::InvalidId(_))
        ));
        assert!(matches!(normalize_id(""), Err(NotionError::InvalidId(_))));
    }

    #[test]
    fn uppercase_hex_is_lowercased() {
        let id = "1F3A8B9C0D1E4F2A9B3C5D6E7F8A9B0C";
        assert_eq!(
            normalize_id(id).unwrap(),
            "1f3a8b9c-0d1e-4f2a-9b3c-5d6e7f8a9b0c"
        );
    }
}
