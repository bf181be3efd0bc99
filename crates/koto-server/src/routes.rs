use axum::extract::State;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct InterpretRequest {
    pub text: String,
    /// Reference date for resolving relative expressions, `YYYY-MM-DD`.
    /// Defaults to the server's local date.
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InterpretResponse {
    pub response: String,
}

/// POST /v1/interpret — one utterance in, one spoken reply out.
pub async fn interpret(
    State(app): State<AppState>,
    Json(req): Json<InterpretRequest>,
) -> Result<Json<InterpretResponse>, AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::bad_request("text must not be empty"));
    }

    let date = match req.date {
        Some(d) => {
            NaiveDate::parse_from_str(&d, "%Y-%m-%d")
                .map_err(|_| AppError::bad_request(format!("date must be YYYY-MM-DD, got '{d}'")))?;
            d
        }
        None => chrono::Local::now().date_naive().format("%Y-%m-%d").to_string(),
    };

    let response = app.orchestrator.handle(&req.text, &date).await;
    Ok(Json(InterpretResponse { response }))
}

/// GET /health — liveness probe.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
