use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::prompts::preset_prompts;
use super::service::HrAssistant;
use crate::workforce::store::TableStore;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PromptQuery {
    pub employee: Option<String>,
    pub department: Option<String>,
}

/// Router for the chat entry point and the preset prompts.
pub fn assistant_router<S>(assistant: Arc<HrAssistant<S>>) -> Router
where
    S: TableStore + 'static,
{
    Router::new()
        .route("/api/v1/chat", post(chat_handler::<S>))
        .route("/api/v1/prompts", get(prompts_handler::<S>))
        .with_state(assistant)
}

pub(crate) async fn chat_handler<S>(
    State(assistant): State<Arc<HrAssistant<S>>>,
    Json(request): Json<ChatRequest>,
) -> Response
where
    S: TableStore + 'static,
{
    if request.message.trim().is_empty() {
        let payload = json!({ "error": "message must not be empty" });
        return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
    }

    let today = request.today.unwrap_or_else(|| Local::now().date_naive());
    match assistant.ask(&request.message, today).await {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(error) => {
            warn!(engine = assistant.engine_name(), error = %error, "chat request failed");
            let payload = json!({ "error": error.to_string() });
            (error.status_code(), Json(payload)).into_response()
        }
    }
}

pub(crate) async fn prompts_handler<S>(
    State(_assistant): State<Arc<HrAssistant<S>>>,
    Query(query): Query<PromptQuery>,
) -> Response
where
    S: TableStore + 'static,
{
    let prompts = preset_prompts(query.employee.as_deref(), query.department.as_deref());
    (StatusCode::OK, Json(json!({ "prompts": prompts }))).into_response()
}
