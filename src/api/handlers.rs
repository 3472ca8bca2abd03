use crate::api::error::ApiError;
use crate::domain::entities::document::Document;
use crate::domain::entities::widget::Widget;
use crate::domain::values::search::{SearchQuery, SearchResponse};
use crate::DocRag;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub type AppState = Arc<DocRag>;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    pub limit: Option<String>,
}

/// Body for create and update. `id` is only honoured on create.
#[derive(Debug, Deserialize)]
pub struct RecordInput {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Map an axum body rejection onto the JSON error shape.
fn body<T>(input: Result<Json<T>, JsonRejection>, message: &str) -> Result<T, ApiError> {
    input.map(|Json(v)| v).map_err(|e| {
        tracing::warn!(error = %e, "Rejected request body");
        ApiError::bad_request(message)
    })
}

pub async fn search(
    State(app): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Query(params) = params.map_err(|e| {
        tracing::warn!(error = %e, "Rejected search query string");
        ApiError::bad_request("Invalid search parameters")
    })?;
    let query = params
        .query
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::bad_request("Query parameter is required"))?;

    let limit = match params.limit.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(
            raw.parse::<i64>()
                .map_err(|_| ApiError::bad_request("Invalid limit parameter"))?,
        ),
    };

    let response = app
        .search(SearchQuery::new(query, limit))
        .await
        .map_err(|e| ApiError::from_domain(e, "Failed to search documents"))?;
    Ok(Json(response))
}

// Documents

pub async fn create_document(
    State(app): State<AppState>,
    input: Result<Json<RecordInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Document>), ApiError> {
    let input = body(input, "Invalid document data")?;
    let document = app
        .create_document(input.id, input.name, input.value)
        .await
        .map_err(|e| ApiError::from_domain(e, "Failed to create document"))?;
    Ok((StatusCode::CREATED, Json(document)))
}

pub async fn list_documents(State(app): State<AppState>) -> Result<Json<Vec<Document>>, ApiError> {
    app.list_documents()
        .map(Json)
        .map_err(|e| ApiError::from_domain(e, "Failed to retrieve documents"))
}

pub async fn get_document(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Document>, ApiError> {
    app.get_document(&id)
        .map(Json)
        .map_err(|e| ApiError::from_domain(e, "Failed to retrieve document"))
}

pub async fn update_document(
    State(app): State<AppState>,
    Path(id): Path<String>,
    input: Result<Json<RecordInput>, JsonRejection>,
) -> Result<Json<Document>, ApiError> {
    let input = body(input, "Invalid document data")?;
    app.update_document(&id, input.name, input.value)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_domain(e, "Failed to update document"))
}

pub async fn delete_document(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    app.delete_document(&id)
        .await
        .map_err(|e| ApiError::from_domain(e, "Failed to delete document"))?;
    Ok(StatusCode::NO_CONTENT)
}

// Widgets

pub async fn create_widget(
    State(app): State<AppState>,
    input: Result<Json<RecordInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Widget>), ApiError> {
    let input = body(input, "Invalid widget data")?;
    let widget = app
        .create_widget(input.id, input.name, input.value)
        .map_err(|e| ApiError::from_domain(e, "Failed to create widget"))?;
    Ok((StatusCode::CREATED, Json(widget)))
}

pub async fn list_widgets(State(app): State<AppState>) -> Result<Json<Vec<Widget>>, ApiError> {
    app.list_widgets()
        .map(Json)
        .map_err(|e| ApiError::from_domain(e, "Failed to retrieve widgets"))
}

pub async fn get_widget(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Widget>, ApiError> {
    app.get_widget(&id)
        .map(Json)
        .map_err(|e| ApiError::from_domain(e, "Failed to retrieve widget"))
}

pub async fn update_widget(
    State(app): State<AppState>,
    Path(id): Path<String>,
    input: Result<Json<RecordInput>, JsonRejection>,
) -> Result<Json<Widget>, ApiError> {
    let input = body(input, "Invalid widget data")?;
    app.update_widget(&id, input.name, input.value)
        .map(Json)
        .map_err(|e| ApiError::from_domain(e, "Failed to update widget"))
}

pub async fn delete_widget(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    app.delete_widget(&id)
        .map_err(|e| ApiError::from_domain(e, "Failed to delete widget"))?;
    Ok(StatusCode::NO_CONTENT)
}
