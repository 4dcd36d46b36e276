//! Update API endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::{success, ApiResult};
use crate::models::{DeleteConfirmation, Page, PageQuery, PageRequest, Update, UpdateRequest};
use crate::AppState;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Case-insensitive substring to look for.
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl SearchQuery {
    fn page_request(&self) -> PageRequest {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
        .into()
    }
}

/// Unreadable bodies (bad JSON, wrong field types, wrong content type) are
/// treated as an empty request so they fail field validation with a 400.
fn request_or_empty(payload: Result<Json<UpdateRequest>, JsonRejection>) -> UpdateRequest {
    match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!("Unreadable update body: {}", rejection.body_text());
            UpdateRequest::default()
        }
    }
}

/// GET /api/updates - List updates, newest first.
pub async fn list_updates(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> ApiResult<Page<Update>> {
    success(state.updates.list(params.into()).await?)
}

/// GET /api/updates/search - Search updates by keyword.
pub async fn search_updates(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> ApiResult<Page<Update>> {
    let page = params.page_request();
    success(state.updates.search(params.keyword.as_deref(), page).await?)
}

/// POST /api/updates - Create an update.
pub async fn create_update(
    State(state): State<AppState>,
    payload: Result<Json<UpdateRequest>, JsonRejection>,
) -> ApiResult<Update> {
    success(state.updates.create(request_or_empty(payload)).await?)
}

/// GET /api/updates/{id} - Get a single update.
pub async fn get_update(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Update> {
    success(state.updates.get(&id).await?)
}

/// PUT /api/updates/{id} - Replace the text of an update.
pub async fn edit_update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateRequest>, JsonRejection>,
) -> ApiResult<Update> {
    success(state.updates.update(&id, request_or_empty(payload)).await?)
}

/// DELETE /api/updates/{id} - Delete an update.
pub async fn delete_update(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<DeleteConfirmation> {
    success(state.updates.delete(&id).await?)
}
