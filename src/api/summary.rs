//! Summary API endpoint.

use axum::extract::State;

use super::{success, ApiResult};
use crate::models::Summary;
use crate::AppState;

/// GET /api/summary - Digest of the updates from the last 24 hours.
pub async fn get_summary(State(state): State<AppState>) -> ApiResult<Summary> {
    success(state.summaries.summarize().await?)
}
