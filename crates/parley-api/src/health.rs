use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;

use crate::error::{ApiError, run_blocking};
use crate::state::AppState;

/// GET /health: liveness plus a cheap storage round trip.
pub async fn health(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let messages = run_blocking(move || state.db.count_messages()).await?;
    Ok(Json(json!({ "status": "ok", "messages": messages })))
}
