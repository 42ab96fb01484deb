//! Error type returned by the HTTP handlers.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

/// Everything that can go wrong behind a handler. Both variants are server
/// faults; a missing message is not an error.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("storage operation failed: {0:#}")]
    Storage(#[from] anyhow::Error),

    #[error("blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("{}", self);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "internal server error" })),
        )
            .into_response()
    }
}

/// Run a synchronous storage call off the async runtime.
pub(crate) async fn run_blocking<F, T>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(f).await??)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_error_maps_to_500() {
        let res = ApiError::from(anyhow::anyhow!("disk on fire")).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn run_blocking_propagates_storage_errors() {
        let result: Result<(), _> = run_blocking(|| Err(anyhow::anyhow!("boom"))).await;
        assert!(matches!(result, Err(ApiError::Storage(_))));
    }

    #[tokio::test]
    async fn run_blocking_reports_panics_as_task_errors() {
        let result: Result<(), _> = run_blocking(|| panic!("worker died")).await;
        assert!(matches!(result, Err(ApiError::Task(_))));
    }
}
