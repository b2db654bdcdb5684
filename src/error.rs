use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::cache::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("blocked_bot")]
    BlockedBot,
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BlockedBot => (StatusCode::FORBIDDEN, "blocked_bot"),
            AppError::Store(e) => {
                tracing::error!("Store operation failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "store_unavailable")
            }
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}
