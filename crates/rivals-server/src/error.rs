use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use rivals_core::error::AppError;

use crate::dto::ErrorResponse;

/// Wrapper so we can implement `IntoResponse` for `AppError`.
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        let err = &self.0;
        let status = if err.is_client_fault() {
            match err {
                AppError::NotFound(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::BAD_REQUEST,
            }
        } else if err.is_metadata_failure() {
            StatusCode::BAD_GATEWAY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let kind = match err {
            AppError::InvalidStoreUrl => "invalid_store_url",
            AppError::MaxCompetitorsReached { .. } => "max_competitors_reached",
            AppError::MetadataFetchTimeout(_) => "metadata_fetch_timeout",
            AppError::MetadataFetchFailed(_) => "metadata_fetch_failed",
            AppError::NotFound(_) => "not_found",
            AppError::PersistenceFailed(_) => "persistence_failed",
            AppError::ConfigError(_) => "config_error",
        };

        (status, kind)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status_and_kind();

        if status.is_server_error() {
            tracing::error!(error = %self.0, kind = error_type, "Request failed");
        }

        let body = ErrorResponse {
            error: error_type.to_string(),
            message: self.0.to_string(),
        };

        (status, axum::Json(body)).into_response()
    }
}
