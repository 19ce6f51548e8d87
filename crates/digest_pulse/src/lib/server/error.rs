use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use digest_store::JobResult;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Unsupported file type")]
    UnsupportedFileType,
    #[error("Invalid upload: {0}")]
    Upload(#[from] MultipartError),
    #[error("Failed to extract text from the file")]
    ExtractionFailed,
    #[error("File {0} not found")]
    NotFound(String),
    #[error("{error}")]
    VideoFailed { error: String },
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::UnsupportedFileType => StatusCode::BAD_REQUEST,
            ApiError::Upload(e) => e.status(),
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::ExtractionFailed | ApiError::VideoFailed { .. } | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::VideoFailed { error } => {
                (status, Json(JobResult::failed(error))).into_response()
            }
            ApiError::Internal(e) => {
                tracing::error!(error = ?e, "Request failed");
                (status, Json(json!({ "error": "Internal server error" }))).into_response()
            }
            other => (status, Json(json!({ "error": other.to_string() }))).into_response(),
        }
    }
}
