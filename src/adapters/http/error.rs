use crate::error::{ErrorKind, IngestError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IngestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            IngestError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            IngestError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            IngestError::VideoNotFound(_) => StatusCode::NOT_FOUND,
            other => match other.kind() {
                ErrorKind::ClientInput => StatusCode::BAD_REQUEST,
                ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
                ErrorKind::ServerSide => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for IngestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Causes go to the log only; the body carries the top-level message.
        match self.kind() {
            ErrorKind::ServerSide => {
                tracing::error!(status = status.as_u16(), error = %self.detailed_message(), "request failed")
            }
            _ => {
                tracing::warn!(status = status.as_u16(), error = %self.detailed_message(), "request rejected")
            }
        }

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
