use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::use_cases::upload_links::UploadLinkError;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for UploadLinkError {
    fn into_response(self) -> Response {
        let status = match &self {
            UploadLinkError::NotFound => StatusCode::NOT_FOUND,
            UploadLinkError::BadRequest(_) => StatusCode::BAD_REQUEST,
            UploadLinkError::PermissionDenied => StatusCode::FORBIDDEN,
            UploadLinkError::Unauthorized => StatusCode::UNAUTHORIZED,
            UploadLinkError::Internal(err) => {
                tracing::error!(error = ?err, "internal_server_error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
