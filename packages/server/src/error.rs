use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bento_sync::RemoteError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Remote store error: {0}")]
    Remote(#[from] RemoteError),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::PageNotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Remote(RemoteError::NotFound(_)) => StatusCode::NOT_FOUND,
            ServerError::Remote(RemoteError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::Remote(RemoteError::Rejected(_)) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
