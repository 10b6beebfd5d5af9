use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{FormRejection, PathRejection},
    },
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use super::render;

#[derive(Error, Debug)]
pub enum WebError {
    #[error("storage error: {0}")]
    Storage(#[from] crate::Error),

    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("could not render page: {0}")]
    Render(#[from] minijinja::Error),

    #[error("could not read form: {0}")]
    Form(#[from] FormRejection),

    #[error("could not read upload: {0}")]
    MultipartRequest(#[from] MultipartRejection),

    #[error("could not read upload: {0}")]
    Multipart(#[from] MultipartError),

    #[error("invalid path: {0}")]
    Path(#[from] PathRejection),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("no file provided in field: {0}")]
    MissingUpload(&'static str),
}

impl WebError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::Storage(_) | WebError::Task(_) | WebError::Render(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            WebError::Form(e) => e.status(),
            WebError::MultipartRequest(e) => e.status(),
            WebError::Multipart(e) => e.status(),
            WebError::Path(e) => e.status(),
            WebError::MissingField(_) | WebError::MissingUpload(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            error!(error = %self, "request failed");
            "Something went wrong while reading or writing portfolio data.".to_string()
        } else {
            warn!(error = %self, status = status.as_u16(), "request rejected");
            self.to_string()
        };

        match render::error_page(status, &message) {
            Ok(page) => (status, Html(page)).into_response(),
            Err(e) => {
                error!(error = %e, "could not render error page");
                (status, message).into_response()
            }
        }
    }
}
