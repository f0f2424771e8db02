use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::form::FormError;
use crate::oauth::OAuthError;
use crate::session::SessionError;

/// Request level failure.
///
/// Submitted form problems are client errors (400). Everything else is logged
/// and answered with a 500 carrying the raw error message as plain text.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Form(#[from] FormError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Identity provider error: {0}")]
    OAuth(#[from] OAuthError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid event id `{0}`")]
    InvalidEventId(String),

    #[error("Event {0} not found")]
    EventNotFound(i64),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Form(_) | AppError::InvalidEventId(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }

        (status, self.to_string()).into_response()
    }
}
