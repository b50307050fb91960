use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV export error: {0}")]
    Csv(#[from] csv::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        // Uniform flash-style body: a message plus, for auth failures, the
        // safe page the presentation layer sends the user back to.
        let (status, error_message, redirect_to) = match self {
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            Error::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, Some("/login")),
            Error::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, Some("/dashboard")),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            Error::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
            Error::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string(), None),
            Error::Database(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string(), None),
            Error::Json(err) => (StatusCode::BAD_REQUEST, err.to_string(), None),
            Error::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg, None),
            Error::Io(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string(), None),
            Error::Csv(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string(), None),
            Error::Anyhow(err) => (StatusCode::BAD_REQUEST, err.to_string(), None),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred".to_string(),
                None,
            ),
        };

        let body = match redirect_to {
            Some(target) => Json(json!({ "error": error_message, "redirect_to": target })),
            None => Json(json!({ "error": error_message })),
        };
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("Resource not found".to_string()),
            other => Error::Database(other),
        }
    }
}
