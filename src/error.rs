use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Payload Too Large: {0}")]
    PayloadTooLarge(String),

    #[error("Not Implemented")]
    NotImplemented,

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            AppError::NotImplemented => (
                StatusCode::NOT_IMPLEMENTED,
                "I don't know what you're trying to do...".to_string(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Request failed: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{e:#}"))
            }
        };

        error_page(status, &message)
    }
}

/// Renders the terminal response for a failed request: the status line plus a
/// minimal HTML body naming the code, its reason phrase, and `message`.
///
/// Panics when `status` is outside [400, 599]. Reaching this with a
/// non-error status is a bug in the caller, not a client-facing condition,
/// and it fails before any part of the response is produced.
pub fn error_page(status: StatusCode, message: &str) -> Response {
    assert!(
        (400..=599).contains(&status.as_u16()),
        "{} is not an error status",
        status.as_u16()
    );

    let reason = status.canonical_reason().unwrap_or("Unknown");
    let body = format!(
        "<h1>HTTP {}: {}</h1>\n<p>{}</p>",
        status.as_u16(),
        reason,
        message
    );

    (status, Html(body)).into_response()
}
