use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use snip_core::ShortenerError;
use tracing::error;

use crate::model::ErrorResponse;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    /// The request body was missing or not the expected JSON.
    InvalidBody,
    /// The URL cannot be sent back in a `Location` header.
    UnredirectableUrl,
    /// A stored URL could not be turned into a `Location` header.
    InvalidRedirectTarget,
    Shortener(ShortenerError),
}

impl From<ShortenerError> for AppError {
    fn from(err: ShortenerError) -> Self {
        AppError::Shortener(err)
    }
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::InvalidBody => (StatusCode::BAD_REQUEST, "Invalid request body".to_string()),
            AppError::UnredirectableUrl => (
                StatusCode::BAD_REQUEST,
                "URL contains characters not allowed in a redirect".to_string(),
            ),
            AppError::InvalidRedirectTarget => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "stored URL is not a valid redirect target".to_string(),
            ),
            AppError::Shortener(err) => match err {
                ShortenerError::InvalidUrl(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                ShortenerError::InvalidShortCode(_) => {
                    (StatusCode::BAD_REQUEST, "Invalid short code".to_string())
                }
                ShortenerError::NotFound(_) => {
                    (StatusCode::NOT_FOUND, "Short URL not found".to_string())
                }
                ShortenerError::CodeCollision(_) => (
                    StatusCode::CONFLICT,
                    "Short code already in use by another URL".to_string(),
                ),
                ShortenerError::Storage(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal storage error".to_string(),
                ),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Shortener(ShortenerError::Storage(detail)) = &self {
            error!(error = %detail, "Storage failure while handling request");
        }

        let (status, error) = self.status_and_message();
        (status, Json(ErrorResponse { error })).into_response()
    }
}
