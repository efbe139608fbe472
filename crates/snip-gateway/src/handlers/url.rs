use crate::error::{AppError, Result};
use crate::model::{ShortenRequest, ShortenResponse};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use snip_core::mask::mask_url;
use tracing::{debug, error};

/// POST /api/shorten
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortenResponse>> {
    let Json(request) = payload.map_err(|rejection| {
        debug!(error = %rejection, "Rejected shorten request body");
        AppError::InvalidBody
    })?;

    // Anything stored here must later fit in a Location header.
    if HeaderValue::from_str(&request.url).is_err() {
        debug!(url = %mask_url(&request.url), "Rejected URL that cannot be redirected to");
        return Err(AppError::UnredirectableUrl);
    }

    let code = state.shortener().shorten(&request.url).await?;

    Ok(Json(ShortenResponse {
        message: "URL shortened successfully",
        short_url: code.to_url(state.base_url()),
        short_code: code.into_inner(),
    }))
}

/// GET /{code}
pub async fn redirect_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    let url = state.shortener().resolve(&short_code).await?;
    let location = HeaderValue::try_from(url.as_str()).map_err(|e| {
        error!(code = %short_code, error = %e, "Stored URL is not a valid Location header");
        AppError::InvalidRedirectTarget
    })?;

    Ok((StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response())
}
