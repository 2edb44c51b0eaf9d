pub mod contest;
pub mod user;

use crate::modules::models::{response::ErrorResponse, templates::DOCS_HTML};
use axum::{http::StatusCode, response::Html, Json};

/// Failure shape shared by every route: a status code and a `{"detail": ...}`
/// body.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn not_found(detail: impl ToString) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            detail: detail.to_string(),
        }),
    )
}

pub fn bad_request(detail: impl ToString) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            detail: detail.to_string(),
        }),
    )
}

pub fn bad_gateway(detail: impl ToString) -> ApiError {
    (
        StatusCode::BAD_GATEWAY,
        Json(ErrorResponse {
            detail: detail.to_string(),
        }),
    )
}

pub async fn docs() -> Html<&'static str> {
    Html(DOCS_HTML)
}
