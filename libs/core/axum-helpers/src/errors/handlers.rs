use axum::{
    Json,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};

use super::{ErrorResponse, FieldErrors};

/// Fallback handler for unmatched routes.
pub async fn not_found(uri: Uri) -> Response {
    tracing::debug!(path = %uri.path(), "No route matched");
    let body = Json(ErrorResponse::new("Rota não encontrada", FieldErrors::new()));

    (StatusCode::NOT_FOUND, body).into_response()
}
