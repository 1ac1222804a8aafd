//! Integer path parameter extractor with envelope rejections.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

/// Extractor for `SERIAL` identifiers in the path.
///
/// Non-numeric or non-positive values are rejected with a 400 naming the `id` field.
///
/// # Example
/// ```ignore
/// use axum::Router;
/// use axum::routing::get;
/// use axum_helpers::extractors::IdPath;
///
/// async fn get_unidade(IdPath(id): IdPath) -> String {
///     format!("Unidade {}", id)
/// }
///
/// let app = Router::new().route("/unidades/{id}", get(get_unidade));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub i32);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state).await?;

        match raw.parse::<i32>() {
            Ok(id) if id > 0 => Ok(IdPath(id)),
            _ => Err(AppError::invalid_field("id", format!("ID inválido: {}", raw))),
        }
    }
}
