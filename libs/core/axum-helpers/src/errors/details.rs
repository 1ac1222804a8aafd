//! Opt-in exposure of internal error detail.
//!
//! [`AppError`](super::AppError) never writes the underlying error text into
//! the body. It leaves it in the response extensions, and
//! [`attach_error_details`] copies it into `errors.detail` only when the
//! router was built with [`ErrorDetails::Exposed`].

use super::ErrorResponse;
use axum::{
    Json,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Whether 5xx envelopes carry the underlying error text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorDetails {
    #[default]
    Hidden,
    Exposed,
}

impl ErrorDetails {
    /// `Exposed` when the `DEBUG` setting is on.
    pub fn from_debug(debug: bool) -> Self {
        if debug { Self::Exposed } else { Self::Hidden }
    }
}

/// Envelope and detail of an internal error, as rendered by `AppError`.
#[derive(Debug, Clone)]
pub(crate) struct InternalDetail {
    pub(crate) envelope: ErrorResponse,
    pub(crate) detail: String,
}

/// Middleware re-rendering internal errors with their detail when exposed.
///
/// # Example
/// ```ignore
/// use axum::middleware;
/// use axum_helpers::errors::{ErrorDetails, attach_error_details};
///
/// let app = Router::new().layer(middleware::from_fn_with_state(
///     ErrorDetails::from_debug(config.debug),
///     attach_error_details,
/// ));
/// ```
pub async fn attach_error_details(
    State(details): State<ErrorDetails>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let Some(internal) = response.extensions_mut().remove::<InternalDetail>() else {
        return response;
    };
    if details == ErrorDetails::Hidden {
        return response;
    }

    let envelope = internal.envelope.with_detail(internal.detail);
    (response.status(), Json(envelope)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{AppError, DETAIL_FIELD};
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        middleware,
        routing::get,
    };
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    fn app(details: ErrorDetails) -> Router {
        Router::new()
            .route(
                "/boom",
                get(|| async { AppError::internal("connection reset") }),
            )
            .route(
                "/missing",
                get(|| async { AppError::NotFound("Evento não encontrado".into()) }),
            )
            .layer(middleware::from_fn_with_state(details, attach_error_details))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_detail_hidden_by_default() {
        let (status, body) = get_json(app(ErrorDetails::default()), "/boom").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Erro interno do servidor");
        assert!(body.get("errors").is_none());
    }

    #[tokio::test]
    async fn test_detail_exposed_in_debug() {
        let (status, body) = get_json(app(ErrorDetails::from_debug(true)), "/boom").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert_eq!(body["errors"][DETAIL_FIELD][0], "connection reset");
    }

    #[tokio::test]
    async fn test_client_errors_pass_through() {
        let (status, body) = get_json(app(ErrorDetails::Exposed), "/missing").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Evento não encontrado");
        assert!(body.get("errors").is_none());
    }

    #[test]
    fn test_from_debug() {
        assert_eq!(ErrorDetails::from_debug(false), ErrorDetails::Hidden);
        assert_eq!(ErrorDetails::from_debug(true), ErrorDetails::Exposed);
    }
}
