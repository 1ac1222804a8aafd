use crate::errors::AppError;
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use validator::Validate;

/// Query-string extractor that validates the decoded value.
///
/// Undecodable parameters are reported under `errors.query`.
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<T>::from_request_parts(parts, state).await?;
        params.validate()?;
        Ok(ValidatedQuery(params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::get,
    };
    use http_body_util::BodyExt;
    use serde::Deserialize;
    use serde_json::Value;
    use tower::ServiceExt;

    #[derive(Deserialize, Validate)]
    struct Page {
        #[serde(default)]
        #[validate(range(min = 1, max = 50))]
        limit: Option<u64>,
    }

    fn app() -> Router {
        Router::new().route(
            "/",
            get(|ValidatedQuery(page): ValidatedQuery<Page>| async move {
                page.limit.map(|l| l.to_string()).unwrap_or_default()
            }),
        )
    }

    async fn get_uri(uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_query_is_decoded() {
        let (status, body) = get_uri("/?limit=10").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"10");
    }

    #[tokio::test]
    async fn test_out_of_range_query_is_rejected() {
        let (status, body) = get_uri("/?limit=500").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let json: Value = serde_json::from_slice(&body).unwrap();
        assert!(json["errors"]["limit"].is_array());
    }

    #[tokio::test]
    async fn test_undecodable_query_is_enveloped() {
        let (status, body) = get_uri("/?limit=abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert!(json["errors"]["query"].is_array());
    }
}
