//! Request extractors that reject with the API error body.
//!
//! axum's own `Json`, `Path` and `Query` reject with a plain-text body and
//! statuses such as 415 or 422. These wrappers run the same extraction and
//! turn the rejection into `400 VALIDATION_ERROR`.

use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// JSON request body.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}

/// Path parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(ApiPath(value))
    }
}

/// Query string.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(ApiQuery(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use axum::body::Body;
    use axum::http::header::CONTENT_TYPE;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Line {
        sku: String,
        quantity: i64,
    }

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_json_body_accepted() {
        let ApiJson(line) = ApiJson::<Line>::from_request(json_request(r#"{"sku":"LAMP-01","quantity":2}"#), &())
            .await
            .unwrap();
        assert_eq!(line.sku, "LAMP-01");
        assert_eq!(line.quantity, 2);
    }

    #[tokio::test]
    async fn test_json_rejections_become_validation_errors() {
        let missing = ApiJson::<Line>::from_request(json_request(r#"{"quantity":2}"#), &())
            .await
            .unwrap_err();
        assert_eq!(missing.code, ErrorCode::ValidationError);
        assert!(missing.message.contains("sku"));

        let malformed = ApiJson::<Line>::from_request(json_request("{"), &())
            .await
            .unwrap_err();
        assert_eq!(malformed.code, ErrorCode::ValidationError);

        let no_content_type = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(r#"{"sku":"A","quantity":1}"#))
            .unwrap();
        let err = ApiJson::<Line>::from_request(no_content_type, &())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_query_rejection_becomes_validation_error() {
        #[derive(Debug, Deserialize)]
        struct Days {
            #[allow(dead_code)]
            days: i64,
        }

        let request = Request::builder().uri("/?days=seven").body(Body::empty()).unwrap();
        let (mut parts, _) = request.into_parts();
        let err = ApiQuery::<Days>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
