//! Extractors whose rejections use the JSON error body instead of axum's
//! plain-text defaults.

use axum::{
    async_trait,
    extract::{
        multipart::MultipartRejection,
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts, Multipart, Path, Query, Request,
    },
    http::{request::Parts, StatusCode},
    Json,
};
use serde::de::DeserializeOwned;

use crate::errors::JsonApiError;

/// JSON request body.
pub struct ApiJson<T>(pub T);

/// Query string.
pub struct ApiQuery<T>(pub T);

/// Path parameters.
pub struct ApiPath<T>(pub T);

pub struct ApiMultipart(pub Multipart);

/// Client mistakes become 400 unless axum picked something more specific
/// (413 body too large, 415 wrong content type).
fn rejected(status: StatusCode, detail: String) -> JsonApiError {
    match status {
        StatusCode::PAYLOAD_TOO_LARGE => JsonApiError::new(status, "Payload Too Large", Some(detail)),
        StatusCode::UNSUPPORTED_MEDIA_TYPE => JsonApiError::new(status, "Unsupported Media Type", Some(detail)),
        s if s.is_server_error() => JsonApiError::new(s, "Internal Error", Some(detail)),
        _ => JsonApiError::bad_request(detail),
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(e: JsonRejection) -> Self { rejected(e.status(), e.body_text()) }
}

impl From<QueryRejection> for JsonApiError {
    fn from(e: QueryRejection) -> Self { rejected(e.status(), e.body_text()) }
}

impl From<PathRejection> for JsonApiError {
    fn from(e: PathRejection) -> Self { rejected(e.status(), e.body_text()) }
}

impl From<MultipartRejection> for JsonApiError {
    fn from(e: MultipartRejection) -> Self { rejected(e.status(), e.body_text()) }
}

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

#[async_trait]
impl<S> FromRequest<S> for ApiMultipart
where
    S: Send + Sync,
{
    type Rejection = JsonApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(Multipart::from_request(req, state).await?))
    }
}

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = JsonApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}
