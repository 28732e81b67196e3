use std::ops::Deref;

use axum::extract::{FromRequest, FromRequestParts, Path};
use http::request::Parts;

use crate::error::ApiError;

/// Numeric record id taken from the `{id}` path segment.
///
/// Rejected with [`ApiError::InvalidId`] before any query is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordId(pub i64);

impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::InvalidId(e.body_text()))?;
        raw.parse::<i64>()
            .map(RecordId)
            .map_err(|_| ApiError::InvalidId(raw))
    }
}

/// JSON body whose rejections are rendered as [`ApiError`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

impl<T> Deref for JsonBody<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
