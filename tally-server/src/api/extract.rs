//! Request extractors

use axum::{
    async_trait,
    body::{to_bytes, Body},
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::ApiError;

/// Matches axum's default JSON body limit
const BODY_LIMIT: usize = 2 * 1024 * 1024;

/// JSON body whose absence means `T::default()`
///
/// A request with no body (or only whitespace) yields the default; any other
/// body must be valid JSON with a JSON content type.
#[derive(Debug)]
pub struct OptionalJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for OptionalJson<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (parts, body) = req.into_parts();
        let bytes = to_bytes(body, BODY_LIMIT)
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read body: {}", e)))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(T::default()));
        }

        let req = Request::from_parts(parts, Body::from(bytes));
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}
