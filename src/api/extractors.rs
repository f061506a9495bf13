//! Request extractors that reject with the API error format

use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Json, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;
use validator::Validate;

use crate::error::Error;

/// JSON body that is deserialized and then validated.
///
/// Malformed bodies are rejected with 422, failed validation with 400.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e: JsonRejection| Error::UnprocessableEntity(e.body_text()))?;

        data.validate()?;
        Ok(ValidatedJson(data))
    }
}

/// UUID path parameter
pub struct UuidPath(pub Uuid);

impl<S> FromRequestParts<S> for UuidPath
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| Error::BadRequest("the id is not valid.".to_string()))?;

        Uuid::parse_str(&id)
            .map(UuidPath)
            .map_err(|_| Error::BadRequest("the id is not valid.".to_string()))
    }
}
