//! Validated JSON extractor
//!
//! Extracts and validates JSON request bodies using the validator crate.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::response::ApiError;

/// JSON body that has passed its `Validate` rules
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| match e {
                JsonRejection::JsonDataError(e) => ApiError::invalid_body(e.body_text()),
                JsonRejection::JsonSyntaxError(e) => ApiError::invalid_body(e.body_text()),
                JsonRejection::MissingJsonContentType(e) => ApiError::invalid_body(e.body_text()),
                _ => ApiError::invalid_body("Invalid JSON body"),
            })?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}
