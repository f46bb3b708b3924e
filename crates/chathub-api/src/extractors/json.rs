//! JSON body extractor that runs `validator` rules.

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

use chathub_core::error::AppError;

use crate::error::ApiError;

/// Deserialized and validated JSON body.
///
/// Malformed JSON and failed field rules both reject with `BAD_REQUEST`;
/// field failures are listed under `details`.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;

        if let Err(errors) = value.validate() {
            let mut err = AppError::bad_request("Request validation failed");
            if let Ok(details) = serde_json::to_value(&errors) {
                err = err.with_details(details);
            }
            return Err(err.into());
        }

        Ok(ValidJson(value))
    }
}
