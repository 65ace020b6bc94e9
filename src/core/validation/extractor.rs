//! Axum extractor for typed JSON bodies
//!
//! Unlike `axum::Json`, every rejection (wrong content type, malformed JSON,
//! wrong shape) is reported as a [`RepairError`] validation error, so clients
//! always get the crate's `{code, message}` body with a 400.

use crate::core::error::{RepairError, ValidationError};
use axum::{
    Json,
    extract::{FromRequest, Request},
    http::StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Largest accepted request body
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Request body decoded into `T`
///
/// ```rust,ignore
/// pub async fn create_order(
///     State(state): State<AppState>,
///     ValidJson(payload): ValidJson<NewOrder>,
/// ) -> RepairResult<impl IntoResponse> { ... }
/// ```
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

impl<T> ValidJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = RepairError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload): Json<Value> = Json::from_request(req, state).await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                RepairError::Validation(ValidationError::BodyTooLarge {
                    limit: MAX_BODY_BYTES,
                })
            } else {
                RepairError::Validation(ValidationError::InvalidBody {
                    message: e.body_text(),
                })
            }
        })?;

        let value = serde_json::from_value(payload)?;
        Ok(ValidJson(value))
    }
}
