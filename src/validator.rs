//! Request extractors that reject bad input with JSON error bodies.
//!
//! axum's stock `Json` and `Path` extractors answer with plain-text
//! rejections. These wrappers turn those rejections into [`AppError`]s so
//! every 4xx the API emits has the same `{"error": ...}` shape.

use anyhow::anyhow;
use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Request, rejection::JsonRejection},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;
use validator::Validate;

use registrar_core::AppError;

/// JSON body that has been deserialized and checked with `validator`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;

        value
            .validate()
            .map_err(|errors| AppError::from_validation(&errors))?;

        Ok(ValidatedJson(value))
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            AppError::malformed(anyhow!("Missing 'Content-Type: application/json' header"))
        }
        JsonRejection::JsonDataError(_) => {
            AppError::malformed(anyhow!("Invalid field type in request"))
        }
        JsonRejection::JsonSyntaxError(_) => AppError::malformed(anyhow!("Request must be JSON")),
        _ => AppError::malformed(anyhow!("Invalid request body")),
    }
}

/// A single `{id}` path segment parsed as a UUID.
#[derive(Debug, Clone, Copy)]
pub struct PathId(pub Uuid);

impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<Uuid>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::malformed(anyhow!("Invalid id: expected a UUID")))?;

        Ok(PathId(id))
    }
}
