//! Application error type and its HTTP mapping.
//!
//! Every fallible operation in the service returns `Result<T, AppError>`.
//! An [`AppError`] pairs an [`ErrorKind`] with a human readable message; the
//! kind alone decides the HTTP status. Errors that were not classified by the
//! caller (database, I/O, serialization) fall into [`ErrorKind::InternalError`]
//! through the blanket `From` impl, so `?` works on any `std::error::Error`.

use anyhow::{Error, anyhow};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Classification of every failure the API can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingField,
    InvalidField,
    InvalidEnum,
    MalformedRequest,
    DuplicateEmail,
    DuplicateTitle,
    DuplicateCode,
    AlreadyEnrolled,
    NotFound,
    InternalError,
}

impl ErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            Self::MissingField
            | Self::InvalidField
            | Self::InvalidEnum
            | Self::MalformedRequest => StatusCode::BAD_REQUEST,
            Self::DuplicateEmail
            | Self::DuplicateTitle
            | Self::DuplicateCode
            | Self::AlreadyEnrolled => StatusCode::CONFLICT,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable label used for metrics and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidField => "invalid_field",
            Self::InvalidEnum => "invalid_enum",
            Self::MalformedRequest => "malformed_request",
            Self::DuplicateEmail => "duplicate_email",
            Self::DuplicateTitle => "duplicate_title",
            Self::DuplicateCode => "duplicate_code",
            Self::AlreadyEnrolled => "already_enrolled",
            Self::NotFound => "not_found",
            Self::InternalError => "internal_error",
        }
    }
}

/// Body of every error response.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Student not found")]
    pub error: String,
}

#[derive(Debug)]
pub struct AppError {
    pub kind: ErrorKind,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(kind: ErrorKind, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            kind,
            error: err.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::InternalError, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::NotFound, err)
    }

    pub fn missing_field(field: &str) -> Self {
        Self::new(ErrorKind::MissingField, anyhow!("{} is required", field))
    }

    pub fn invalid_field<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::InvalidField, err)
    }

    pub fn invalid_enum<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::InvalidEnum, err)
    }

    pub fn malformed<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::MalformedRequest, err)
    }

    pub fn conflict<E>(kind: ErrorKind, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(kind, err)
    }

    /// Flattens `validator` output into a single `InvalidField` error.
    pub fn from_validation(errors: &ValidationErrors) -> Self {
        Self::invalid_field(anyhow!("{}", format_validation_errors(errors)))
    }
}

pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect();
    messages.sort();
    messages.join(", ")
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = if self.kind == ErrorKind::InternalError {
            tracing::error!(error = ?self.error, "internal error");
            "Internal server error".to_string()
        } else {
            self.error.to_string()
        };

        let mut response = (self.status(), Json(json!({ "error": message }))).into_response();
        response.extensions_mut().insert(self.kind);
        response
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(range(min = 1, message = "age must be a positive integer"))]
        age: i32,
        #[validate(length(max = 3))]
        code: String,
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(ErrorKind::MissingField.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorKind::InvalidEnum.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorKind::DuplicateEmail.status(), StatusCode::CONFLICT);
        assert_eq!(ErrorKind::DuplicateTitle.status(), StatusCode::CONFLICT);
        assert_eq!(ErrorKind::DuplicateCode.status(), StatusCode::CONFLICT);
        assert_eq!(ErrorKind::AlreadyEnrolled.status(), StatusCode::CONFLICT);
        assert_eq!(ErrorKind::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorKind::InternalError.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_missing_field_message() {
        let err = AppError::missing_field("full_name");
        assert_eq!(err.kind, ErrorKind::MissingField);
        assert_eq!(err.error.to_string(), "full_name is required");
    }

    #[test]
    fn test_unclassified_errors_become_internal() {
        let err: AppError = std::io::Error::other("disk on fire").into();
        assert_eq!(err.kind, ErrorKind::InternalError);
    }

    #[test]
    fn test_validation_errors_are_flattened() {
        let sample = Sample {
            age: 0,
            code: "ABCD".to_string(),
        };
        let errors = sample.validate().unwrap_err();
        let err = AppError::from_validation(&errors);
        assert_eq!(err.kind, ErrorKind::InvalidField);
        assert_eq!(
            err.error.to_string(),
            "age must be a positive integer, code is invalid"
        );
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let response = AppError::internal(anyhow!("connection refused")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.extensions().get::<ErrorKind>(),
            Some(&ErrorKind::InternalError)
        );

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "Internal server error");
    }

    #[tokio::test]
    async fn test_client_error_keeps_message() {
        let response = AppError::not_found(anyhow!("Course 'Bio101' not found")).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "Course 'Bio101' not found");
    }
}
