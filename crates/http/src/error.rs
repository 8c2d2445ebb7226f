//! Error handling for the libris HTTP client

use std::collections::BTreeMap;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Messages keyed by the field they concern, as reported by the backend.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Application error types mapped from HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("validation error: {message}")]
    Validation { errors: FieldErrors, message: String },

    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("forbidden: {message}")]
    Forbidden { message: String },

    #[error("not found: {message}")]
    NotFound { message: String },

    #[error("request failed with status {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("network error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("invalid request url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// Map a non-success status and its (possibly empty) body to an error.
    pub fn from_status(status: StatusCode, body: &[u8]) -> Self {
        let payload = ErrorPayload::parse(body);
        let message = payload
            .message
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());

        match status {
            StatusCode::UNPROCESSABLE_ENTITY => Self::Validation {
                errors: payload.errors,
                message,
            },
            StatusCode::UNAUTHORIZED => Self::Unauthorized { message },
            StatusCode::FORBIDDEN => Self::Forbidden { message },
            StatusCode::NOT_FOUND => Self::NotFound { message },
            status => Self::Status { status, message },
        }
    }

    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Validation { .. } => Some(StatusCode::UNPROCESSABLE_ENTITY),
            ApiError::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED),
            ApiError::Forbidden { .. } => Some(StatusCode::FORBIDDEN),
            ApiError::NotFound { .. } => Some(StatusCode::NOT_FOUND),
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Decode(err) => err.status(),
            ApiError::Transport(_) | ApiError::InvalidUrl(_) => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::Validation { .. })
    }

    /// No response reached us.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }

    /// Field errors of a 422, `None` for every other error.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ApiError::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct ErrorPayload {
    message: Option<String>,
    errors: FieldErrors,
}

impl ErrorPayload {
    /// Lenient parse of `{ "message": ..., "errors": { field: [..] | ".." } }`.
    fn parse(body: &[u8]) -> Self {
        #[derive(Deserialize)]
        struct Raw {
            #[serde(default)]
            message: Option<String>,
            #[serde(default)]
            errors: Option<Value>,
        }

        let Ok(raw) = serde_json::from_slice::<Raw>(body) else {
            return Self::default();
        };

        let mut errors = FieldErrors::new();
        if let Some(Value::Object(map)) = raw.errors {
            for (field, value) in map {
                let messages = match value {
                    Value::String(message) => vec![message],
                    Value::Array(items) => items
                        .into_iter()
                        .map(|item| match item {
                            Value::String(message) => message,
                            other => other.to_string(),
                        })
                        .collect(),
                    other => vec![other.to_string()],
                };
                errors.insert(field, messages);
            }
        }

        Self {
            message: raw.message.filter(|m| !m.is_empty()),
            errors,
        }
    }
}
