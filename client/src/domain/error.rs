//! Domain-level error types.
//!
//! These errors are transport agnostic. Stores return them to the screen layer,
//! which picks a [`Presentation`]: a hint next to a form field, a banner, or
//! nothing at all when navigation already handles the failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error as ThisError;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Local input failed validation; nothing was sent to the server.
    InvalidRequest,
    /// The session token is missing, invalid, or expired.
    SessionExpired,
    /// The server understood the request and refused it.
    Rejected,
    /// The API could not be reached or answered with a failure.
    ServiceUnavailable,
    /// An unexpected error occurred inside the client.
    InternalError,
}

impl ErrorCode {
    fn fallback_message(self) -> &'static str {
        match self {
            Self::InvalidRequest => "check the highlighted fields",
            Self::SessionExpired => "please sign in again",
            Self::Rejected => "the request was declined",
            Self::ServiceUnavailable => "the service is unavailable, try again",
            Self::InternalError => "something went wrong",
        }
    }
}

/// Where the screen layer should surface an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation<'a> {
    /// Next to the named form field.
    Field(&'a str),
    /// As a banner or toast.
    Banner,
    /// Not at all; the sign-in redirect covers it.
    Silent,
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` is never blank. Infallible constructors substitute a generic
///   message for the code; [`Error::try_new`] and deserialisation reject it.
///
/// # Examples
/// ```
/// use client::domain::{Error, ErrorCode};
///
/// let err = Error::new(ErrorCode::InvalidRequest, "amount is required");
/// assert_eq!(err.code(), ErrorCode::InvalidRequest);
///
/// let fallback = Error::rejected("  ");
/// assert_eq!(fallback.message(), "the request was declined");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ThisError)]
#[error("{message}")]
#[serde(try_from = "ErrorDto", into = "ErrorDto")]
pub struct Error {
    code: ErrorCode,
    message: String,
    details: Option<Value>,
}

/// Validation errors emitted by [`Error::try_new`].
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ErrorValidationError {
    /// The message was blank.
    #[error("error message must not be empty")]
    EmptyMessage,
}

impl Error {
    /// Create an error, substituting the code's generic message for a blank one.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::try_new(code, message).unwrap_or_else(|_| Self {
            code,
            message: code.fallback_message().to_owned(),
            details: None,
        })
    }

    /// Fallible constructor that validates the message content.
    pub fn try_new(
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            message,
            details: None,
        })
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message for the screen layer.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Supplementary error details, such as the offending field.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use client::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::invalid_request("bad amount").with_details(json!({ "field": "amount" }));
    /// assert!(err.details().is_some());
    /// ```
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Form field named in `details.field`, if any.
    pub fn field(&self) -> Option<&str> {
        self.details.as_ref()?.get("field")?.as_str()
    }

    /// How the failure should be shown.
    pub fn presentation(&self) -> Presentation<'_> {
        match (self.code, self.field()) {
            (ErrorCode::SessionExpired, _) => Presentation::Silent,
            (ErrorCode::InvalidRequest, Some(field)) => Presentation::Field(field),
            _ => Presentation::Banner,
        }
    }

    /// Whether the failure means the session must be re-established.
    pub fn is_session_expired(&self) -> bool {
        self.code == ErrorCode::SessionExpired
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::SessionExpired`].
    pub fn session_expired(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SessionExpired, message)
    }

    /// Convenience constructor for [`ErrorCode::Rejected`].
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Rejected, message)
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

/// Wire shape used when errors are persisted or handed across a bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ErrorDto {
    code: ErrorCode,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl From<Error> for ErrorDto {
    fn from(value: Error) -> Self {
        Self {
            code: value.code,
            message: value.message,
            details: value.details,
        }
    }
}

impl TryFrom<ErrorDto> for Error {
    type Error = ErrorValidationError;

    fn try_from(value: ErrorDto) -> Result<Self, Self::Error> {
        let error = Self::try_new(value.code, value.message)?;
        Ok(match value.details {
            Some(details) => error.with_details(details),
            None => error,
        })
    }
}

#[cfg(test)]
mod tests;
