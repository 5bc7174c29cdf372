//! Response envelope returned by the wallet API.
//!
//! Every endpoint answers with `{ "success": bool, "data": ..., "message":
//! ..., "code": ... }`. The envelope is decoded first and then converted into
//! a `Result`, so a missing or `false` `success` flag never reaches callers as
//! data.

use serde::Deserialize;
use thiserror::Error;

/// Failure extracted from an [`Envelope`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    /// The server answered with `success` unset or `false`.
    #[error("request rejected: {message}")]
    Rejected {
        /// Machine-readable failure code, when the server supplied one.
        code: Option<String>,
        /// Human-readable failure message.
        message: String,
    },
    /// The server reported success without a `data` payload.
    #[error("successful response carried no data")]
    MissingData,
}

impl EnvelopeError {
    /// Machine-readable failure code, if any.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Rejected { code, .. } => code.as_deref(),
            Self::MissingData => None,
        }
    }
}

/// Decoded `{ success, data, message, code }` response.
///
/// # Examples
/// ```
/// use pagination::Envelope;
///
/// let envelope: Envelope<Vec<u32>> =
///     serde_json::from_str(r#"{ "success": true, "data": [1, 2] }"#).expect("valid JSON");
/// assert_eq!(envelope.into_page(), Ok(vec![1, 2]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    /// Whether the server accepted the request.
    #[serde(default)]
    pub success: bool,
    /// Payload present on success.
    #[serde(default)]
    pub data: Option<T>,
    /// Optional human-readable message.
    #[serde(default)]
    pub message: Option<String>,
    /// Optional machine-readable code.
    #[serde(default)]
    pub code: Option<String>,
}

impl<T> Envelope<T> {
    /// Convert into the payload or the server's rejection.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Rejected`] when `success` is not `true`, and
    /// [`EnvelopeError::MissingData`] when a successful envelope has no data.
    pub fn into_result(self) -> Result<T, EnvelopeError> {
        if !self.success {
            return Err(self.rejection());
        }
        self.data.ok_or(EnvelopeError::MissingData)
    }

    fn rejection(self) -> EnvelopeError {
        let message = self
            .message
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| "request was not successful".to_owned());
        EnvelopeError::Rejected {
            code: self.code,
            message,
        }
    }
}

impl<T> Envelope<Vec<T>> {
    /// Convert a list envelope into its page of items.
    ///
    /// A successful list response without `data` is an empty page.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Rejected`] when `success` is not `true`.
    pub fn into_page(self) -> Result<Vec<T>, EnvelopeError> {
        if !self.success {
            return Err(self.rejection());
        }
        Ok(self.data.unwrap_or_default())
    }
}
