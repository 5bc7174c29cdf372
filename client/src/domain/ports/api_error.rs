//! Error surfaced by every driven port that talks to the wallet API.

use super::define_port_error;
use crate::domain::Error;
use crate::domain::session::SessionExpiry;

define_port_error! {
    /// Failures reported by API adapters.
    pub enum ApiError {
        /// The token was missing, invalid, or expired.
        SessionExpired { message: String } =>
            "session expired: {message}",
        /// The server answered but refused the request.
        Rejected { message: String } =>
            "request rejected: {message}",
        /// Network transport failed before a response arrived.
        Transport { message: String } =>
            "network unavailable: {message}",
        /// The request exceeded the client timeout.
        Timeout { message: String } =>
            "request timed out: {message}",
        /// The response could not be decoded.
        Decode { message: String } =>
            "unreadable server response: {message}",
    }
}

impl SessionExpiry for ApiError {
    fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired { .. })
    }
}

impl From<ApiError> for Error {
    fn from(value: ApiError) -> Self {
        let message = value.to_string();
        match value {
            ApiError::SessionExpired { .. } => Self::session_expired(message),
            ApiError::Rejected { .. } => Self::rejected(message),
            ApiError::Transport { .. } | ApiError::Timeout { .. } | ApiError::Decode { .. } => {
                Self::service_unavailable(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for API error classification.

    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(ApiError::session_expired("token_invalid"), ErrorCode::SessionExpired)]
    #[case(ApiError::rejected("card already redeemed"), ErrorCode::Rejected)]
    #[case(ApiError::transport("connection reset"), ErrorCode::ServiceUnavailable)]
    #[case(ApiError::timeout("30s elapsed"), ErrorCode::ServiceUnavailable)]
    #[case(ApiError::decode("expected array"), ErrorCode::ServiceUnavailable)]
    fn maps_to_domain_codes(#[case] error: ApiError, #[case] expected: ErrorCode) {
        assert_eq!(Error::from(error).code(), expected);
    }

    #[test]
    fn only_session_variant_counts_as_expiry() {
        assert!(ApiError::session_expired("expired").is_session_expired());
        assert!(!ApiError::rejected("expired").is_session_expired());
    }
}
