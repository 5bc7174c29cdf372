//! Tests for domain error construction and serialisation.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn invalid_amount() -> Error {
    Error::invalid_request("amount must be a number").with_details(json!({ "field": "amount" }))
}

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::session_expired("expired"), ErrorCode::SessionExpired)]
#[case(Error::rejected("declined"), ErrorCode::Rejected)]
#[case(Error::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn only_session_expired_reports_expiry() {
    assert!(Error::session_expired("token rejected").is_session_expired());
    assert!(!Error::service_unavailable("timeout").is_session_expired());
}

#[rstest]
fn serialises_with_snake_case_code(invalid_amount: Error) {
    let value = serde_json::to_value(&invalid_amount).expect("serialise error");
    assert_eq!(
        value,
        json!({
            "code": "invalid_request",
            "message": "amount must be a number",
            "details": { "field": "amount" }
        })
    );
}

#[rstest]
fn round_trip_preserves_details(invalid_amount: Error) {
    let encoded = serde_json::to_string(&invalid_amount).expect("serialise error");
    let decoded: Error = serde_json::from_str(&encoded).expect("deserialise error");
    assert_eq!(decoded, invalid_amount);
}

#[rstest]
fn deserialisation_rejects_blank_message() {
    let result: Result<Error, _> =
        serde_json::from_value(json!({ "code": "internal_error", "message": " " }));
    assert!(result.is_err(), "blank messages must fail validation");
}

#[rstest]
#[case(ErrorCode::SessionExpired, "please sign in again")]
#[case(ErrorCode::ServiceUnavailable, "the service is unavailable, try again")]
fn blank_messages_fall_back_to_code_message(#[case] code: ErrorCode, #[case] expected: &str) {
    assert_eq!(Error::new(code, "").message(), expected);
}

#[rstest]
fn field_errors_render_next_to_the_field(invalid_amount: Error) {
    assert_eq!(invalid_amount.field(), Some("amount"));
    assert_eq!(invalid_amount.presentation(), Presentation::Field("amount"));
}

#[rstest]
#[case(Error::session_expired("token revoked"), Presentation::Silent)]
#[case(Error::invalid_request("select a card first"), Presentation::Banner)]
#[case(Error::rejected("balance too low"), Presentation::Banner)]
fn presentation_follows_code(#[case] error: Error, #[case] expected: Presentation<'static>) {
    assert_eq!(error.presentation(), expected);
}
