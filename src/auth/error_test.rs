use super::*;
use serde_json::json;

// =============================================================
// exchange_message precedence
// =============================================================

#[test]
fn forbidden_is_rate_limited_regardless_of_body() {
    assert_eq!(exchange_message(403, &json!({ "error": "custom" })), RATE_LIMITED_MESSAGE);
    assert_eq!(exchange_message(403, &json!({ "username": ["taken"] })), RATE_LIMITED_MESSAGE);
    assert_eq!(exchange_message(403, &Value::Null), RATE_LIMITED_MESSAGE);
}

#[test]
fn bad_request_with_recaptcha_error_is_echoed() {
    let body = json!({ "error": "Please complete the reCAPTCHA check" });
    assert_eq!(exchange_message(400, &body), "Please complete the reCAPTCHA check");
}

#[test]
fn bad_request_with_bot_score_is_echoed() {
    let body = json!({ "error": "Bot suspected! Try again.", "recaptcha_score": 0.1 });
    assert_eq!(exchange_message(400, &body), "Bot suspected! Try again.");
}

#[test]
fn unauthorized_is_invalid_credentials() {
    let body = json!({ "detail": "No active account found with the given credentials" });
    assert_eq!(exchange_message(401, &body), INVALID_CREDENTIALS_MESSAGE);
}

#[test]
fn error_field_is_shown_verbatim() {
    assert_eq!(exchange_message(500, &json!({ "error": "backend down" })), "backend down");
}

#[test]
fn detail_field_maps_to_invalid_credentials() {
    assert_eq!(exchange_message(400, &json!({ "detail": "whatever" })), INVALID_CREDENTIALS_MESSAGE);
}

#[test]
fn non_field_errors_are_joined() {
    let body = json!({ "non_field_errors": ["first.", "second."] });
    assert_eq!(exchange_message(400, &body), "first. second.");
}

#[test]
fn username_errors_are_joined() {
    let body = json!({ "username": ["already taken"] });
    assert_eq!(exchange_message(400, &body), "already taken");
}

#[test]
fn username_wins_over_password_and_email() {
    let body = json!({ "email": ["bad email"], "password": ["too common"], "username": ["taken"] });
    assert_eq!(exchange_message(400, &body), "taken");
}

#[test]
fn password_wins_over_email() {
    let body = json!({ "email": ["bad email"], "password": ["too common", "too short"] });
    assert_eq!(exchange_message(400, &body), "too common too short");
}

#[test]
fn email_errors_are_joined() {
    assert_eq!(exchange_message(400, &json!({ "email": ["Enter a valid email address."] })), "Enter a valid email address.");
}

#[test]
fn unknown_object_fields_are_flattened() {
    let body = json!({ "first_name": ["too long"], "last_name": ["too long", "bad chars"] });
    assert_eq!(exchange_message(400, &body), "too long too long bad chars");
}

#[test]
fn plain_string_body_is_shown() {
    assert_eq!(exchange_message(502, &json!("Bad gateway")), "Bad gateway");
}

#[test]
fn empty_body_falls_back() {
    assert_eq!(exchange_message(500, &Value::Null), FALLBACK_MESSAGE);
    assert_eq!(exchange_message(500, &json!({})), FALLBACK_MESSAGE);
    assert_eq!(exchange_message(500, &json!("")), FALLBACK_MESSAGE);
}

#[test]
fn empty_fields_are_skipped() {
    let body = json!({ "error": "", "username": [], "password": ["weak"] });
    assert_eq!(exchange_message(400, &body), "weak");
}

#[test]
fn plain_error_on_bad_request_is_not_a_bot_check_but_still_shown() {
    let body = json!({ "error": "Missing field" });
    assert_eq!(exchange_message(400, &body), "Missing field");
}

// =============================================================
// AuthError
// =============================================================

#[test]
fn validation_messages_are_distinct() {
    let weak = AuthError::from(ValidationError::WeakPassword).user_message();
    let short = AuthError::from(ValidationError::TooShort).user_message();
    let mismatch = AuthError::from(ValidationError::Mismatch).user_message();
    assert_ne!(weak, short);
    assert_ne!(short, mismatch);
    assert_ne!(weak, mismatch);
}

#[test]
fn attestation_errors_have_their_own_message() {
    let err = AuthError::from(AttestationError::Unavailable);
    assert!(err.is_attestation_failure());
    assert!(err.user_message().contains("reCAPTCHA"));
    let rejected = AuthError::from(AttestationError::Rejected("timeout".to_owned()));
    assert_eq!(rejected.user_message(), "reCAPTCHA error: timeout");
}

#[test]
fn network_error_uses_fallback_message() {
    assert_eq!(AuthError::Network("offline".to_owned()).user_message(), FALLBACK_MESSAGE);
}

#[test]
fn api_status_error_becomes_exchange_error() {
    let err = AuthError::from(ApiError::Status { status: 403, body: Value::Null });
    assert!(matches!(err, AuthError::Exchange { status: 403, .. }));
    assert_eq!(err.user_message(), RATE_LIMITED_MESSAGE);
}

#[test]
fn api_decode_error_becomes_network_error() {
    let err = AuthError::from(ApiError::Decode("missing field `access`".to_owned()));
    assert!(matches!(err, AuthError::Network(_)));
}

#[test]
fn expired_session_becomes_refresh_error() {
    let err = AuthError::from(ApiError::SessionExpired);
    assert!(matches!(err, AuthError::Refresh));
    assert_eq!(err.user_message(), FALLBACK_MESSAGE);
}

#[test]
fn attestation_score_is_read_from_payload() {
    let err = AuthError::Exchange { status: 400, payload: json!({ "error": "Bot", "recaptcha_score": 0.3 }) };
    assert_eq!(err.attestation_score(), Some(0.3));
    assert!(err.is_attestation_failure());
    assert_eq!(AuthError::Verification.attestation_score(), None);
}
