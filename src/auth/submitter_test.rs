use super::*;
use crate::auth::error::{AttestationError, RATE_LIMITED_MESSAGE, ValidationError};
use crate::net::api::{REGISTER_PATH, TOKEN_PATH};
use crate::state::session::{ACCESS_KEY, MemorySessionStore, REFRESH_KEY, USERNAME_KEY};
use crate::testing::{FakeAttestation, FakeHttp, FixedEstimator, respond};
use futures::executor::block_on;
use serde_json::json;

type Submitter = CredentialSubmitter<FakeHttp, FakeAttestation, MemorySessionStore, FixedEstimator>;

fn accepting_backend() -> FakeHttp {
    FakeHttp::new(|_| respond(200, json!({ "access": "acc-1", "refresh": "ref-1", "recaptcha_score": 0.9 })))
}

fn submitter(http: &FakeHttp, attestation: &FakeAttestation, store: &MemorySessionStore, score: u8) -> Submitter {
    CredentialSubmitter::new(http.clone(), attestation.clone(), store.clone(), FixedEstimator(score))
}

fn login(username: &str, password: &str) -> Credentials {
    Credentials::Login { username: username.to_owned(), password: password.to_owned() }
}

fn register(password: &str, confirmation: &str) -> Credentials {
    Credentials::Register {
        username: "alice".to_owned(),
        email: "alice@example.com".to_owned(),
        password: password.to_owned(),
        password_confirmation: confirmation.to_owned(),
    }
}

// =============================================================
// Local validation
// =============================================================

#[test]
fn weak_registration_fails_without_network() {
    let http = accepting_backend();
    let attestation = FakeAttestation::token("tok");
    let store = MemorySessionStore::new();

    let err = block_on(submitter(&http, &attestation, &store, 1).submit(&register("longenough", "different")))
        .unwrap_err();

    assert!(matches!(err, AuthError::Validation(ValidationError::WeakPassword)));
    assert!(http.requests().is_empty());
    assert!(attestation.actions().is_empty());
    assert!(store.keys().is_empty());
}

#[test]
fn short_registration_fails_before_mismatch() {
    let http = accepting_backend();
    let attestation = FakeAttestation::token("tok");
    let store = MemorySessionStore::new();

    let err = block_on(submitter(&http, &attestation, &store, 4).submit(&register("short", "other"))).unwrap_err();

    assert!(matches!(err, AuthError::Validation(ValidationError::TooShort)));
    assert!(http.requests().is_empty());
}

#[test]
fn mismatched_confirmation_fails_without_network() {
    let http = accepting_backend();
    let attestation = FakeAttestation::token("tok");
    let store = MemorySessionStore::new();

    let err = block_on(submitter(&http, &attestation, &store, 3).submit(&register("correct horse", "correct hose")))
        .unwrap_err();

    assert!(matches!(err, AuthError::Validation(ValidationError::Mismatch)));
    assert_eq!(err.user_message(), "Passwords do not match.");
    assert!(http.requests().is_empty());
}

#[test]
fn login_skips_password_rules() {
    let http = accepting_backend();
    let attestation = FakeAttestation::token("tok");
    let store = MemorySessionStore::new();

    let session = block_on(submitter(&http, &attestation, &store, 0).submit(&login("alice", "x"))).unwrap();

    assert_eq!(session.access_token, "acc-1");
    assert_eq!(http.count(TOKEN_PATH), 1);
}

// =============================================================
// Attestation
// =============================================================

#[test]
fn attestation_failure_aborts_before_backend() {
    let http = accepting_backend();
    let attestation = FakeAttestation::failing(AttestationError::Unavailable);
    let store = MemorySessionStore::new();

    let err = block_on(submitter(&http, &attestation, &store, 4).submit(&login("alice", "pw"))).unwrap_err();

    assert!(matches!(err, AuthError::Attestation(AttestationError::Unavailable)));
    assert!(err.is_attestation_failure());
    assert!(http.requests().is_empty());
    assert!(store.read().is_none());
}

#[test]
fn tokens_are_scoped_to_the_submitted_action() {
    let http = accepting_backend();
    let attestation = FakeAttestation::token("tok");
    let store = MemorySessionStore::new();
    let submitter = submitter(&http, &attestation, &store, 4);

    block_on(submitter.submit(&login("alice", "pw"))).unwrap();
    block_on(submitter.submit(&register("correct horse battery", "correct horse battery"))).unwrap();

    assert_eq!(attestation.actions(), vec![AttestationAction::Login, AttestationAction::Register]);
}

// =============================================================
// Backend exchange
// =============================================================

#[test]
fn login_posts_credentials_with_token_and_stores_session() {
    let http = accepting_backend();
    let attestation = FakeAttestation::token("tok-login");
    let store = MemorySessionStore::new();

    let session = block_on(submitter(&http, &attestation, &store, 0).submit(&login("alice", "pw"))).unwrap();

    let sent = &http.requests()[0];
    assert_eq!(sent.path, TOKEN_PATH);
    assert_eq!(sent.body, Some(json!({ "username": "alice", "password": "pw", "recaptcha_token": "tok-login" })));
    assert_eq!(session, Session {
        access_token: "acc-1".to_owned(),
        refresh_token: "ref-1".to_owned(),
        display_name: "alice".to_owned(),
    });
    assert_eq!(store.keys(), vec![ACCESS_KEY.to_owned(), REFRESH_KEY.to_owned(), USERNAME_KEY.to_owned()]);
    assert_eq!(store.read(), Some(session));
}

#[test]
fn registration_posts_both_passwords() {
    let http = accepting_backend();
    let attestation = FakeAttestation::token("tok-reg");
    let store = MemorySessionStore::new();

    block_on(submitter(&http, &attestation, &store, 3).submit(&register("correct horse", "correct horse"))).unwrap();

    let sent = &http.requests()[0];
    assert_eq!(sent.path, REGISTER_PATH);
    assert_eq!(
        sent.body,
        Some(json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "correct horse",
            "password2": "correct horse",
            "recaptcha_token": "tok-reg",
        }))
    );
    assert_eq!(store.read().unwrap().display_name, "alice");
}

#[test]
fn field_errors_become_the_form_message() {
    let http = FakeHttp::new(|_| respond(400, json!({ "username": ["already taken"] })));
    let attestation = FakeAttestation::token("tok");
    let store = MemorySessionStore::new();

    let err = block_on(submitter(&http, &attestation, &store, 4).submit(&register("correct horse", "correct horse")))
        .unwrap_err();

    assert_eq!(err.user_message(), "already taken");
    assert!(store.keys().is_empty());
}

#[test]
fn lockout_shows_rate_limit_message() {
    let http = FakeHttp::new(|_| respond(403, json!({ "error": "Account locked" })));
    let attestation = FakeAttestation::token("tok");
    let store = MemorySessionStore::new();

    let err = block_on(submitter(&http, &attestation, &store, 0).submit(&login("alice", "pw"))).unwrap_err();

    assert_eq!(err.user_message(), RATE_LIMITED_MESSAGE);
}

#[test]
fn bot_rejection_exposes_score() {
    let http = FakeHttp::new(|_| respond(400, json!({ "error": "reCAPTCHA failed", "recaptcha_score": 0.1 })));
    let attestation = FakeAttestation::token("tok");
    let store = MemorySessionStore::new();

    let err = block_on(submitter(&http, &attestation, &store, 0).submit(&login("alice", "pw"))).unwrap_err();

    assert_eq!(err.user_message(), "reCAPTCHA failed");
    assert_eq!(err.attestation_score(), Some(0.1));
}

#[test]
fn unreadable_success_body_is_a_network_error() {
    let http = FakeHttp::new(|_| respond(200, json!({ "access": "only" })));
    let attestation = FakeAttestation::token("tok");
    let store = MemorySessionStore::new();

    let err = block_on(submitter(&http, &attestation, &store, 0).submit(&login("alice", "pw"))).unwrap_err();

    assert!(matches!(err, AuthError::Network(_)));
    assert!(store.read().is_none());
}

#[test]
fn empty_token_in_success_body_stores_nothing() {
    let http = FakeHttp::new(|_| respond(200, json!({ "access": "", "refresh": "ref-1" })));
    let attestation = FakeAttestation::token("tok");
    let store = MemorySessionStore::new();

    let err = block_on(submitter(&http, &attestation, &store, 0).submit(&login("alice", "pw"))).unwrap_err();

    assert!(matches!(err, AuthError::Network(_)));
    assert!(store.keys().is_empty());
}

#[test]
fn session_is_not_stored_after_concurrent_logout() {
    let store = MemorySessionStore::new();
    let logout = store.clone();
    let http = FakeHttp::new(move |_| {
        logout.clear();
        respond(200, json!({ "access": "acc-1", "refresh": "ref-1" }))
    });
    let attestation = FakeAttestation::token("tok");

    let session = block_on(submitter(&http, &attestation, &store, 0).submit(&login("alice", "pw"))).unwrap();

    assert_eq!(session.access_token, "acc-1");
    assert!(store.read().is_none());
    assert!(store.keys().is_empty());
}
