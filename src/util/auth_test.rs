use super::*;
use crate::config::HOME_ROUTE;
use crate::state::session::{MemorySessionStore, Session};
use crate::testing::RecordingNavigator;

#[test]
fn redirect_waits_for_verification() {
    assert!(!should_redirect_unauth(&AuthState::pending()));
}

#[test]
fn redirect_when_loaded_without_user() {
    let state = AuthState { loading: false, ..AuthState::default() };
    assert!(should_redirect_unauth(&state));
}

#[test]
fn no_redirect_for_signed_in_user() {
    let state = AuthState { display_name: Some("alice".to_owned()), authenticated: true, loading: false };
    assert!(!should_redirect_unauth(&state));
}

#[test]
fn end_session_clears_all_keys_then_navigates() {
    let store = MemorySessionStore::with_session(&Session {
        access_token: "a".to_owned(),
        refresh_token: "r".to_owned(),
        display_name: "alice".to_owned(),
    });
    let navigator = RecordingNavigator::default();

    end_session(&store, &navigator, HOME_ROUTE);

    assert!(store.keys().is_empty());
    assert_eq!(store.epoch(), 1);
    assert_eq!(navigator.visits(), vec![HOME_ROUTE.to_owned()]);
    assert_eq!(navigator.reloads(), 0);
}
