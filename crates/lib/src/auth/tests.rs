//! Tests for the credential store.

use super::*;

fn credential(user_id: &str, username: &str) -> Credential {
    Credential {
        user_id: user_id.to_string(),
        email: format!("{username}@example.com"),
        username: username.to_string(),
        access_token: format!("access-{user_id}"),
        refresh_token: format!("refresh-{user_id}"),
        expires_in: 3600,
        expired: false,
    }
}

fn store_with_alice_and_bob() -> CredentialStore {
    let mut store = CredentialStore::default();
    store.upsert(credential("U1", "alice"));
    store.upsert(credential("U2", "bob"));
    store
}

#[test]
fn resolve_falls_back_to_default() {
    let store = store_with_alice_and_bob();
    let cred = store.resolve("", true).unwrap();
    assert_eq!(cred.user_id, "U1");
}

#[test]
fn resolve_by_exact_username() {
    let store = store_with_alice_and_bob();
    assert_eq!(store.resolve("bob", false).unwrap().user_id, "U2");
    assert!(matches!(
        store.resolve("carol", false),
        Err(AuthError::NotFound { .. })
    ));
}

#[test]
fn resolve_empty_without_fallback_is_not_found() {
    let store = store_with_alice_and_bob();
    assert!(matches!(
        store.resolve("", false),
        Err(AuthError::NotFound { .. })
    ));
}

#[test]
fn resolve_empty_with_no_default_configured() {
    let store = CredentialStore::default();
    assert!(matches!(store.resolve("", true), Err(AuthError::NoDefault)));
}

#[test]
fn first_upsert_becomes_default() {
    let mut store = CredentialStore::default();
    store.upsert(credential("U1", "alice"));
    assert_eq!(store.default_credential().unwrap().user_id, "U1");

    // A second account does not displace the default.
    store.upsert(credential("U2", "bob"));
    assert_eq!(store.default_credential().unwrap().user_id, "U1");
}

#[test]
fn set_default_twice_reports_already_default() {
    let mut store = store_with_alice_and_bob();
    assert_eq!(store.set_default("bob").unwrap().user_id, "U2");
    assert!(matches!(
        store.set_default("bob"),
        Err(AuthError::AlreadyDefault { .. })
    ));
}

#[test]
fn set_default_unknown_user() {
    let mut store = store_with_alice_and_bob();
    assert!(matches!(
        store.set_default("carol"),
        Err(AuthError::NotFound { .. })
    ));
}

#[test]
fn upsert_replaces_by_user_id() {
    let mut store = store_with_alice_and_bob();
    let mut updated = credential("U2", "bob");
    updated.access_token = "rotated".to_string();
    store.upsert(updated);
    assert_eq!(store.len(), 2);
    assert_eq!(store.get_by_id("U2").unwrap().access_token, "rotated");
}

#[test]
fn mutation_marks_dirty() {
    let mut store = store_with_alice_and_bob();
    store.clear_dirty();
    assert!(!store.is_dirty());
    store.set_default("bob").unwrap();
    assert!(store.is_dirty());
}

#[test]
fn authorization_config_round_trip() {
    let config = store_with_alice_and_bob().to_config();
    let json = serde_json::to_string_pretty(&config).unwrap();
    let parsed: AuthorizationConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn empty_config_serializes_as_empty_map_not_null() {
    let json = serde_json::to_string(&AuthorizationConfig::default()).unwrap();
    assert!(json.contains("\"records\":{}"));
    let parsed: AuthorizationConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, AuthorizationConfig::default());
}

#[test]
fn records_key_is_used_on_the_wire() {
    let json = serde_json::to_string(&store_with_alice_and_bob().to_config()).unwrap();
    assert!(json.contains("\"records\""));
    assert!(json.contains("\"accessToken\""));
}
