//! Credential store lifecycle through load/commit cycles.

use sherry::auth::AuthError;

use crate::helpers::{credential, load, seeded_dir};

#[tokio::test]
async fn first_login_becomes_the_default_account() {
    let dir = seeded_dir();
    let mut registry = load(dir.path());

    registry
        .run_command(async |reg| {
            reg.credentials_mut().upsert(credential("U1", "alice"));
            reg.credentials_mut().upsert(credential("U2", "bob"));
            Ok(())
        })
        .await
        .unwrap();

    let reloaded = load(dir.path());
    assert_eq!(reloaded.credentials().default_credential().unwrap().user_id, "U1");
    assert_eq!(reloaded.credentials().resolve("", true).unwrap().user_id, "U1");
    assert_eq!(
        reloaded.credentials().resolve("bob", false).unwrap().user_id,
        "U2"
    );
    assert!(matches!(
        reloaded.credentials().resolve("carol", false),
        Err(AuthError::NotFound { .. })
    ));
}

#[tokio::test]
async fn default_switch_persists_and_repeat_is_rejected() {
    let dir = seeded_dir();
    let mut registry = load(dir.path());
    registry
        .run_command(async |reg| {
            reg.credentials_mut().upsert(credential("U1", "alice"));
            reg.credentials_mut().upsert(credential("U2", "bob"));
            Ok(())
        })
        .await
        .unwrap();

    let mut registry = load(dir.path());
    registry
        .run_command(async |reg| {
            reg.credentials_mut().set_default("bob")?;
            Ok(())
        })
        .await
        .unwrap();

    let mut reloaded = load(dir.path());
    assert_eq!(
        reloaded.credentials().default_credential().unwrap().username,
        "bob"
    );
    assert!(matches!(
        reloaded.credentials_mut().set_default("bob"),
        Err(AuthError::AlreadyDefault { .. })
    ));
}

#[tokio::test]
async fn rejected_default_switch_leaves_the_file_alone() {
    let dir = seeded_dir();
    let mut registry = load(dir.path());
    registry
        .run_command(async |reg| {
            reg.credentials_mut().upsert(credential("U1", "alice"));
            Ok(())
        })
        .await
        .unwrap();

    let mut registry = load(dir.path());
    let result = registry
        .run_command(async |reg| {
            reg.credentials_mut().set_default("alice")?;
            Ok(())
        })
        .await;
    assert!(result.is_err());

    assert_eq!(
        load(dir.path()).credentials().default_credential().unwrap().username,
        "alice"
    );
}
