//! The transactional commit protocol, driven against real files.

use std::fs;

use sherry::auth::AuthError;
use sherry::constants;
use sherry::paths::canonicalize;
use sherry::watcher::Watcher;

use crate::helpers::{credential, load, remote_folder, seeded_dir};

#[tokio::test]
async fn a_full_command_persists_sources_and_watchers_together() {
    let dir = seeded_dir();
    let mut registry = load(dir.path());

    registry
        .run_command(async |reg| {
            reg.credentials_mut().upsert(credential("U1", "alice"));
            let key = reg
                .sources_mut()
                .upsert_from_remote(&remote_folder("f1-a2b3", "notes", "U1", &[]), "U1")?;
            let path = canonicalize(dir.path().join("notes"))?;
            reg.watchers_mut()
                .add(Watcher::new(key, path, "U1".to_string()))?;
            Ok(())
        })
        .await
        .unwrap();

    let reloaded = load(dir.path());
    assert_eq!(reloaded.credentials().len(), 1);
    assert_eq!(reloaded.sources().len(), 1);
    assert_eq!(reloaded.watchers().len(), 1);
    let watcher = reloaded.watchers().iter().next().unwrap();
    assert_eq!(watcher.source.folder_id, "f1-a2b3");
    assert_eq!(watcher.hashes_id.len(), 64);
    assert!(!watcher.complete);
}

#[tokio::test]
async fn a_failing_command_rolls_back_everything() {
    let dir = seeded_dir();
    let mut registry = load(dir.path());

    // Seed one committed account so the files have known content.
    registry
        .run_command(async |reg| {
            reg.credentials_mut().upsert(credential("U1", "alice"));
            Ok(())
        })
        .await
        .unwrap();
    let config_before = fs::read_to_string(dir.path().join(constants::CONFIG_FILE)).unwrap();
    let auth_before = fs::read_to_string(dir.path().join(constants::AUTH_FILE)).unwrap();

    let result = registry
        .run_command(async |reg| {
            reg.credentials_mut().upsert(credential("U2", "bob"));
            let key = reg
                .sources_mut()
                .upsert_from_remote(&remote_folder("f2-b3c4", "work", "U2", &[]), "U2")?;
            let path = canonicalize(dir.path().join("work"))?;
            reg.watchers_mut()
                .add(Watcher::new(key, path, "U2".to_string()))?;
            // The command fails after all of the above mutated memory.
            Err(AuthError::NoDefault.into())
        })
        .await;
    assert!(result.is_err());

    assert_eq!(
        fs::read_to_string(dir.path().join(constants::CONFIG_FILE)).unwrap(),
        config_before
    );
    assert_eq!(
        fs::read_to_string(dir.path().join(constants::AUTH_FILE)).unwrap(),
        auth_before
    );

    // A fresh load sees none of the rolled-back state.
    let reloaded = load(dir.path());
    assert_eq!(reloaded.credentials().len(), 1);
    assert!(reloaded.sources().is_empty());
    assert!(reloaded.watchers().is_empty());
}

#[tokio::test]
async fn settings_update_survives_a_reload() {
    let dir = seeded_dir();
    let mut registry = load(dir.path());

    registry
        .run_command(async |reg| {
            reg.credentials_mut().upsert(credential("U1", "alice"));
            reg.sources_mut()
                .upsert_from_remote(&remote_folder("f1-a2b3", "notes", "U1", &[]), "U1")?;
            Ok(())
        })
        .await
        .unwrap();

    let key = load(dir.path())
        .sources()
        .find("U1", "notes")
        .unwrap()
        .key();
    let patch = sherry::source::SettingsPatch::from_pairs([("maxFileSize", "2MB")]).unwrap();

    let mut registry = load(dir.path());
    registry
        .run_command(async |reg| {
            reg.sources_mut().apply_update(&key, &patch)?;
            Ok(())
        })
        .await
        .unwrap();

    let reloaded = load(dir.path());
    let source = reloaded.sources().get(&key).unwrap();
    assert_eq!(source.max_file_size, 2_000_000);
    assert_eq!(source.max_dir_size, 5_000_000);
}
