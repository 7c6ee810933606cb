//! The overlap invariant driven through the registry store.

use sherry::paths::canonicalize;
use sherry::watcher::{Watcher, WatcherError};
use sherry::Error;

use crate::helpers::{credential, load, remote_folder, seeded_dir};

#[tokio::test]
async fn overlapping_watch_rejects_the_whole_command() {
    let dir = seeded_dir();
    let docs = dir.path().join("home/docs");
    let mut registry = load(dir.path());

    registry
        .run_command(async |reg| {
            reg.credentials_mut().upsert(credential("U1", "alice"));
            let key = reg
                .sources_mut()
                .upsert_from_remote(&remote_folder("f1-a2b3", "docs", "U1", &[]), "U1")?;
            reg.watchers_mut()
                .add(Watcher::new(key, canonicalize(&docs)?, "U1".to_string()))?;
            Ok(())
        })
        .await
        .unwrap();

    // Watching a subdirectory of an existing watcher must fail and leave the
    // persisted watcher list at one entry.
    let mut registry = load(dir.path());
    let result = registry
        .run_command(async |reg| {
            let key = reg
                .sources_mut()
                .upsert_from_remote(&remote_folder("f2-b3c4", "sub", "U1", &[]), "U1")?;
            reg.watchers_mut().add(Watcher::new(
                key,
                canonicalize(docs.join("sub"))?,
                "U1".to_string(),
            ))?;
            Ok(())
        })
        .await;
    match result {
        Err(Error::Watcher(WatcherError::PathAlreadyWatched { .. })) => {}
        other => panic!("expected PathAlreadyWatched, got {other:?}"),
    }
    assert_eq!(load(dir.path()).watchers().len(), 1);

    // A disjoint sibling is accepted.
    let mut registry = load(dir.path());
    registry
        .run_command(async |reg| {
            let key = reg
                .sources_mut()
                .upsert_from_remote(&remote_folder("f3-c4d5", "other", "U1", &[]), "U1")?;
            reg.watchers_mut().add(Watcher::new(
                key,
                canonicalize(dir.path().join("home/other"))?,
                "U1".to_string(),
            ))?;
            Ok(())
        })
        .await
        .unwrap();
    assert_eq!(load(dir.path()).watchers().len(), 2);
}

#[tokio::test]
async fn unwatch_from_subdirectory_respects_the_confirmation() {
    let dir = seeded_dir();
    let docs = dir.path().join("home/docs");
    let mut registry = load(dir.path());
    registry
        .run_command(async |reg| {
            reg.credentials_mut().upsert(credential("U1", "alice"));
            let key = reg
                .sources_mut()
                .upsert_from_remote(&remote_folder("f1-a2b3", "docs", "U1", &[]), "U1")?;
            reg.watchers_mut()
                .add(Watcher::new(key, canonicalize(&docs)?, "U1".to_string()))?;
            Ok(())
        })
        .await
        .unwrap();

    // Declined confirmation aborts and persists nothing.
    let mut registry = load(dir.path());
    let result = registry
        .run_command(async |reg| {
            reg.watchers_mut()
                .remove_by_path(&canonicalize(docs.join("inner"))?, |_| false)?;
            Ok(())
        })
        .await;
    assert!(matches!(result, Err(Error::Watcher(WatcherError::Aborted))));
    assert_eq!(load(dir.path()).watchers().len(), 1);

    // Confirmed removal drops the binding for good.
    let mut registry = load(dir.path());
    registry
        .run_command(async |reg| {
            reg.watchers_mut()
                .remove_by_path(&canonicalize(docs.join("inner"))?, |_| true)?;
            Ok(())
        })
        .await
        .unwrap();
    assert!(load(dir.path()).watchers().is_empty());
}
