use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_test::traced_test;

use super::*;
use crate::config::DuplicateNamePolicy;
use crate::config::EngineConfig;
use crate::model::ApplicationKey;
use crate::model::ResourceChange;
use crate::session::ResourceViewSession;
use crate::test_utils::resource;
use crate::test_utils::FakeResourceProvider;
use crate::Error;
use crate::SubscriptionError;

async fn wait_for_change(changes: &mut tokio::sync::watch::Receiver<u64>) {
    tokio::time::timeout(Duration::from_secs(5), changes.changed())
        .await
        .expect("change signal within timeout")
        .expect("change channel open");
}

#[tokio::test]
#[traced_test]
async fn snapshot_is_applied_before_start_returns() {
    let (provider, _tx) = FakeResourceProvider::with_snapshot(vec![
        resource("web").resource_type("Project").build(),
        resource("cache").resource_type("Container").build(),
    ]);
    let session = Arc::new(ResourceViewSession::new(EngineConfig::default()));

    let subscriber = FeedSubscriber::start(provider, session.clone(), CancellationToken::new())
        .await
        .expect("start succeeds");

    assert_eq!(session.store().len(), 2);
    assert_eq!(
        session.known_types(),
        vec!["Container".to_string(), "Project".to_string()]
    );

    subscriber.shutdown().await;
}

#[tokio::test]
#[traced_test]
async fn batches_are_applied_in_arrival_order() {
    let (provider, tx) = FakeResourceProvider::with_snapshot(vec![resource("db").state("Starting").build()]);
    let session = Arc::new(ResourceViewSession::new(EngineConfig::default()));
    let subscriber = FeedSubscriber::start(provider, session.clone(), CancellationToken::new())
        .await
        .expect("start succeeds");

    let mut changes = session.changes();

    tx.send(vec![ResourceChange::Upsert(resource("db").state("Running").build())])
        .await
        .expect("send batch");
    wait_for_change(&mut changes).await;

    tx.send(vec![ResourceChange::Upsert(resource("db").state("Exited").build())])
        .await
        .expect("send batch");
    wait_for_change(&mut changes).await;

    let db = session.store().try_get("db").expect("db exists");
    assert_eq!(db.state.as_deref(), Some("Exited"));
    assert_eq!(session.store().len(), 1);

    subscriber.shutdown().await;
}

#[tokio::test]
#[traced_test]
async fn unknown_delete_is_tolerated_and_the_loop_continues() {
    let (provider, tx) = FakeResourceProvider::with_snapshot(vec![]);
    let session = Arc::new(ResourceViewSession::new(EngineConfig::default()));
    let subscriber = FeedSubscriber::start(provider, session.clone(), CancellationToken::new())
        .await
        .expect("start succeeds");

    let mut changes = session.changes();
    tx.send(vec![
        ResourceChange::Delete(resource("never-existed").build()),
        ResourceChange::Upsert(resource("web").build()),
    ])
    .await
    .expect("send batch");
    wait_for_change(&mut changes).await;

    assert_eq!(session.store().len(), 1);
    assert!(session.store().contains("web"));

    subscriber.shutdown().await;
}

#[tokio::test]
#[traced_test]
async fn configured_buffer_capacity_reaches_the_provider() {
    let (provider, _tx) = FakeResourceProvider::with_snapshot(vec![resource("web").build()]);
    let config = EngineConfig {
        change_buffer_capacity: 7,
        ..EngineConfig::default()
    };
    let session = Arc::new(ResourceViewSession::new(config));

    let subscriber = FeedSubscriber::start(provider.clone(), session, CancellationToken::new())
        .await
        .expect("start succeeds");

    assert_eq!(provider.requested_capacity(), Some(7));

    subscriber.shutdown().await;
}

#[tokio::test]
#[traced_test]
async fn duplicate_snapshot_name_fails_start_under_reject_policy() {
    let (provider, _tx) = FakeResourceProvider::with_snapshot(vec![
        resource("dup").build(),
        resource("dup").build(),
    ]);
    let config = EngineConfig {
        duplicate_name_policy: DuplicateNamePolicy::Reject,
        ..EngineConfig::default()
    };
    let session = Arc::new(ResourceViewSession::new(config));

    let result = FeedSubscriber::start(provider, session, CancellationToken::new()).await;

    assert!(matches!(
        result,
        Err(Error::Subscription(SubscriptionError::DuplicateSnapshotName { .. }))
    ));
}

#[tokio::test]
#[traced_test]
async fn shutdown_stops_consumption_and_is_idempotent() {
    let (provider, tx) = FakeResourceProvider::with_snapshot(vec![resource("web").build()]);
    let session = Arc::new(ResourceViewSession::new(EngineConfig::default()));
    let subscriber = FeedSubscriber::start(provider, session.clone(), CancellationToken::new())
        .await
        .expect("start succeeds");

    subscriber.shutdown().await;
    assert!(subscriber.is_cancelled());

    // The consumption loop is gone, so its receiver is dropped and further
    // batches have nowhere to go.
    let send_result = tx
        .send(vec![ResourceChange::Upsert(resource("late").build())])
        .await;
    assert!(send_result.is_err());
    assert!(!session.store().contains("late"));

    // A second shutdown is a no-op.
    subscriber.shutdown().await;
}

#[tokio::test]
#[traced_test]
async fn closed_feed_ends_the_loop_without_error() {
    let (provider, tx) = FakeResourceProvider::with_snapshot(vec![resource("web").build()]);
    let session = Arc::new(ResourceViewSession::new(EngineConfig::default()));
    let subscriber = FeedSubscriber::start(provider, session.clone(), CancellationToken::new())
        .await
        .expect("start succeeds");

    drop(tx);
    // Join must succeed even though the loop exited on its own.
    subscriber.shutdown().await;

    assert_eq!(session.store().len(), 1);
}

#[tokio::test]
#[traced_test]
async fn error_log_watcher_refreshes_counts_on_signal() {
    let mut provider = MockErrorLogProvider::new();
    let (signal_tx, signal_rx) = mpsc::unbounded_channel();

    let mut call = 0;
    provider.expect_unviewed_error_counts().returning(move || {
        call += 1;
        let mut counts = HashMap::new();
        counts.insert(ApplicationKey::new("frontend"), call as u64);
        counts
    });
    provider
        .expect_subscribe_new_logs()
        .return_once(move || signal_rx);

    let session = Arc::new(ResourceViewSession::new(EngineConfig::default()));
    let mut changes = session.changes();
    let watcher = ErrorLogWatcher::start(Arc::new(provider), session.clone(), CancellationToken::new());

    // Initial seed happened synchronously in start.
    assert_eq!(session.error_counts().count_for(&ApplicationKey::new("frontend")), 1);
    changes.mark_unchanged();

    signal_tx.send(()).expect("signal");
    wait_for_change(&mut changes).await;
    assert_eq!(session.error_counts().count_for(&ApplicationKey::new("frontend")), 2);

    watcher.shutdown().await;
}
