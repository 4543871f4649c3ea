//! Realtime assignment notifier.
//!
//! A worker's dashboard subscribes to the report change feed and wants a
//! callback exactly when a report update binds that worker. The watcher
//! filters first by event kind (updates only, creates and anything else
//! are ignored) and then by payload predicate.
//!
//! The watcher is transport-agnostic: anything that can produce
//! [`FeedMessage`]s implements [`FeedSource`]. In-process consumers use
//! the store's broadcast receiver directly; a device-side bridge over the
//! service's WebSocket feed plugs in the same way. If the source drops,
//! nothing is replayed; reconnection policy belongs to the transport.

use async_trait::async_trait;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use ecocollect_core::{FeedMessage, ReportStatus, UserId, WasteReport};

/// A live change-event stream.
#[async_trait]
pub trait FeedSource: Send + 'static {
    /// The next message, or `None` when the feed has ended.
    async fn next_message(&mut self) -> Option<FeedMessage>;
}

#[async_trait]
impl FeedSource for broadcast::Receiver<FeedMessage> {
    async fn next_message(&mut self) -> Option<FeedMessage> {
        loop {
            match self.recv().await {
                Ok(message) => return Some(message),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "assignment feed lagging; events missed");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// Whether a feed message is a fresh assignment for this worker.
fn is_assignment_for(message: &FeedMessage, worker_id: UserId) -> bool {
    message.is_update()
        && message.payload.status == ReportStatus::Assigned
        && message.payload.assigned_worker_id == Some(worker_id)
}

/// Watches a change-event stream for assignments to one worker.
pub struct AssignmentWatcher;

impl AssignmentWatcher {
    /// Spawn the watcher. `on_assigned` is invoked once per matching
    /// event with the report snapshot.
    ///
    /// The returned [`Subscription`] owns the task: dropping it (or
    /// calling [`Subscription::unsubscribe`]) tears the watcher down, so
    /// a subscription cannot outlive the screen that created it.
    pub fn spawn<S, F>(mut source: S, worker_id: UserId, mut on_assigned: F) -> Subscription
    where
        S: FeedSource,
        F: FnMut(WasteReport) + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            while let Some(message) = source.next_message().await {
                if is_assignment_for(&message, worker_id) {
                    tracing::debug!(
                        report_id = %message.payload.id,
                        worker_id = %worker_id,
                        "Assignment event matched"
                    );
                    on_assigned(message.payload);
                }
            }
        });

        Subscription { handle }
    }
}

/// Handle to a running assignment watcher.
pub struct Subscription {
    handle: JoinHandle<()>,
}

impl Subscription {
    /// Tear the watcher down. Equivalent to dropping the subscription.
    pub fn unsubscribe(self) {
        self.handle.abort();
    }

    /// Whether the watcher task is still running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecocollect_core::ChangeKind;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    fn assigned_report(worker_id: UserId) -> WasteReport {
        let mut report = WasteReport::new(UserId::generate(), "Main St", 1.0, 2.0, "photos/f1");
        report.assign(worker_id).unwrap();
        report
    }

    async fn recv_one(rx: &mut mpsc::UnboundedReceiver<WasteReport>) -> Option<WasteReport> {
        timeout(Duration::from_millis(500), rx.recv())
            .await
            .ok()
            .flatten()
    }

    #[tokio::test]
    async fn watcher_fires_only_for_its_worker() {
        let (feed, _) = broadcast::channel(16);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let w1 = UserId::generate();
        let w2 = UserId::generate();

        let _sub = AssignmentWatcher::spawn(feed.subscribe(), w1, move |report| {
            tx.send(report).unwrap();
        });

        let for_w1 = assigned_report(w1);
        let for_w2 = assigned_report(w2);
        feed.send(FeedMessage::report(ChangeKind::Update, for_w1.clone()))
            .unwrap();
        feed.send(FeedMessage::report(ChangeKind::Update, for_w2))
            .unwrap();

        let delivered = recv_one(&mut rx).await.expect("expected one notification");
        assert_eq!(delivered.id, for_w1.id);
        assert_eq!(delivered.assigned_worker_id, Some(w1));

        // The w2 event must never arrive.
        assert!(recv_one(&mut rx).await.is_none());
    }

    #[tokio::test]
    async fn watcher_ignores_create_events() {
        let (feed, _) = broadcast::channel(16);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let worker = UserId::generate();
        let _sub = AssignmentWatcher::spawn(feed.subscribe(), worker, move |report| {
            tx.send(report).unwrap();
        });

        // A create event, even one already carrying the worker, is not an
        // assignment notification.
        let report = assigned_report(worker);
        feed.send(FeedMessage::report(ChangeKind::Create, report))
            .unwrap();

        assert!(recv_one(&mut rx).await.is_none());
    }

    #[tokio::test]
    async fn watcher_ignores_non_assigned_updates() {
        let (feed, _) = broadcast::channel(16);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let worker = UserId::generate();
        let _sub = AssignmentWatcher::spawn(feed.subscribe(), worker, move |report| {
            tx.send(report).unwrap();
        });

        let mut report = assigned_report(worker);
        report.collect(None).unwrap();
        feed.send(FeedMessage::report(ChangeKind::Update, report))
            .unwrap();

        assert!(recv_one(&mut rx).await.is_none());
    }

    #[tokio::test]
    async fn unsubscribe_stops_delivery() {
        let (feed, _) = broadcast::channel(16);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let worker = UserId::generate();
        let sub = AssignmentWatcher::spawn(feed.subscribe(), worker, move |report| {
            tx.send(report).unwrap();
        });

        sub.unsubscribe();
        // Give the abort a moment to land before publishing.
        tokio::time::sleep(Duration::from_millis(20)).await;

        // Keep one receiver alive so the publish itself succeeds.
        let _keepalive = feed.subscribe();
        feed.send(FeedMessage::report(ChangeKind::Update, assigned_report(worker)))
            .unwrap();

        assert!(recv_one(&mut rx).await.is_none());
    }
}
