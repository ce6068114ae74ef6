//! Relay service: validates requests and orchestrates fan-out.

use std::sync::Arc;

use futures_util::future::join_all;

use super::Deliver;
use crate::domain::{ConnectionId, GroupId, MembershipRegistry, RelayEvent};
use crate::error::RelayError;

/// Maximum publish content length, in characters.
pub const MAX_CONTENT_LEN: usize = 200_000;

/// Result of a successful publish.
///
/// Delivery failures are not errors for the publisher; they only show up
/// as `delivered < targeted`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishOutcome {
    /// Members resolved for the fan-out (publisher excluded).
    pub targeted: usize,
    /// Members whose transport accepted the event.
    pub delivered: usize,
}

/// Orchestration layer for join, leave, publish and disconnect.
///
/// Stateless between calls: owns a reference to the shared
/// [`MembershipRegistry`] and the transport's [`Deliver`] capability.
/// Every request follows validate → act → respond; only validated
/// requests touch the registry.
#[derive(Debug, Clone)]
pub struct RelayService<D> {
    registry: Arc<MembershipRegistry>,
    deliverer: D,
}

impl<D: Deliver> RelayService<D> {
    /// Creates a new `RelayService`.
    #[must_use]
    pub fn new(registry: Arc<MembershipRegistry>, deliverer: D) -> Self {
        Self {
            registry,
            deliverer,
        }
    }

    /// Returns a reference to the inner [`MembershipRegistry`].
    #[must_use]
    pub fn registry(&self) -> &Arc<MembershipRegistry> {
        &self.registry
    }

    /// Returns a reference to the delivery capability.
    #[must_use]
    pub fn deliverer(&self) -> &D {
        &self.deliverer
    }

    /// Adds `connection` to the group named `group_id`.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::InvalidGroupId`] if `group_id` is blank or too
    /// long.
    pub async fn handle_join(
        &self,
        connection: ConnectionId,
        group_id: &str,
    ) -> Result<(), RelayError> {
        let group = GroupId::parse(group_id)?;
        if self.registry.join(connection, &group).await {
            tracing::debug!(%connection, %group, "joined group");
        }
        Ok(())
    }

    /// Removes `connection` from the group named `group_id`.
    ///
    /// An invalid `group_id` is logged and ignored: leave never rejects.
    pub async fn handle_leave(&self, connection: ConnectionId, group_id: &str) {
        let group = match GroupId::parse(group_id) {
            Ok(group) => group,
            Err(err) => {
                tracing::warn!(%connection, error = %err, "ignoring leave with invalid group id");
                return;
            }
        };
        if self.registry.leave(connection, &group).await {
            tracing::debug!(%connection, %group, "left group");
        }
    }

    /// Fans `content` out to every other member of `group_id`.
    ///
    /// Deliveries run concurrently against a membership snapshot; no
    /// registry lock is held while the transport is called.
    ///
    /// # Errors
    ///
    /// - [`RelayError::InvalidGroupId`] if `group_id` is blank or too long.
    /// - [`RelayError::NullContent`] if `content` is `None`.
    /// - [`RelayError::ContentTooLarge`] if `content` exceeds
    ///   [`MAX_CONTENT_LEN`] characters.
    pub async fn handle_publish(
        &self,
        connection: ConnectionId,
        group_id: &str,
        content: Option<String>,
    ) -> Result<PublishOutcome, RelayError> {
        let group = GroupId::parse(group_id)?;
        let content = content.ok_or(RelayError::NullContent)?;
        if content.chars().count() > MAX_CONTENT_LEN {
            return Err(RelayError::ContentTooLarge {
                max: MAX_CONTENT_LEN,
            });
        }

        let targets = self.registry.members_excluding(&group, connection).await;
        if targets.is_empty() {
            return Ok(PublishOutcome::default());
        }

        let event = RelayEvent::ReceiveUpdate {
            group_id: group.clone(),
            content: Arc::from(content),
        };
        let deliveries = targets.iter().map(|&target| {
            let event = event.clone();
            async move { (target, self.deliverer.deliver(target, event).await) }
        });

        let mut outcome = PublishOutcome {
            targeted: targets.len(),
            delivered: 0,
        };
        for (target, result) in join_all(deliveries).await {
            match result {
                Ok(()) => outcome.delivered = outcome.delivered.saturating_add(1),
                Err(err) => {
                    tracing::warn!(%target, %group, error = %err, "delivery failed");
                }
            }
        }

        tracing::debug!(
            %connection,
            %group,
            targeted = outcome.targeted,
            delivered = outcome.delivered,
            "update relayed"
        );
        Ok(outcome)
    }

    /// Drops every membership held by `connection`.
    ///
    /// Called once by the transport when the session ends. Returns the
    /// number of groups the connection was removed from.
    pub async fn handle_disconnect(&self, connection: ConnectionId) -> usize {
        let left = self.registry.disconnect(connection).await;
        tracing::debug!(%connection, groups = left.len(), "connection memberships cleared");
        left.len()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use super::*;
    use crate::error::DeliveryError;

    /// Records every delivery; targets in `failing` are rejected.
    #[derive(Debug, Default)]
    struct RecordingDeliverer {
        delivered: Mutex<Vec<(ConnectionId, RelayEvent)>>,
        failing: HashSet<ConnectionId>,
    }

    impl RecordingDeliverer {
        fn failing(targets: impl IntoIterator<Item = ConnectionId>) -> Self {
            Self {
                delivered: Mutex::default(),
                failing: targets.into_iter().collect(),
            }
        }

        fn received_by(&self, target: ConnectionId) -> Vec<RelayEvent> {
            let Ok(delivered) = self.delivered.lock() else {
                panic!("poisoned");
            };
            delivered
                .iter()
                .filter(|(to, _)| *to == target)
                .map(|(_, event)| event.clone())
                .collect()
        }

        fn total(&self) -> usize {
            let Ok(delivered) = self.delivered.lock() else {
                panic!("poisoned");
            };
            delivered.len()
        }
    }

    impl Deliver for Arc<RecordingDeliverer> {
        async fn deliver(
            &self,
            target: ConnectionId,
            event: RelayEvent,
        ) -> Result<(), DeliveryError> {
            if self.failing.contains(&target) {
                return Err(DeliveryError::QueueClosed(target));
            }
            let Ok(mut delivered) = self.delivered.lock() else {
                panic!("poisoned");
            };
            delivered.push((target, event));
            Ok(())
        }
    }

    type TestRelay = RelayService<Arc<RecordingDeliverer>>;

    fn service(deliverer: RecordingDeliverer) -> (TestRelay, Arc<RecordingDeliverer>) {
        let deliverer = Arc::new(deliverer);
        let registry = Arc::new(MembershipRegistry::new());
        (RelayService::new(registry, Arc::clone(&deliverer)), deliverer)
    }

    fn update(group: &str, content: &str) -> RelayEvent {
        let Ok(group_id) = GroupId::parse(group) else {
            panic!("valid group id");
        };
        RelayEvent::ReceiveUpdate {
            group_id,
            content: Arc::from(content),
        }
    }

    #[tokio::test]
    async fn invalid_group_rejected_on_join_and_publish() {
        let (svc, sink) = service(RecordingDeliverer::default());
        let conn = ConnectionId::new();
        let too_long = "g".repeat(257);

        for raw in ["", "   ", "\t", too_long.as_str()] {
            assert!(matches!(
                svc.handle_join(conn, raw).await,
                Err(RelayError::InvalidGroupId(_))
            ));
            assert!(matches!(
                svc.handle_publish(conn, raw, Some("x".to_string())).await,
                Err(RelayError::InvalidGroupId(_))
            ));
        }
        assert!(svc.registry().groups_of(conn).await.is_empty());
        assert_eq!(sink.total(), 0);
    }

    #[tokio::test]
    async fn invalid_group_on_leave_is_silent_noop() {
        let (svc, _) = service(RecordingDeliverer::default());
        let conn = ConnectionId::new();
        tokio_test::assert_ok!(svc.handle_join(conn, "doc1").await);

        svc.handle_leave(conn, "").await;
        svc.handle_leave(conn, &"g".repeat(300)).await;

        assert_eq!(svc.registry().groups_of(conn).await.len(), 1);
    }

    #[tokio::test]
    async fn null_content_rejected() {
        let (svc, _) = service(RecordingDeliverer::default());
        let result = svc.handle_publish(ConnectionId::new(), "doc1", None).await;
        assert_eq!(result, Err(RelayError::NullContent));
    }

    #[tokio::test]
    async fn oversized_content_rejected_with_maximum_in_message() {
        let (svc, sink) = service(RecordingDeliverer::default());
        let (a, b) = (ConnectionId::new(), ConnectionId::new());
        tokio_test::assert_ok!(svc.handle_join(a, "doc1").await);
        tokio_test::assert_ok!(svc.handle_join(b, "doc1").await);

        let err = tokio_test::assert_err!(
            svc.handle_publish(a, "doc1", Some("x".repeat(MAX_CONTENT_LEN + 1)))
                .await
        );
        assert_eq!(err, RelayError::ContentTooLarge { max: MAX_CONTENT_LEN });
        assert!(err.to_string().contains("200000"));
        assert_eq!(sink.total(), 0);
    }

    #[tokio::test]
    async fn content_at_limit_and_empty_content_accepted() {
        let (svc, sink) = service(RecordingDeliverer::default());
        let (a, b) = (ConnectionId::new(), ConnectionId::new());
        tokio_test::assert_ok!(svc.handle_join(a, "doc1").await);
        tokio_test::assert_ok!(svc.handle_join(b, "doc1").await);

        tokio_test::assert_ok!(
            svc.handle_publish(a, "doc1", Some("x".repeat(MAX_CONTENT_LEN)))
                .await
        );
        tokio_test::assert_ok!(svc.handle_publish(a, "doc1", Some(String::new())).await);
        assert_eq!(sink.received_by(b).len(), 2);
    }

    #[tokio::test]
    async fn publish_reaches_others_but_not_sender() {
        let (svc, sink) = service(RecordingDeliverer::default());
        let (a, b, c) = (ConnectionId::new(), ConnectionId::new(), ConnectionId::new());
        for conn in [a, b, c] {
            tokio_test::assert_ok!(svc.handle_join(conn, "doc1").await);
        }

        let outcome = tokio_test::assert_ok!(
            svc.handle_publish(a, "doc1", Some("hello".to_string())).await
        );
        assert_eq!(outcome, PublishOutcome { targeted: 2, delivered: 2 });

        let expected = vec![update("doc1", "hello")];
        assert_eq!(sink.received_by(b), expected);
        assert_eq!(sink.received_by(c), expected);
        assert!(sink.received_by(a).is_empty());
    }

    #[tokio::test]
    async fn publish_to_empty_group_succeeds() {
        let (svc, sink) = service(RecordingDeliverer::default());
        let outcome = tokio_test::assert_ok!(
            svc.handle_publish(ConnectionId::new(), "ghost", Some("x".to_string()))
                .await
        );
        assert_eq!(outcome, PublishOutcome::default());
        assert_eq!(sink.total(), 0);
    }

    #[tokio::test]
    async fn publish_is_isolated_to_its_group() {
        let (svc, sink) = service(RecordingDeliverer::default());
        let (a, other) = (ConnectionId::new(), ConnectionId::new());
        tokio_test::assert_ok!(svc.handle_join(a, "doc1").await);
        tokio_test::assert_ok!(svc.handle_join(other, "doc2").await);

        tokio_test::assert_ok!(svc.handle_publish(a, "doc1", Some("x".to_string())).await);
        assert!(sink.received_by(other).is_empty());
    }

    #[tokio::test]
    async fn failed_recipient_does_not_stop_others() {
        let broken = ConnectionId::new();
        let (svc, sink) = service(RecordingDeliverer::failing([broken]));
        let (a, b, c) = (ConnectionId::new(), ConnectionId::new(), ConnectionId::new());
        for conn in [a, b, c, broken] {
            tokio_test::assert_ok!(svc.handle_join(conn, "doc1").await);
        }

        let outcome = tokio_test::assert_ok!(
            svc.handle_publish(a, "doc1", Some("hi".to_string())).await
        );
        assert_eq!(outcome, PublishOutcome { targeted: 3, delivered: 2 });
        assert_eq!(sink.received_by(b).len(), 1);
        assert_eq!(sink.received_by(c).len(), 1);
    }

    #[tokio::test]
    async fn disconnect_removes_from_all_groups() {
        let (svc, sink) = service(RecordingDeliverer::default());
        let (a, b) = (ConnectionId::new(), ConnectionId::new());
        for group in ["doc1", "doc2"] {
            tokio_test::assert_ok!(svc.handle_join(a, group).await);
            tokio_test::assert_ok!(svc.handle_join(b, group).await);
        }

        assert_eq!(svc.handle_disconnect(b).await, 2);
        assert!(svc.registry().groups_of(b).await.is_empty());

        for group in ["doc1", "doc2"] {
            tokio_test::assert_ok!(svc.handle_publish(a, group, Some("x".to_string())).await);
        }
        assert!(sink.received_by(b).is_empty());
    }

    #[tokio::test]
    async fn join_twice_then_leave_once_clears_membership() {
        let (svc, _) = service(RecordingDeliverer::default());
        let conn = ConnectionId::new();
        tokio_test::assert_ok!(svc.handle_join(conn, "doc1").await);
        tokio_test::assert_ok!(svc.handle_join(conn, "doc1").await);
        svc.handle_leave(conn, "doc1").await;
        svc.handle_leave(conn, "doc1").await;
        assert!(svc.registry().groups_of(conn).await.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_joins_then_publish_reach_exactly_joined() {
        let (svc, sink) = service(RecordingDeliverer::default());
        let svc = Arc::new(svc);
        let mut joined = HashSet::new();
        let mut handles = Vec::new();

        for _ in 0..100 {
            let conn = ConnectionId::new();
            joined.insert(conn);
            let svc = Arc::clone(&svc);
            handles.push(tokio::spawn(async move { svc.handle_join(conn, "docX").await }));
        }
        for handle in handles {
            let joined_ok = tokio_test::assert_ok!(handle.await);
            tokio_test::assert_ok!(joined_ok);
        }

        let publisher = ConnectionId::new();
        let outcome = tokio_test::assert_ok!(
            svc.handle_publish(publisher, "docX", Some("x".to_string())).await
        );
        assert_eq!(outcome.delivered, 100);
        for conn in &joined {
            assert_eq!(sink.received_by(*conn).len(), 1);
        }
        assert_eq!(sink.total(), 100);
    }
}
