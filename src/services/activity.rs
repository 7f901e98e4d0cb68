//! Activity outbox
//!
//! Request handlers emit [`ActivityRecord`]s into a bounded channel and never
//! wait on the database; a single worker drains the channel and persists each
//! record under a deadline. A full channel or a failed write loses the
//! record and logs a warning, the request is unaffected.

use crate::core::models::{ActivityEvent, ActivityRecord};
use crate::storage::{Page, StorageLayer};
use crate::utils::error::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

/// Caller network details recorded with activity and signatures
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Emitting side of the audit trail
#[derive(Debug, Clone)]
pub struct ActivityLog {
    sender: mpsc::Sender<ActivityRecord>,
    storage: Arc<StorageLayer>,
}

impl ActivityLog {
    /// Create the log and the receiver its worker must drain
    pub fn new(
        storage: Arc<StorageLayer>,
        capacity: usize,
    ) -> (Self, mpsc::Receiver<ActivityRecord>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender, storage }, receiver)
    }

    /// Queue a record without blocking
    pub fn emit(&self, record: ActivityRecord) {
        if record.event.is_security_event() {
            warn!(
                actor = ?record.actor_id,
                action = record.event.action(),
                document = ?record.event.document_id(),
                "Security event"
            );
        }

        match self.sender.try_send(record) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(record)) => {
                warn!(
                    "Activity outbox full, dropping {} event",
                    record.event.action()
                );
            }
            Err(mpsc::error::TrySendError::Closed(record)) => {
                warn!(
                    "Activity worker stopped, dropping {} event",
                    record.event.action()
                );
            }
        }
    }

    /// Queue an event caused by `actor`
    pub fn record(&self, actor_id: Option<Uuid>, event: ActivityEvent, client: &ClientInfo) {
        self.emit(
            ActivityRecord::new(actor_id, event)
                .with_client(client.ip_address.clone(), client.user_agent.clone()),
        );
    }

    /// Stored events of one actor, newest first
    pub async fn list_for_actor(
        &self,
        actor_id: Uuid,
        page: u64,
        limit: u64,
    ) -> Result<Page<ActivityRecord>> {
        self.storage
            .db()
            .list_activity(Some(actor_id), page, limit)
            .await
    }

    /// All stored events, newest first
    pub async fn list_all(&self, page: u64, limit: u64) -> Result<Page<ActivityRecord>> {
        self.storage.db().list_activity(None, page, limit).await
    }
}

/// Persist queued records until every sender is dropped
pub fn spawn_activity_worker(
    mut receiver: mpsc::Receiver<ActivityRecord>,
    storage: Arc<StorageLayer>,
    deadline: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(record) = receiver.recv().await {
            match tokio::time::timeout(deadline, storage.db().insert_activity(&record)).await {
                Ok(Ok(())) => debug!("Stored {} activity {}", record.event.action(), record.id),
                Ok(Err(e)) => warn!(
                    "Failed to store {} activity {}: {}",
                    record.event.action(),
                    record.id,
                    e
                ),
                Err(_) => warn!(
                    "Storing {} activity {} exceeded {:?}, abandoned",
                    record.event.action(),
                    record.id,
                    deadline
                ),
            }
        }
        debug!("Activity worker stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;

    async fn storage() -> Arc<StorageLayer> {
        Arc::new(StorageLayer::new(&StorageConfig::default()).await.unwrap())
    }

    #[tokio::test]
    async fn test_worker_persists_emitted_events() {
        let storage = storage().await;
        let (log, receiver) = ActivityLog::new(storage.clone(), 16);
        let worker = spawn_activity_worker(receiver, storage.clone(), Duration::from_secs(5));

        let actor = Uuid::new_v4();
        log.record(
            Some(actor),
            ActivityEvent::LoginSucceeded,
            &ClientInfo {
                ip_address: Some("10.0.0.1".into()),
                user_agent: Some("tests".into()),
            },
        );
        drop(log);
        worker.await.unwrap();

        let stored = storage.db().list_activity(Some(actor), 1, 10).await.unwrap();
        assert_eq!(stored.total, 1);
        assert_eq!(stored.items[0].ip_address.as_deref(), Some("10.0.0.1"));
    }

    #[tokio::test]
    async fn test_full_outbox_drops_instead_of_blocking() {
        let storage = storage().await;
        let (log, mut receiver) = ActivityLog::new(storage, 1);

        log.record(None, ActivityEvent::LoginSucceeded, &ClientInfo::default());
        log.record(None, ActivityEvent::LoginSucceeded, &ClientInfo::default());

        assert!(receiver.try_recv().is_ok());
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_emit_after_worker_stopped_does_not_panic() {
        let (log, receiver) = ActivityLog::new(storage().await, 4);
        drop(receiver);

        log.record(None, ActivityEvent::LoginSucceeded, &ClientInfo::default());
    }
}
