//! Outbound notifications
//!
//! Delivery is best effort: the dispatcher spawns every send under a
//! deadline and only logs failures.

use crate::core::models::Team;
use crate::utils::error::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Message sent to one or more people
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    InvitationCreated {
        invitation_id: Uuid,
        document_id: Uuid,
        document_title: String,
        email: String,
        team: Team,
        accept_url: String,
    },
    InvitationResent {
        invitation_id: Uuid,
        document_id: Uuid,
        document_title: String,
        email: String,
        team: Team,
        accept_url: String,
    },
    DocumentPublished {
        document_id: Uuid,
        document_title: String,
        recipients: Vec<Uuid>,
    },
    SignatureRequested {
        document_id: Uuid,
        document_title: String,
        team: Team,
        recipients: Vec<Uuid>,
    },
    DocumentApproved {
        document_id: Uuid,
        document_title: String,
        recipients: Vec<Uuid>,
    },
}

impl Notification {
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::InvitationCreated { .. } => "invitation_created",
            Notification::InvitationResent { .. } => "invitation_resent",
            Notification::DocumentPublished { .. } => "document_published",
            Notification::SignatureRequested { .. } => "signature_requested",
            Notification::DocumentApproved { .. } => "document_approved",
        }
    }
}

/// Acceptance link sent with an invitation
pub fn accept_url(base_url: &str, invitation_id: Uuid, token: &str) -> String {
    format!(
        "{}/invitations/{}/accept?token={}",
        base_url.trim_end_matches('/'),
        invitation_id,
        token
    )
}

/// Delivery channel (email, push, ...)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: Notification) -> Result<()>;
}

/// Writes notifications to the log instead of delivering them
#[derive(Debug, Default, Clone)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn send(&self, notification: Notification) -> Result<()> {
        // Payload not logged: invitation links carry the raw acceptance token
        info!(kind = notification.kind(), "Notification queued for delivery");
        Ok(())
    }
}

/// Keeps every notification in memory
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: Notification) -> Result<()> {
        self.sent.lock().push(notification);
        Ok(())
    }
}

/// Fire-and-forget front of a [`Notifier`]
#[derive(Clone)]
pub struct NotificationDispatcher {
    notifier: Arc<dyn Notifier>,
    deadline: Duration,
}

impl std::fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationDispatcher")
            .field("deadline", &self.deadline)
            .finish()
    }
}

impl NotificationDispatcher {
    pub fn new(notifier: Arc<dyn Notifier>, deadline: Duration) -> Self {
        Self { notifier, deadline }
    }

    /// Spawn the send and return immediately
    pub fn dispatch(&self, notification: Notification) -> tokio::task::JoinHandle<()> {
        let notifier = self.notifier.clone();
        let deadline = self.deadline;

        tokio::spawn(async move {
            let kind = notification.kind();
            match tokio::time::timeout(deadline, notifier.send(notification)).await {
                Ok(Ok(())) => debug!("Sent {} notification", kind),
                Ok(Err(e)) => warn!("Failed to send {} notification: {}", kind, e),
                Err(_) => warn!("Sending {} notification exceeded {:?}", kind, deadline),
            }
        })
    }
}
