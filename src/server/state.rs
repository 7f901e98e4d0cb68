//! Application state shared across HTTP handlers

use crate::auth::JwtHandler;
use crate::config::Config;
use crate::core::models::ActivityRecord;
use crate::server::middleware::AuthRateLimiter;
use crate::services::{
    AccessService, ActivityLog, DocumentService, InvitationService, NotificationDispatcher,
    Notifier, PermissionService, SignatureService, UserService,
};
use crate::storage::StorageLayer;
use std::sync::Arc;
use tokio::sync::mpsc;

/// HTTP server state shared across handlers
///
/// Services are cheap to clone: they only hold `Arc`s and channel senders.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration (shared read-only)
    pub config: Arc<Config>,
    pub storage: Arc<StorageLayer>,
    pub jwt: Arc<JwtHandler>,
    pub login_limiter: Arc<AuthRateLimiter>,
    pub activity: ActivityLog,
    pub access: AccessService,
    pub documents: DocumentService,
    pub permissions: PermissionService,
    pub invitations: InvitationService,
    pub signatures: SignatureService,
    pub users: UserService,
}

impl AppState {
    /// Wire every service over one storage layer.
    ///
    /// Returns the receiving end of the activity outbox; the caller owns the
    /// worker that drains it.
    pub fn new(
        config: Config,
        storage: Arc<StorageLayer>,
        notifier: Arc<dyn Notifier>,
    ) -> (Self, mpsc::Receiver<ActivityRecord>) {
        let collaboration = config.collaboration().clone();
        let jwt = Arc::new(JwtHandler::new(config.auth()));
        let login_limiter = Arc::new(AuthRateLimiter::from_config(
            &config.auth().login_rate_limit,
        ));

        let (activity, receiver) = ActivityLog::new(storage.clone(), collaboration.outbox_capacity);
        let notifications = NotificationDispatcher::new(notifier, collaboration.audit_deadline());
        let access = AccessService::new(storage.clone(), activity.clone());

        let state = Self {
            documents: DocumentService::new(
                storage.clone(),
                activity.clone(),
                notifications.clone(),
                collaboration.clone(),
            ),
            permissions: PermissionService::new(storage.clone(), activity.clone()),
            invitations: InvitationService::new(
                storage.clone(),
                access.clone(),
                activity.clone(),
                notifications.clone(),
                collaboration,
            ),
            signatures: SignatureService::new(storage.clone(), activity.clone(), notifications),
            users: UserService::new(storage.clone(), jwt.clone(), activity.clone()),
            config: Arc::new(config),
            storage,
            jwt,
            login_limiter,
            activity,
            access,
        };
        (state, receiver)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
