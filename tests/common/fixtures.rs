//! Test fixtures and data factories
//!
//! [`TestApp`] wires the real services over an in-memory database, the same
//! way the server does, with a recording notifier in place of delivery.

use super::database::TestDatabase;
use docflow::config::Config;
use docflow::core::models::{ActivityRecord, Document, Invitation, InvitationType, PermissionLevel, Team, User};
use docflow::server::AppState;
use docflow::services::{
    AuthorizedDocument, ClientInfo, CreateDocumentRequest, CreateInvitationRequest, LoginRequest,
    Notification, RecordingNotifier, RegisterRequest, SignDocumentRequest, ValidateUserRequest,
    spawn_activity_worker,
};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub const PASSWORD: &str = "correct-horse-battery";

/// Fully wired services plus the first (admin) account
pub struct TestApp {
    pub db: TestDatabase,
    pub state: AppState,
    pub notifier: RecordingNotifier,
    pub admin: User,
    pub client: ClientInfo,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(Config::default()).await
    }

    pub async fn with_config(mut config: Config) -> Self {
        config.app.storage.database = super::database::test_db_config();
        let db = TestDatabase::new().await;
        let notifier = RecordingNotifier::new();
        let (state, receiver) = AppState::new(config, db.storage(), Arc::new(notifier.clone()));
        spawn_activity_worker(receiver, db.storage(), Duration::from_secs(1));

        let client = ClientInfo {
            ip_address: Some("127.0.0.1".to_string()),
            user_agent: Some("docflow-tests".to_string()),
        };
        let admin = state
            .users
            .register(register_request("admin@example.com", "Admin"), &client)
            .await
            .expect("bootstrap admin");

        Self {
            db,
            state,
            notifier,
            admin,
            client,
        }
    }

    /// Registered and validated by the admin
    pub async fn user(&self, email: &str) -> User {
        let user = self.pending_user(email).await;
        self.state
            .users
            .validate(
                &self.admin,
                user.id(),
                ValidateUserRequest { approve: true },
                &self.client,
            )
            .await
            .expect("validate user")
    }

    /// Registered, awaiting validation
    pub async fn pending_user(&self, email: &str) -> User {
        let name = email.split('@').next().unwrap_or("user").to_string();
        self.state
            .users
            .register(register_request(email, &name), &self.client)
            .await
            .expect("register user")
    }

    pub async fn token(&self, email: &str) -> String {
        self.state
            .users
            .login(
                LoginRequest {
                    email: email.to_string(),
                    password: PASSWORD.to_string(),
                },
                &self.client,
            )
            .await
            .expect("login")
            .token
            .access_token
    }

    pub async fn document(&self, owner: &User, reference: &str) -> Document {
        self.state
            .documents
            .create(
                owner,
                CreateDocumentRequest {
                    reference: reference.to_string(),
                    title: format!("Procedure {}", reference),
                    content: None,
                },
                &self.client,
            )
            .await
            .expect("create document")
    }

    /// Reload through the access gate at `level`
    pub async fn authorize(
        &self,
        user: &User,
        document_id: Uuid,
        level: PermissionLevel,
    ) -> docflow::Result<AuthorizedDocument> {
        self.state
            .access
            .authorize(user, document_id, level, &self.client)
            .await
    }

    pub async fn reload(&self, document_id: Uuid) -> Document {
        self.state
            .access
            .load_document(document_id)
            .await
            .expect("load document")
    }

    pub async fn invite(
        &self,
        actor: &User,
        document_id: Uuid,
        email: &str,
        team: Team,
    ) -> docflow::Result<Invitation> {
        self.state
            .invitations
            .create(
                actor,
                CreateInvitationRequest {
                    document_id,
                    email: email.to_string(),
                    team,
                    invitation_type: InvitationType::Collaborator,
                    message: None,
                },
                &self.client,
            )
            .await
    }

    /// Invite `user` and accept on their behalf
    pub async fn join(&self, actor: &User, document_id: Uuid, user: &User, team: Team) -> Document {
        let invitation = self
            .invite(actor, document_id, &user.email, team)
            .await
            .expect("invite");
        self.state
            .invitations
            .accept(user, invitation.id(), Default::default(), &self.client)
            .await
            .expect("accept")
            .1
    }

    /// Notifications are delivered on spawned tasks; poll until `count` arrived
    pub async fn notifications(&self, count: usize) -> Vec<Notification> {
        for _ in 0..100 {
            let sent = self.notifier.sent();
            if sent.len() >= count {
                return sent;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.notifier.sent()
    }

    /// Stored activity of `user` matching `action`, once the worker has
    /// written at least `count` such records
    pub async fn activity(&self, user: &User, action: &str, count: usize) -> Vec<ActivityRecord> {
        let mut records = Vec::new();
        for _ in 0..100 {
            records = self
                .state
                .activity
                .list_for_actor(user.id(), 1, 100)
                .await
                .expect("list activity")
                .items
                .into_iter()
                .filter(|record| record.event.action() == action)
                .collect();
            if records.len() >= count {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        records
    }
}

pub fn register_request(email: &str, name: &str) -> RegisterRequest {
    RegisterRequest {
        email: email.to_string(),
        password: PASSWORD.to_string(),
        name: name.to_string(),
        department: Some("Quality".to_string()),
        job_title: Some("Engineer".to_string()),
    }
}

/// Signature for the current stage, typed by the service
pub fn signing(data: &str) -> SignDocumentRequest {
    SignDocumentRequest {
        signature_type: None,
        signature_data: data.to_string(),
        comments: None,
    }
}

/// Token carried by the acceptance link of an invitation notification
pub fn accept_token(notification: &Notification) -> Option<String> {
    match notification {
        Notification::InvitationCreated { accept_url, .. }
        | Notification::InvitationResent { accept_url, .. } => accept_url
            .split("token=")
            .nth(1)
            .map(|token| token.to_string()),
        _ => None,
    }
}
