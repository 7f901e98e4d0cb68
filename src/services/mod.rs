//! Services module
//!
//! Orchestration over storage and the pure core: each service loads what a
//! rule needs, applies it, persists the result and emits side effects.

pub mod access;
pub mod activity;
pub mod documents;
pub mod invitations;
pub mod notifications;
pub mod permissions;
pub mod signatures;
pub mod users;

pub use access::{AccessService, AuthorizedDocument};
pub use activity::{ActivityLog, ClientInfo, spawn_activity_worker};
pub use documents::{
    CreateDocumentRequest, DocumentService, DuplicateDocumentRequest, UpdateDocumentRequest,
};
pub use invitations::{
    AcceptInvitationRequest, CreateInvitationRequest, DeclineInvitationRequest, InvitationService,
};
pub use notifications::{
    Notification, NotificationDispatcher, Notifier, RecordingNotifier, TracingNotifier,
};
pub use permissions::{GrantPermissionRequest, PermissionService, UpdatePermissionRequest};
pub use signatures::{SignDocumentRequest, SignatureService};
pub use users::{
    LoginRequest, LoginResponse, RegisterRequest, SetRoleRequest, UserService,
    ValidateUserRequest,
};
