//! Accounts: registration, login and administrative validation

use super::activity::{ActivityLog, ClientInfo};
use crate::auth::{AccessToken, JwtHandler, hash_password, validate_password_strength, verify_password};
use crate::core::models::{ActivityEvent, User, UserRole};
use crate::storage::{Page, StorageLayer};
use crate::utils::error::{DocflowError, Result};
use crate::utils::{is_valid_email, normalize_email};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

const MAX_NAME_LENGTH: usize = 255;

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub token: AccessToken,
    pub user: User,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidateUserRequest {
    pub approve: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetRoleRequest {
    pub role: UserRole,
}

#[derive(Debug, Clone)]
pub struct UserService {
    storage: Arc<StorageLayer>,
    jwt: Arc<JwtHandler>,
    activity: ActivityLog,
}

impl UserService {
    pub fn new(storage: Arc<StorageLayer>, jwt: Arc<JwtHandler>, activity: ActivityLog) -> Self {
        Self {
            storage,
            jwt,
            activity,
        }
    }

    /// Create an account awaiting validation.
    ///
    /// The very first account is created as an active admin so that someone
    /// can validate the others.
    pub async fn register(&self, request: RegisterRequest, client: &ClientInfo) -> Result<User> {
        let email = normalize_email(&request.email);
        if !is_valid_email(&email) {
            return Err(DocflowError::validation(format!(
                "Invalid email address: {}",
                request.email
            )));
        }
        let name = request.name.trim();
        if name.is_empty() || name.chars().count() > MAX_NAME_LENGTH {
            return Err(DocflowError::validation(format!(
                "Name must be between 1 and {} characters",
                MAX_NAME_LENGTH
            )));
        }
        validate_password_strength(&request.password)?;

        let mut user = User::new(email, name.to_string(), hash_password(&request.password)?);
        user.department = request.department.filter(|d| !d.trim().is_empty());
        user.job_title = request.job_title.filter(|t| !t.trim().is_empty());

        if self.storage.db().count_users().await? == 0 {
            info!("Bootstrapping {} as the first administrator", user.email);
            user.role = UserRole::Admin;
            user.approve();
        }

        let user = self.storage.db().create_user(&user).await?;
        info!("User {} registered ({})", user.id(), user.status);
        self.activity.record(
            Some(user.id()),
            ActivityEvent::UserRegistered { user_id: user.id() },
            client,
        );
        Ok(user)
    }

    /// Check credentials and account state, then issue an access token
    pub async fn login(&self, request: LoginRequest, client: &ClientInfo) -> Result<LoginResponse> {
        let email = normalize_email(&request.email);
        let user = match self.storage.db().find_user_by_email(&email).await? {
            Some(user) if verify_password(&request.password, &user.password_hash)? => user,
            _ => {
                warn!("Failed login for {}", email);
                self.activity
                    .record(None, ActivityEvent::LoginFailed { email }, client);
                return Err(DocflowError::unauthorized("Invalid credentials"));
            }
        };

        if let Some(refusal) = user.login_refusal() {
            warn!("Login refused for {}: {}", user.id(), refusal.code());
            return Err(DocflowError::forbidden(refusal.code()));
        }

        let mut user = user;
        user.record_login();
        let user = self.storage.db().update_user(&user).await?;
        let token = self.jwt.create_access_token(user.id(), user.role)?;

        info!("User {} logged in", user.id());
        self.activity
            .record(Some(user.id()), ActivityEvent::LoginSucceeded, client);
        Ok(LoginResponse { token, user })
    }

    /// Resolve a bearer token to a user allowed to work
    pub async fn authenticate(&self, token: &str) -> Result<User> {
        let claims = self.jwt.verify_token(token)?;
        let user = self
            .storage
            .db()
            .find_user_by_id(claims.sub)
            .await?
            .ok_or_else(|| DocflowError::unauthorized("Unknown user"))?;
        if let Some(refusal) = user.login_refusal() {
            return Err(DocflowError::unauthorized(refusal.code()));
        }
        Ok(user)
    }

    pub async fn list(&self, actor: &User, page: u64, limit: u64) -> Result<Page<User>> {
        if !actor.is_manager_or_admin() {
            return Err(DocflowError::forbidden("manager_role_required"));
        }
        self.storage.db().list_users(page, limit).await
    }

    /// Approve or reject a pending registration
    pub async fn validate(
        &self,
        actor: &User,
        user_id: Uuid,
        request: ValidateUserRequest,
        client: &ClientInfo,
    ) -> Result<User> {
        let mut user = self.load_for_admin(actor, user_id).await?;
        if request.approve {
            user.approve();
        } else {
            user.reject();
        }
        self.save_status(actor, user, client).await
    }

    /// Soft delete: the account stays but can no longer log in
    pub async fn deactivate(
        &self,
        actor: &User,
        user_id: Uuid,
        client: &ClientInfo,
    ) -> Result<User> {
        if actor.id() == user_id {
            return Err(DocflowError::bad_request("Cannot deactivate your own account"));
        }
        let mut user = self.load_for_admin(actor, user_id).await?;
        user.deactivate();
        self.save_status(actor, user, client).await
    }

    pub async fn set_role(
        &self,
        actor: &User,
        user_id: Uuid,
        request: SetRoleRequest,
        client: &ClientInfo,
    ) -> Result<User> {
        if actor.id() == user_id {
            return Err(DocflowError::bad_request("Cannot change your own role"));
        }
        let mut user = self.load_for_admin(actor, user_id).await?;
        user.set_role(request.role);
        let user = self.storage.db().update_user(&user).await?;

        info!("User {} is now {}", user.id(), user.role);
        self.activity.record(
            Some(actor.id()),
            ActivityEvent::UserRoleChanged {
                user_id: user.id(),
                role: user.role,
            },
            client,
        );
        Ok(user)
    }

    async fn load_for_admin(&self, actor: &User, user_id: Uuid) -> Result<User> {
        if !actor.is_admin() {
            return Err(DocflowError::forbidden("admin_required"));
        }
        self.storage
            .db()
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| DocflowError::not_found("User not found"))
    }

    async fn save_status(&self, actor: &User, user: User, client: &ClientInfo) -> Result<User> {
        let user = self.storage.db().update_user(&user).await?;
        info!("User {} is now {}", user.id(), user.status);
        self.activity.record(
            Some(actor.id()),
            ActivityEvent::UserStatusChanged {
                user_id: user.id(),
                status: user.status,
            },
            client,
        );
        Ok(user)
    }
}
