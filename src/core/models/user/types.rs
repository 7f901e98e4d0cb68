//! Core user types and enums

use crate::core::models::Metadata;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// User metadata
    #[serde(flatten)]
    pub metadata: Metadata,
    /// Email address (unique, stored lowercase)
    pub email: String,
    /// Display name
    pub name: String,
    /// Password hash
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// User role
    pub role: UserRole,
    /// Account status
    pub status: UserStatus,
    /// Whether an administrator verified the registration
    pub verified: bool,
    /// Department the user belongs to
    pub department: Option<String>,
    /// Job title shown on contributor entries
    pub job_title: Option<String>,
    /// Last login timestamp
    pub last_login_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Administrator
    Admin,
    /// Department manager
    Manager,
    /// Regular user
    User,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::Manager => write!(f, "manager"),
            UserRole::User => write!(f, "user"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "manager" => Ok(UserRole::Manager),
            "user" => Ok(UserRole::User),
            _ => Err(format!("Invalid user role: {}", s)),
        }
    }
}

/// Account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// Registered, waiting for an administrator
    Pending,
    /// Approved
    Active,
    /// Soft-deactivated
    Inactive,
    /// Registration refused
    Rejected,
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStatus::Pending => write!(f, "pending"),
            UserStatus::Active => write!(f, "active"),
            UserStatus::Inactive => write!(f, "inactive"),
            UserStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(UserStatus::Pending),
            "active" => Ok(UserStatus::Active),
            "inactive" => Ok(UserStatus::Inactive),
            "rejected" => Ok(UserStatus::Rejected),
            _ => Err(format!("Invalid user status: {}", s)),
        }
    }
}

/// Why an account may not sign in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginRefusal {
    Pending,
    Rejected,
    Inactive,
    Unverified,
}

impl LoginRefusal {
    /// Stable code returned to clients
    pub fn code(&self) -> &'static str {
        match self {
            LoginRefusal::Pending => "ACCOUNT_PENDING",
            LoginRefusal::Rejected => "ACCOUNT_REJECTED",
            LoginRefusal::Inactive => "ACCOUNT_INACTIVE",
            LoginRefusal::Unverified => "ACCOUNT_UNVERIFIED",
        }
    }
}

impl User {
    /// Create a new user awaiting approval
    pub fn new(email: String, name: String, password_hash: String) -> Self {
        Self {
            metadata: Metadata::new(),
            email,
            name,
            password_hash,
            role: UserRole::User,
            status: UserStatus::Pending,
            verified: false,
            department: None,
            job_title: None,
            last_login_at: None,
        }
    }

    /// Get user ID
    pub fn id(&self) -> Uuid {
        self.metadata.id
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Admins and managers
    pub fn is_manager_or_admin(&self) -> bool {
        matches!(self.role, UserRole::Admin | UserRole::Manager)
    }

    /// Derived login eligibility
    pub fn can_login(&self) -> bool {
        self.login_refusal().is_none()
    }

    /// The first reason this account may not sign in, if any
    pub fn login_refusal(&self) -> Option<LoginRefusal> {
        match self.status {
            UserStatus::Pending => Some(LoginRefusal::Pending),
            UserStatus::Rejected => Some(LoginRefusal::Rejected),
            UserStatus::Inactive => Some(LoginRefusal::Inactive),
            UserStatus::Active if !self.verified => Some(LoginRefusal::Unverified),
            UserStatus::Active => None,
        }
    }

    /// Administrator approves a registration
    pub fn approve(&mut self) {
        self.status = UserStatus::Active;
        self.verified = true;
        self.metadata.touch();
    }

    /// Administrator refuses a registration
    pub fn reject(&mut self) {
        self.status = UserStatus::Rejected;
        self.metadata.touch();
    }

    /// Soft delete; users are never removed
    pub fn deactivate(&mut self) {
        self.status = UserStatus::Inactive;
        self.metadata.touch();
    }

    pub fn set_role(&mut self, role: UserRole) {
        self.role = role;
        self.metadata.touch();
    }

    pub fn record_login(&mut self) {
        self.last_login_at = Some(chrono::Utc::now());
    }
}
