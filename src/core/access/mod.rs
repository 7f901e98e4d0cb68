//! Access Decision Engine
//!
//! Pure decision over fully materialized values: the caller loads the user,
//! the document, the user's explicit permission record and accepted
//! invitation (if any) and asks whether a given level is allowed.

mod engine;
mod types;

pub use engine::{decide, resolve_grant};
pub use types::{AccessContext, AccessDecision, AccessGrant, DenyReason};
