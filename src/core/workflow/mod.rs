//! Document Status State Machine
//!
//! `draft → author_review → author_signed → verifier_review →
//! verifier_signed → validator_review → approved`, with `archived` reachable
//! from any non-draft status. Status never moves backward; duplicating a
//! document is the only way to get a fresh draft.

mod machine;
mod operations;
#[cfg(test)]
mod tests;
mod types;

pub use machine::{
    advance_target, archive_target, can_edit, can_invite, check, completed_status, open_teams,
    publish_target, signing_team,
};
pub use operations::{
    PublishOutcome, SignOutcome, advance, archive, duplicate, ensure_editable, publish,
    record_signature,
};
pub use types::WorkflowAction;
