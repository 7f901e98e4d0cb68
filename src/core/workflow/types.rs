//! Workflow actions

use crate::core::models::{SignatureType, Team};

/// Collaboration action gated by the document status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowAction {
    /// Change process flow, metadata or annexes
    Edit,
    /// Invite into the given team
    Invite(Team),
    /// Open the first review stage
    Publish,
    /// Open the next review stage after a team finished signing
    Advance,
    /// Apply a signature of the given type
    Sign(SignatureType),
    /// Administrative retirement
    Archive,
    /// Copy into a new draft
    Duplicate,
}

impl std::fmt::Display for WorkflowAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkflowAction::Edit => write!(f, "edit"),
            WorkflowAction::Invite(team) => write!(f, "invite:{}", team),
            WorkflowAction::Publish => write!(f, "publish"),
            WorkflowAction::Advance => write!(f, "advance"),
            WorkflowAction::Sign(kind) => write!(f, "sign:{}", kind),
            WorkflowAction::Archive => write!(f, "archive"),
            WorkflowAction::Duplicate => write!(f, "duplicate"),
        }
    }
}
