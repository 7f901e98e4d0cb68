//! Transition table

use super::types::WorkflowAction;
use crate::core::models::{DocumentStatus, Team};
use crate::utils::error::{DocflowError, Result};

/// Content is writable only while drafting
pub fn can_edit(status: DocumentStatus) -> bool {
    status == DocumentStatus::Draft
}

/// Teams that still accept new members in this status
pub fn open_teams(status: DocumentStatus) -> &'static [Team] {
    match status {
        DocumentStatus::Draft => &[Team::Authors, Team::Verifiers, Team::Validators],
        DocumentStatus::AuthorReview | DocumentStatus::AuthorSigned => {
            &[Team::Verifiers, Team::Validators]
        }
        DocumentStatus::VerifierReview
        | DocumentStatus::VerifierSigned
        | DocumentStatus::ValidatorReview => &[Team::Validators],
        DocumentStatus::Approved | DocumentStatus::Archived => &[],
    }
}

pub fn can_invite(status: DocumentStatus, team: Team) -> bool {
    open_teams(status).contains(&team)
}

/// Team whose signatures are collected in this status
pub fn signing_team(status: DocumentStatus) -> Option<Team> {
    match status {
        DocumentStatus::AuthorReview => Some(Team::Authors),
        DocumentStatus::VerifierReview => Some(Team::Verifiers),
        DocumentStatus::ValidatorReview => Some(Team::Validators),
        _ => None,
    }
}

/// Status reached once every member of the signing team has signed
pub fn completed_status(status: DocumentStatus) -> Option<DocumentStatus> {
    match status {
        DocumentStatus::AuthorReview => Some(DocumentStatus::AuthorSigned),
        DocumentStatus::VerifierReview => Some(DocumentStatus::VerifierSigned),
        DocumentStatus::ValidatorReview => Some(DocumentStatus::Approved),
        _ => None,
    }
}

pub fn publish_target(status: DocumentStatus) -> Option<DocumentStatus> {
    match status {
        DocumentStatus::Draft => Some(DocumentStatus::AuthorReview),
        _ => None,
    }
}

pub fn advance_target(status: DocumentStatus) -> Option<DocumentStatus> {
    match status {
        DocumentStatus::AuthorSigned => Some(DocumentStatus::VerifierReview),
        DocumentStatus::VerifierSigned => Some(DocumentStatus::ValidatorReview),
        _ => None,
    }
}

pub fn archive_target(status: DocumentStatus) -> Option<DocumentStatus> {
    match status {
        DocumentStatus::Draft | DocumentStatus::Archived => None,
        _ => Some(DocumentStatus::Archived),
    }
}

/// Whether `action` is legal in `status`; the error names both
pub fn check(status: DocumentStatus, action: WorkflowAction) -> Result<()> {
    let legal = match action {
        WorkflowAction::Edit => can_edit(status),
        WorkflowAction::Invite(team) => can_invite(status, team),
        WorkflowAction::Publish => publish_target(status).is_some(),
        WorkflowAction::Advance => advance_target(status).is_some(),
        WorkflowAction::Sign(kind) => signing_team(status) == Some(kind.team()),
        WorkflowAction::Archive => archive_target(status).is_some(),
        WorkflowAction::Duplicate => true,
    };

    if legal {
        Ok(())
    } else {
        Err(DocflowError::invalid_transition(status, action.to_string()))
    }
}
