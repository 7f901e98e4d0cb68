//! Status-gated mutations of a document value

use super::machine::{
    advance_target, archive_target, check, completed_status, publish_target, signing_team,
};
use super::types::WorkflowAction;
use crate::core::models::{
    ContributorStatus, Document, DocumentStatus, SignatureType, Team, User,
};
use crate::utils::error::{DocflowError, Result};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Reject content edits outside the draft stage
pub fn ensure_editable(document: &Document) -> Result<()> {
    check(document.status, WorkflowAction::Edit)
}

/// Result of publishing a draft
#[derive(Debug, Clone, PartialEq)]
pub struct PublishOutcome {
    pub from: DocumentStatus,
    pub to: DocumentStatus,
    /// Published without anyone able to sign the first stage
    pub authors_missing: bool,
    /// Contributors now expected to sign
    pub signers: Vec<Uuid>,
}

/// Move a draft into author review and ask contributors to sign
pub fn publish(
    document: &mut Document,
    require_authors: bool,
    now: DateTime<Utc>,
) -> Result<PublishOutcome> {
    check(document.status, WorkflowAction::Publish)?;
    let from = document.status;
    let to = publish_target(from).ok_or_else(|| {
        DocflowError::invalid_transition(from, WorkflowAction::Publish.to_string())
    })?;

    let authors_missing = document.contributors.authors.is_empty();
    if authors_missing && require_authors {
        return Err(DocflowError::validation(
            "Cannot publish a document without authors",
        ));
    }

    document.contributors.request_signatures();
    document.status = to;
    document.published_at = Some(now);
    document.touch();

    Ok(PublishOutcome {
        from,
        to,
        authors_missing,
        signers: document
            .contributors
            .authors
            .iter()
            .map(|c| c.user_id)
            .collect(),
    })
}

/// Open the next review stage once the previous team has signed
pub fn advance(document: &mut Document) -> Result<(DocumentStatus, DocumentStatus)> {
    check(document.status, WorkflowAction::Advance)?;
    let from = document.status;
    let to = advance_target(from).ok_or_else(|| {
        DocflowError::invalid_transition(from, WorkflowAction::Advance.to_string())
    })?;

    // The next stage needs at least one signer
    if let Some(team) = signing_team(to) {
        if document.contributors.team(team).is_empty() {
            return Err(DocflowError::validation(format!(
                "The {} team is empty; invite {} before advancing",
                team, team
            )));
        }
    }

    document.status = to;
    document.touch();
    Ok((from, to))
}

/// Result of recording one signature on the document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignOutcome {
    pub team: Team,
    /// New status when this signature completed the team
    pub completed: Option<DocumentStatus>,
}

/// Mark the signer's contributor entry signed and advance when the team is complete
pub fn record_signature(
    document: &mut Document,
    signer: Uuid,
    kind: SignatureType,
    now: DateTime<Utc>,
) -> Result<SignOutcome> {
    check(document.status, WorkflowAction::Sign(kind))?;
    let team = kind.team();

    if document.team_of(signer) != Some(team) {
        return Err(DocflowError::forbidden("not_in_signing_team"));
    }

    if document
        .contributors
        .find(signer)
        .is_some_and(|c| c.status == ContributorStatus::Signed)
    {
        return Err(DocflowError::conflict(format!(
            "User has already signed this document as {}",
            kind
        )));
    }

    document.contributors.mark_signed(signer, now);

    let completed = if document.contributors.team_fully_signed(team) {
        completed_status(document.status)
    } else {
        None
    };

    if let Some(status) = completed {
        document.status = status;
        if status == DocumentStatus::Approved {
            document.approved_at = Some(now);
        }
    }

    document.touch();
    Ok(SignOutcome { team, completed })
}

/// Administrative retirement of a non-draft document
pub fn archive(document: &mut Document, actor: &User, now: DateTime<Utc>) -> Result<DocumentStatus> {
    if !actor.is_admin() {
        return Err(DocflowError::forbidden("admin_required"));
    }

    check(document.status, WorkflowAction::Archive)?;
    let from = document.status;
    let to = archive_target(from).ok_or_else(|| {
        DocflowError::invalid_transition(from, WorkflowAction::Archive.to_string())
    })?;

    document.status = to;
    document.archived_at = Some(now);
    document.touch();
    Ok(from)
}

/// New draft owned by `owner` with the same content.
///
/// Signatures and invitations reference the source document and are not
/// copied. Contributor lists are carried over only on request, with every
/// entry back to `joined`.
pub fn duplicate(source: &Document, owner: Uuid, keep_contributors: bool) -> Document {
    let mut copy = Document::new(
        format!("{}-COPY", source.reference),
        format!("{} (Copy)", source.title),
        owner,
    );
    copy.content = source.content.clone();
    if keep_contributors {
        copy.contributors = source.contributors.reset_for_draft();
    }
    copy
}
