use super::*;
use crate::core::models::{
    Contributor, ContributorStatus, Document, DocumentStatus, SignatureType, Team, User, UserRole,
};
use crate::utils::error::DocflowError;
use chrono::Utc;
use uuid::Uuid;

fn user(role: UserRole) -> User {
    let mut user = User::new("u@example.com".into(), "U".into(), String::new());
    user.role = role;
    user.approve();
    user
}

fn draft() -> Document {
    Document::new("PR-001".into(), "Purchasing".into(), Uuid::new_v4())
}

fn with_member(document: &mut Document, team: Team) -> Uuid {
    let id = Uuid::new_v4();
    document
        .contributors
        .add(team, Contributor::new(id, "Member", "Title"))
        .unwrap();
    id
}

// ==================== Transition Table Tests ====================

#[test]
fn test_edit_only_in_draft() {
    for status in DocumentStatus::ALL {
        let result = check(status, WorkflowAction::Edit);
        if status == DocumentStatus::Draft {
            assert!(result.is_ok());
        } else {
            assert!(
                matches!(result, Err(DocflowError::InvalidStateTransition { status: s, .. }) if s == status)
            );
        }
    }
}

#[test]
fn test_invite_team_gating() {
    assert!(can_invite(DocumentStatus::Draft, Team::Authors));
    assert!(can_invite(DocumentStatus::Draft, Team::Validators));

    assert!(!can_invite(DocumentStatus::AuthorReview, Team::Authors));
    assert!(can_invite(DocumentStatus::AuthorSigned, Team::Verifiers));

    assert!(!can_invite(DocumentStatus::VerifierReview, Team::Authors));
    assert!(!can_invite(DocumentStatus::VerifierReview, Team::Verifiers));
    assert!(can_invite(DocumentStatus::VerifierReview, Team::Validators));
    assert!(can_invite(DocumentStatus::VerifierSigned, Team::Validators));

    for team in Team::ALL {
        assert!(!can_invite(DocumentStatus::Approved, team));
        assert!(!can_invite(DocumentStatus::Archived, team));
    }
}

#[test]
fn test_invite_authors_during_verifier_review_is_rejected() {
    let err = check(
        DocumentStatus::VerifierReview,
        WorkflowAction::Invite(Team::Authors),
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Action 'invite:authors' is not allowed while document is verifier_review"
    );
    assert!(
        check(
            DocumentStatus::VerifierReview,
            WorkflowAction::Invite(Team::Validators)
        )
        .is_ok()
    );
}

#[test]
fn test_duplicate_always_legal() {
    for status in DocumentStatus::ALL {
        assert!(check(status, WorkflowAction::Duplicate).is_ok());
    }
}

#[test]
fn test_sign_requires_matching_stage() {
    assert!(check(DocumentStatus::AuthorReview, WorkflowAction::Sign(SignatureType::Author)).is_ok());
    assert!(
        check(
            DocumentStatus::AuthorReview,
            WorkflowAction::Sign(SignatureType::Verifier)
        )
        .is_err()
    );
    assert!(check(DocumentStatus::Draft, WorkflowAction::Sign(SignatureType::Author)).is_err());
    assert!(
        check(
            DocumentStatus::ValidatorReview,
            WorkflowAction::Sign(SignatureType::Validator)
        )
        .is_ok()
    );
}

#[test]
fn test_no_transition_moves_backward() {
    for status in DocumentStatus::ALL {
        let targets = [
            publish_target(status),
            advance_target(status),
            archive_target(status),
            completed_status(status),
        ];
        for target in targets.into_iter().flatten() {
            assert!(
                target.rank() > status.rank(),
                "{} -> {} moves backward",
                status,
                target
            );
        }
    }
}

#[test]
fn test_archived_is_terminal() {
    let archived = DocumentStatus::Archived;
    assert!(publish_target(archived).is_none());
    assert!(advance_target(archived).is_none());
    assert!(archive_target(archived).is_none());
    assert!(completed_status(archived).is_none());
    assert!(open_teams(archived).is_empty());
}

// ==================== Publish Tests ====================

#[test]
fn test_publish_moves_draft_to_author_review() {
    let mut document = draft();
    let author = with_member(&mut document, Team::Authors);
    let verifier = with_member(&mut document, Team::Verifiers);

    let outcome = publish(&mut document, false, Utc::now()).unwrap();

    assert_eq!(outcome.from, DocumentStatus::Draft);
    assert_eq!(outcome.to, DocumentStatus::AuthorReview);
    assert_eq!(outcome.signers, vec![author]);
    assert!(!outcome.authors_missing);
    assert_eq!(document.status, DocumentStatus::AuthorReview);
    assert!(document.published_at.is_some());
    assert_eq!(
        document.contributors.find(verifier).map(|c| c.status),
        Some(ContributorStatus::Pending)
    );
}

#[test]
fn test_publish_twice_is_rejected() {
    let mut document = draft();
    with_member(&mut document, Team::Authors);
    publish(&mut document, false, Utc::now()).unwrap();

    let err = publish(&mut document, false, Utc::now()).unwrap_err();
    assert!(matches!(
        err,
        DocflowError::InvalidStateTransition {
            status: DocumentStatus::AuthorReview,
            ..
        }
    ));
}

#[test]
fn test_publish_without_authors() {
    let mut lenient = draft();
    let outcome = publish(&mut lenient, false, Utc::now()).unwrap();
    assert!(outcome.authors_missing);

    let mut strict = draft();
    let err = publish(&mut strict, true, Utc::now()).unwrap_err();
    assert!(matches!(err, DocflowError::Validation(_)));
    assert_eq!(strict.status, DocumentStatus::Draft);
}

#[test]
fn test_edit_after_publish_is_invalid_transition() {
    let mut document = draft();
    with_member(&mut document, Team::Authors);
    assert!(ensure_editable(&document).is_ok());

    publish(&mut document, false, Utc::now()).unwrap();
    assert!(matches!(
        ensure_editable(&document),
        Err(DocflowError::InvalidStateTransition { .. })
    ));
}

// ==================== Signature Tests ====================

#[test]
fn test_full_signing_path_reaches_approved() {
    let mut document = draft();
    let author = with_member(&mut document, Team::Authors);
    let verifier = with_member(&mut document, Team::Verifiers);
    let validator = with_member(&mut document, Team::Validators);
    publish(&mut document, false, Utc::now()).unwrap();

    let outcome = record_signature(&mut document, author, SignatureType::Author, Utc::now()).unwrap();
    assert_eq!(outcome.completed, Some(DocumentStatus::AuthorSigned));

    advance(&mut document).unwrap();
    assert_eq!(document.status, DocumentStatus::VerifierReview);

    record_signature(&mut document, verifier, SignatureType::Verifier, Utc::now()).unwrap();
    assert_eq!(document.status, DocumentStatus::VerifierSigned);

    advance(&mut document).unwrap();
    assert_eq!(document.status, DocumentStatus::ValidatorReview);

    let outcome =
        record_signature(&mut document, validator, SignatureType::Validator, Utc::now()).unwrap();
    assert_eq!(outcome.completed, Some(DocumentStatus::Approved));
    assert!(document.approved_at.is_some());
}

#[test]
fn test_team_completes_only_when_all_signed() {
    let mut document = draft();
    let first = with_member(&mut document, Team::Authors);
    let second = with_member(&mut document, Team::Authors);
    publish(&mut document, false, Utc::now()).unwrap();

    let outcome = record_signature(&mut document, first, SignatureType::Author, Utc::now()).unwrap();
    assert_eq!(outcome.completed, None);
    assert_eq!(document.status, DocumentStatus::AuthorReview);

    record_signature(&mut document, second, SignatureType::Author, Utc::now()).unwrap();
    assert_eq!(document.status, DocumentStatus::AuthorSigned);
}

#[test]
fn test_second_signature_by_same_user_conflicts() {
    let mut document = draft();
    let first = with_member(&mut document, Team::Authors);
    with_member(&mut document, Team::Authors);
    publish(&mut document, false, Utc::now()).unwrap();

    record_signature(&mut document, first, SignatureType::Author, Utc::now()).unwrap();
    let err = record_signature(&mut document, first, SignatureType::Author, Utc::now()).unwrap_err();
    assert!(matches!(err, DocflowError::Conflict(_)));
}

#[test]
fn test_signer_outside_team_is_forbidden() {
    let mut document = draft();
    with_member(&mut document, Team::Authors);
    let verifier = with_member(&mut document, Team::Verifiers);
    publish(&mut document, false, Utc::now()).unwrap();

    let err = record_signature(&mut document, verifier, SignatureType::Author, Utc::now()).unwrap_err();
    assert!(matches!(err, DocflowError::Forbidden(code) if code == "not_in_signing_team"));
}

#[test]
fn test_signing_wrong_stage_is_invalid_transition() {
    let mut document = draft();
    with_member(&mut document, Team::Authors);
    let verifier = with_member(&mut document, Team::Verifiers);
    publish(&mut document, false, Utc::now()).unwrap();

    let err =
        record_signature(&mut document, verifier, SignatureType::Verifier, Utc::now()).unwrap_err();
    assert!(matches!(err, DocflowError::InvalidStateTransition { .. }));
}

// ==================== Advance / Archive / Duplicate Tests ====================

#[test]
fn test_advance_requires_next_team_members() {
    let mut document = draft();
    let author = with_member(&mut document, Team::Authors);
    publish(&mut document, false, Utc::now()).unwrap();
    record_signature(&mut document, author, SignatureType::Author, Utc::now()).unwrap();

    let err = advance(&mut document).unwrap_err();
    assert!(matches!(err, DocflowError::Validation(_)));
    assert_eq!(document.status, DocumentStatus::AuthorSigned);
}

#[test]
fn test_advance_from_review_is_rejected() {
    let mut document = draft();
    with_member(&mut document, Team::Authors);
    publish(&mut document, false, Utc::now()).unwrap();
    assert!(matches!(
        advance(&mut document),
        Err(DocflowError::InvalidStateTransition { .. })
    ));
}

#[test]
fn test_archive_requires_admin_and_non_draft() {
    let admin = user(UserRole::Admin);
    let manager = user(UserRole::Manager);

    let mut document = draft();
    assert!(matches!(
        archive(&mut document, &admin, Utc::now()),
        Err(DocflowError::InvalidStateTransition { .. })
    ));

    with_member(&mut document, Team::Authors);
    publish(&mut document, false, Utc::now()).unwrap();

    assert!(matches!(
        archive(&mut document, &manager, Utc::now()),
        Err(DocflowError::Forbidden(_))
    ));

    let from = archive(&mut document, &admin, Utc::now()).unwrap();
    assert_eq!(from, DocumentStatus::AuthorReview);
    assert_eq!(document.status, DocumentStatus::Archived);
    assert!(document.archived_at.is_some());

    assert!(archive(&mut document, &admin, Utc::now()).is_err());
}

#[test]
fn test_duplicate_produces_fresh_draft() {
    let mut source = draft();
    let author = with_member(&mut source, Team::Authors);
    source.content.description = "How we buy things".into();
    publish(&mut source, false, Utc::now()).unwrap();
    record_signature(&mut source, author, SignatureType::Author, Utc::now()).unwrap();

    let owner = Uuid::new_v4();
    let copy = duplicate(&source, owner, true);

    assert_ne!(copy.id(), source.id());
    assert_eq!(copy.status, DocumentStatus::Draft);
    assert_eq!(copy.created_by, owner);
    assert_eq!(copy.reference, "PR-001-COPY");
    assert_eq!(copy.title, "Purchasing (Copy)");
    assert_eq!(copy.revision, "1.0");
    assert_eq!(copy.content.description, "How we buy things");
    assert_eq!(
        copy.contributors.find(author).map(|c| c.status),
        Some(ContributorStatus::Joined)
    );
    assert!(copy.published_at.is_none());
    assert!(copy.approved_at.is_none());

    let bare = duplicate(&source, owner, false);
    assert!(bare.contributors.is_empty());
}
