//! Signing workflow from draft to approval

use crate::common::TestApp;
use crate::common::fixtures::signing;
use crate::{assert_err, assert_ok};
use docflow::DocflowError;
use docflow::config::Config;
use docflow::core::models::{
    ContributorStatus, Document, DocumentStatus, PermissionLevel, SignatureType, Team, User,
};
use docflow::services::{
    DuplicateDocumentRequest, Notification, SignDocumentRequest, UpdateDocumentRequest,
};

async fn sign(app: &TestApp, user: &User, document: &Document) -> docflow::Result<Document> {
    let authorized = app
        .authorize(user, document.id(), PermissionLevel::Sign)
        .await?;
    let (signature, document) = app
        .state
        .signatures
        .sign(user, authorized, signing(&user.name), &app.client)
        .await?;
    assert_eq!(signature.user_id, user.id());
    Ok(document)
}

fn assert_transition_refused(err: DocflowError, expected: DocumentStatus) {
    match err {
        DocflowError::InvalidStateTransition { status, .. } => assert_eq!(status, expected),
        other => panic!("Expected InvalidStateTransition, got {:?}", other),
    }
}

#[tokio::test]
async fn test_document_moves_from_draft_to_approved() {
    let app = TestApp::new().await;
    let owner = app.user("owner@example.com").await;
    let author = app.user("author@example.com").await;
    let verifier = app.user("verifier@example.com").await;
    let validator = app.user("validator@example.com").await;

    let document = app.document(&owner, "SOP-200").await;
    app.join(&owner, document.id(), &author, Team::Authors).await;
    app.join(&owner, document.id(), &verifier, Team::Verifiers)
        .await;
    app.join(&owner, document.id(), &validator, Team::Validators)
        .await;

    let document = app.reload(document.id()).await;
    let document = assert_ok!(
        app.state
            .documents
            .publish(&owner, document, &app.client)
            .await
    );
    assert_eq!(document.status, DocumentStatus::AuthorReview);
    assert!(document.published_at.is_some());
    assert_eq!(
        document.contributors.team(Team::Authors)[0].status,
        ContributorStatus::Pending
    );

    let document = assert_ok!(sign(&app, &author, &document).await);
    assert_eq!(document.status, DocumentStatus::AuthorSigned);

    let document = assert_ok!(
        app.state
            .documents
            .advance(&owner, document, &app.client)
            .await
    );
    assert_eq!(document.status, DocumentStatus::VerifierReview);

    let document = assert_ok!(sign(&app, &verifier, &document).await);
    assert_eq!(document.status, DocumentStatus::VerifierSigned);

    let document = assert_ok!(
        app.state
            .documents
            .advance(&owner, document, &app.client)
            .await
    );
    assert_eq!(document.status, DocumentStatus::ValidatorReview);

    let document = assert_ok!(sign(&app, &validator, &document).await);
    assert_eq!(document.status, DocumentStatus::Approved);
    assert!(document.approved_at.is_some());

    let signatures = assert_ok!(app.state.signatures.list(&document).await);
    let mut kinds: Vec<SignatureType> = signatures.iter().map(|s| s.signature_type).collect();
    kinds.sort_by_key(|kind| kind.as_str());
    assert_eq!(
        kinds,
        vec![
            SignatureType::Author,
            SignatureType::Validator,
            SignatureType::Verifier
        ]
    );

    // Three invitations, two publish notices, two stage openings, one approval
    let sent = app.notifications(8).await;
    let approved = sent
        .iter()
        .find_map(|n| match n {
            Notification::DocumentApproved { recipients, .. } => Some(recipients.clone()),
            _ => None,
        })
        .expect("approval notification");
    for user in [&owner, &author, &verifier, &validator] {
        assert!(approved.contains(&user.id()));
    }
}

#[tokio::test]
async fn test_approved_document_never_moves_back() {
    let app = TestApp::new().await;
    let owner = app.user("owner@example.com").await;
    let author = app.user("author@example.com").await;
    let verifier = app.user("verifier@example.com").await;
    let validator = app.user("validator@example.com").await;

    let document = app.document(&owner, "SOP-201").await;
    app.join(&owner, document.id(), &author, Team::Authors).await;
    app.join(&owner, document.id(), &verifier, Team::Verifiers)
        .await;
    app.join(&owner, document.id(), &validator, Team::Validators)
        .await;

    let mut document = app.reload(document.id()).await;
    document = assert_ok!(
        app.state
            .documents
            .publish(&owner, document, &app.client)
            .await
    );
    for signer in [&author, &verifier] {
        document = assert_ok!(sign(&app, signer, &document).await);
        document = assert_ok!(
            app.state
                .documents
                .advance(&owner, document, &app.client)
                .await
        );
    }
    document = assert_ok!(sign(&app, &validator, &document).await);
    assert_eq!(document.status, DocumentStatus::Approved);

    let err = assert_err!(
        app.state
            .documents
            .publish(&owner, document.clone(), &app.client)
            .await
    );
    assert_transition_refused(err, DocumentStatus::Approved);

    let err = assert_err!(
        app.state
            .documents
            .advance(&owner, document.clone(), &app.client)
            .await
    );
    assert_transition_refused(err, DocumentStatus::Approved);

    let err = assert_err!(
        app.state
            .documents
            .archive(&owner, document.clone(), &app.client)
            .await
    );
    assert!(matches!(err, DocflowError::Forbidden(code) if code == "admin_required"));

    let archived = assert_ok!(
        app.state
            .documents
            .archive(&app.admin, document, &app.client)
            .await
    );
    assert_eq!(archived.status, DocumentStatus::Archived);
    assert!(archived.archived_at.is_some());

    let err = assert_err!(
        app.state
            .documents
            .archive(&app.admin, archived, &app.client)
            .await
    );
    assert_transition_refused(err, DocumentStatus::Archived);
}

#[tokio::test]
async fn test_content_is_frozen_after_publish() {
    let app = TestApp::new().await;
    let owner = app.user("owner@example.com").await;
    let document = app.document(&owner, "SOP-202").await;

    let document = assert_ok!(
        app.state
            .documents
            .publish(&owner, document, &app.client)
            .await
    );
    assert_eq!(document.status, DocumentStatus::AuthorReview);

    let authorized = assert_ok!(
        app.authorize(&owner, document.id(), PermissionLevel::Write)
            .await
    );
    let err = assert_err!(
        app.state
            .documents
            .update(
                &owner,
                authorized,
                UpdateDocumentRequest {
                    title: Some("Rewritten".to_string()),
                    ..Default::default()
                },
                &app.client,
            )
            .await
    );
    assert_transition_refused(err, DocumentStatus::AuthorReview);

    assert_eq!(app.reload(document.id()).await.title, document.title);
}

#[tokio::test]
async fn test_signer_cannot_sign_twice_for_the_same_team() {
    let app = TestApp::new().await;
    let owner = app.user("owner@example.com").await;
    let first = app.user("first@example.com").await;
    let second = app.user("second@example.com").await;

    let document = app.document(&owner, "SOP-203").await;
    app.join(&owner, document.id(), &first, Team::Authors).await;
    app.join(&owner, document.id(), &second, Team::Authors).await;
    let document = app.reload(document.id()).await;
    let document = assert_ok!(
        app.state
            .documents
            .publish(&owner, document, &app.client)
            .await
    );

    let document = assert_ok!(sign(&app, &first, &document).await);
    assert_eq!(document.status, DocumentStatus::AuthorReview);

    let err = assert_err!(sign(&app, &first, &document).await);
    assert!(matches!(err, DocflowError::Conflict(_)));

    let document = assert_ok!(sign(&app, &second, &document).await);
    assert_eq!(document.status, DocumentStatus::AuthorSigned);
    assert_eq!(
        assert_ok!(app.state.signatures.list(&document).await).len(),
        2
    );
}

#[tokio::test]
async fn test_only_the_current_team_signs() {
    let app = TestApp::new().await;
    let owner = app.user("owner@example.com").await;
    let author = app.user("author@example.com").await;
    let verifier = app.user("verifier@example.com").await;

    let document = app.document(&owner, "SOP-204").await;
    app.join(&owner, document.id(), &author, Team::Authors).await;
    app.join(&owner, document.id(), &verifier, Team::Verifiers)
        .await;

    // Nothing to sign while drafting
    let document = app.reload(document.id()).await;
    let err = assert_err!(sign(&app, &author, &document).await);
    assert_transition_refused(err, DocumentStatus::Draft);

    let document = assert_ok!(
        app.state
            .documents
            .publish(&owner, document, &app.client)
            .await
    );

    let err = assert_err!(sign(&app, &verifier, &document).await);
    assert!(matches!(err, DocflowError::Forbidden(code) if code == "not_in_signing_team"));

    let authorized = assert_ok!(
        app.authorize(&verifier, document.id(), PermissionLevel::Sign)
            .await
    );
    let err = assert_err!(
        app.state
            .signatures
            .sign(
                &verifier,
                authorized,
                SignDocumentRequest {
                    signature_type: Some(SignatureType::Verifier),
                    signature_data: "V".to_string(),
                    comments: None,
                },
                &app.client,
            )
            .await
    );
    assert_transition_refused(err, DocumentStatus::AuthorReview);

    let authorized = assert_ok!(
        app.authorize(&author, document.id(), PermissionLevel::Sign)
            .await
    );
    let err = assert_err!(
        app.state
            .signatures
            .sign(&author, authorized, signing("   "), &app.client)
            .await
    );
    assert!(matches!(err, DocflowError::Validation(_)));
}

#[tokio::test]
async fn test_advance_needs_a_next_team() {
    let app = TestApp::new().await;
    let owner = app.user("owner@example.com").await;
    let author = app.user("author@example.com").await;

    let document = app.document(&owner, "SOP-205").await;
    app.join(&owner, document.id(), &author, Team::Authors).await;
    let document = app.reload(document.id()).await;
    let document = assert_ok!(
        app.state
            .documents
            .publish(&owner, document, &app.client)
            .await
    );

    let err = assert_err!(
        app.state
            .documents
            .advance(&owner, document.clone(), &app.client)
            .await
    );
    assert_transition_refused(err, DocumentStatus::AuthorReview);

    let document = assert_ok!(sign(&app, &author, &document).await);
    let err = assert_err!(
        app.state
            .documents
            .advance(&owner, document, &app.client)
            .await
    );
    assert!(matches!(err, DocflowError::Validation(_)));
}

#[tokio::test]
async fn test_strict_publish_requires_authors() {
    let mut config = Config::default();
    config.app.collaboration.require_authors_to_publish = true;
    let app = TestApp::with_config(config).await;
    let owner = app.user("owner@example.com").await;
    let document = app.document(&owner, "SOP-206").await;

    let err = assert_err!(
        app.state
            .documents
            .publish(&owner, document.clone(), &app.client)
            .await
    );
    assert!(matches!(err, DocflowError::Validation(_)));
    assert_eq!(
        app.reload(document.id()).await.status,
        DocumentStatus::Draft
    );
}

#[tokio::test]
async fn test_duplicate_starts_a_fresh_draft() {
    let app = TestApp::new().await;
    let owner = app.user("owner@example.com").await;
    let author = app.user("author@example.com").await;
    let reader = app.user("reader@example.com").await;

    let source = app.document(&owner, "SOP-207").await;
    app.join(&owner, source.id(), &author, Team::Authors).await;
    let source = app.reload(source.id()).await;
    let source = assert_ok!(
        app.state
            .documents
            .publish(&owner, source, &app.client)
            .await
    );
    let source = assert_ok!(sign(&app, &author, &source).await);

    let copy = assert_ok!(
        app.state
            .documents
            .duplicate(
                &reader,
                &source,
                DuplicateDocumentRequest {
                    keep_contributors: true,
                },
                &app.client,
            )
            .await
    );
    assert_ne!(copy.id(), source.id());
    assert_eq!(copy.status, DocumentStatus::Draft);
    assert_eq!(copy.created_by, reader.id());
    assert_eq!(copy.reference, "SOP-207-COPY");
    assert_eq!(
        copy.contributors.team(Team::Authors)[0].status,
        ContributorStatus::Joined
    );
    assert!(assert_ok!(app.state.signatures.list(&copy).await).is_empty());

    let bare = assert_ok!(
        app.state
            .documents
            .duplicate(&reader, &source, Default::default(), &app.client)
            .await
    );
    assert!(bare.contributors.is_empty());
}
