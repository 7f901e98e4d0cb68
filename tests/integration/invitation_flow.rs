//! Invitation lifecycle against real storage

use crate::common::TestApp;
use crate::common::fixtures::{accept_token, signing};
use crate::{assert_err, assert_ok};
use docflow::DocflowError;
use docflow::core::access::AccessGrant;
use docflow::core::models::{ContributorStatus, InvitationStatus, PermissionLevel, Team};
use docflow::services::{AcceptInvitationRequest, DeclineInvitationRequest, Notification};

#[tokio::test]
async fn test_accepted_invitee_joins_team_and_can_read() {
    let app = TestApp::new().await;
    let owner = app.user("owner@example.com").await;
    let invitee = app.user("invitee@example.com").await;
    let document = app.document(&owner, "SOP-100").await;

    let invitation = assert_ok!(
        app.invite(&owner, document.id(), "Invitee@Example.com", Team::Authors)
            .await
    );
    assert_eq!(invitation.status, InvitationStatus::Pending);
    assert_eq!(invitation.invited_email, "invitee@example.com");
    assert_eq!(invitation.invited_user_id, Some(invitee.id()));

    let (invitation, document) = assert_ok!(
        app.state
            .invitations
            .accept(
                &invitee,
                invitation.id(),
                AcceptInvitationRequest::default(),
                &app.client,
            )
            .await
    );
    assert_eq!(invitation.status, InvitationStatus::Accepted);
    assert!(invitation.accepted_at.is_some());

    let authors = document.contributors.team(Team::Authors);
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0].user_id, invitee.id());
    assert_eq!(authors[0].status, ContributorStatus::Joined);

    let authorized = assert_ok!(
        app.authorize(&invitee, document.id(), PermissionLevel::Read)
            .await
    );
    assert_eq!(
        authorized.grant,
        AccessGrant::Contributor {
            team: Team::Authors
        }
    );
}

#[tokio::test]
async fn test_second_accept_conflicts_without_duplicating_contributor() {
    let app = TestApp::new().await;
    let owner = app.user("owner@example.com").await;
    let invitee = app.user("invitee@example.com").await;
    let document = app.document(&owner, "SOP-101").await;
    let invitation = assert_ok!(
        app.invite(&owner, document.id(), &invitee.email, Team::Verifiers)
            .await
    );

    assert_ok!(
        app.state
            .invitations
            .accept(&invitee, invitation.id(), Default::default(), &app.client)
            .await
    );
    let err = assert_err!(
        app.state
            .invitations
            .accept(&invitee, invitation.id(), Default::default(), &app.client)
            .await
    );
    assert!(matches!(err, DocflowError::Conflict(_)));

    let document = app.reload(document.id()).await;
    assert_eq!(document.contributors.len(), 1);
    assert_eq!(document.team_of(invitee.id()), Some(Team::Verifiers));
}

#[tokio::test]
async fn test_invite_is_gated_by_open_teams() {
    let app = TestApp::new().await;
    let owner = app.user("owner@example.com").await;
    let author = app.user("author@example.com").await;
    let verifier = app.user("verifier@example.com").await;
    let document = app.document(&owner, "SOP-102").await;
    app.join(&owner, document.id(), &author, Team::Authors).await;
    app.join(&owner, document.id(), &verifier, Team::Verifiers)
        .await;

    // Through author review and into verifier review
    let document = app.reload(document.id()).await;
    let document = assert_ok!(
        app.state
            .documents
            .publish(&owner, document, &app.client)
            .await
    );
    let authorized = assert_ok!(
        app.authorize(&author, document.id(), PermissionLevel::Sign)
            .await
    );
    assert_ok!(
        app.state
            .signatures
            .sign(&author, authorized, signing("A"), &app.client)
            .await
    );
    let document = app.reload(document.id()).await;
    let document = assert_ok!(
        app.state
            .documents
            .advance(&owner, document, &app.client)
            .await
    );

    let err = assert_err!(
        app.invite(&owner, document.id(), "late-author@example.com", Team::Authors)
            .await
    );
    assert!(matches!(err, DocflowError::InvalidStateTransition { .. }));

    assert_ok!(
        app.invite(&owner, document.id(), "validator@example.com", Team::Validators)
            .await
    );
}

#[tokio::test]
async fn test_duplicate_pending_invitation_conflicts() {
    let app = TestApp::new().await;
    let owner = app.user("owner@example.com").await;
    let document = app.document(&owner, "SOP-103").await;

    assert_ok!(
        app.invite(&owner, document.id(), "guest@example.com", Team::Authors)
            .await
    );
    let err = assert_err!(
        app.invite(&owner, document.id(), "guest@example.com", Team::Verifiers)
            .await
    );
    assert!(matches!(err, DocflowError::Conflict(_)));
}

#[tokio::test]
async fn test_existing_contributor_cannot_be_invited_again() {
    let app = TestApp::new().await;
    let owner = app.user("owner@example.com").await;
    let author = app.user("author@example.com").await;
    let document = app.document(&owner, "SOP-104").await;
    app.join(&owner, document.id(), &author, Team::Authors).await;

    let err = assert_err!(
        app.invite(&owner, document.id(), &author.email, Team::Validators)
            .await
    );
    assert!(matches!(err, DocflowError::Conflict(_)));
}

#[tokio::test]
async fn test_invalid_email_is_rejected() {
    let app = TestApp::new().await;
    let owner = app.user("owner@example.com").await;
    let document = app.document(&owner, "SOP-105").await;

    let err = assert_err!(
        app.invite(&owner, document.id(), "not-an-email", Team::Authors)
            .await
    );
    assert!(matches!(err, DocflowError::Validation(_)));
}

#[tokio::test]
async fn test_outsider_cannot_invite() {
    let app = TestApp::new().await;
    let owner = app.user("owner@example.com").await;
    let outsider = app.user("outsider@example.com").await;
    let document = app.document(&owner, "SOP-106").await;

    let err = assert_err!(
        app.invite(&outsider, document.id(), "guest@example.com", Team::Authors)
            .await
    );
    assert!(matches!(err, DocflowError::Forbidden(_)));
}

#[tokio::test]
async fn test_token_from_notification_does_not_admit_another_account() {
    let app = TestApp::new().await;
    let owner = app.user("owner@example.com").await;
    let document = app.document(&owner, "SOP-107").await;

    let invitation = assert_ok!(
        app.invite(&owner, document.id(), "personal@example.org", Team::Authors)
            .await
    );
    let sent = app.notifications(1).await;
    let token = sent
        .iter()
        .find(|n| matches!(n, Notification::InvitationCreated { .. }))
        .and_then(accept_token)
        .expect("invitation notification with token");

    // Registered under a different address than the invited one
    let stranger = app.user("work@example.com").await;
    for token in [None, Some(token.clone())] {
        let err = assert_err!(
            app.state
                .invitations
                .accept(
                    &stranger,
                    invitation.id(),
                    AcceptInvitationRequest { token },
                    &app.client,
                )
                .await
        );
        assert!(matches!(err, DocflowError::Forbidden(_)));
    }

    let document = app.reload(document.id()).await;
    assert!(!document.is_contributor(stranger.id()));

    // The addressee registers later and accepts with the same token
    let invitee = app.user("personal@example.org").await;
    let (invitation, document) = assert_ok!(
        app.state
            .invitations
            .accept(
                &invitee,
                invitation.id(),
                AcceptInvitationRequest { token: Some(token) },
                &app.client,
            )
            .await
    );
    assert_eq!(invitation.invited_user_id, Some(invitee.id()));
    assert!(document.is_contributor(invitee.id()));
    assert!(!document.is_contributor(stranger.id()));
}

#[tokio::test]
async fn test_resend_rotates_token() {
    let app = TestApp::new().await;
    let owner = app.user("owner@example.com").await;
    let guest = app.user("guest@example.com").await;
    let document = app.document(&owner, "SOP-108").await;

    let invitation = assert_ok!(
        app.invite(&owner, document.id(), &guest.email, Team::Authors)
            .await
    );
    let first = app
        .notifications(1)
        .await
        .iter()
        .find_map(accept_token)
        .expect("first token");

    let resent = assert_ok!(
        app.state
            .invitations
            .resend(&owner, invitation.id(), &app.client)
            .await
    );
    assert_eq!(resent.resent_count, 1);
    assert!(resent.expires_at >= invitation.expires_at);

    let sent = app.notifications(2).await;
    let second = sent
        .iter()
        .filter(|n| matches!(n, Notification::InvitationResent { .. }))
        .find_map(accept_token)
        .expect("resent token");
    assert_ne!(first, second);

    let err = assert_err!(
        app.state
            .invitations
            .accept(
                &guest,
                invitation.id(),
                AcceptInvitationRequest { token: Some(first) },
                &app.client,
            )
            .await
    );
    assert!(matches!(err, DocflowError::Forbidden(_)));

    let stranger = app.user("other@example.com").await;
    let err = assert_err!(
        app.state
            .invitations
            .accept(
                &stranger,
                invitation.id(),
                AcceptInvitationRequest {
                    token: Some(second.clone()),
                },
                &app.client,
            )
            .await
    );
    assert!(matches!(err, DocflowError::Forbidden(_)));

    let (accepted, _) = assert_ok!(
        app.state
            .invitations
            .accept(
                &guest,
                invitation.id(),
                AcceptInvitationRequest {
                    token: Some(second),
                },
                &app.client,
            )
            .await
    );
    assert_eq!(accepted.status, InvitationStatus::Accepted);
}

#[tokio::test]
async fn test_only_invitee_declines_and_only_inviter_cancels() {
    let app = TestApp::new().await;
    let owner = app.user("owner@example.com").await;
    let invitee = app.user("invitee@example.com").await;
    let stranger = app.user("stranger@example.com").await;
    let document = app.document(&owner, "SOP-109").await;

    let first = assert_ok!(
        app.invite(&owner, document.id(), &invitee.email, Team::Authors)
            .await
    );
    let err = assert_err!(
        app.state
            .invitations
            .decline(&stranger, first.id(), Default::default(), &app.client)
            .await
    );
    assert!(matches!(err, DocflowError::Forbidden(_)));

    let declined = assert_ok!(
        app.state
            .invitations
            .decline(
                &invitee,
                first.id(),
                DeclineInvitationRequest {
                    reason: Some("  On leave  ".to_string()),
                },
                &app.client,
            )
            .await
    );
    assert_eq!(declined.status, InvitationStatus::Declined);
    assert_eq!(declined.decline_reason.as_deref(), Some("On leave"));

    // A declined invitation no longer blocks a fresh one
    let second = assert_ok!(
        app.invite(&owner, document.id(), &invitee.email, Team::Authors)
            .await
    );
    let err = assert_err!(
        app.state
            .invitations
            .cancel(&stranger, second.id(), &app.client)
            .await
    );
    assert!(matches!(err, DocflowError::Forbidden(_)));

    let cancelled = assert_ok!(
        app.state
            .invitations
            .cancel(&owner, second.id(), &app.client)
            .await
    );
    assert_eq!(cancelled.status, InvitationStatus::Cancelled);

    let err = assert_err!(
        app.state
            .invitations
            .accept(&invitee, second.id(), Default::default(), &app.client)
            .await
    );
    assert!(matches!(err, DocflowError::Conflict(_)));

    let mine = assert_ok!(app.state.invitations.list_mine(&invitee).await);
    assert_eq!(mine.len(), 2);
}
