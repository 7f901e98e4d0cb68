//! Access decisions against real storage

use crate::common::TestApp;
use crate::{assert_err, assert_ok};
use docflow::DocflowError;
use docflow::core::access::{AccessGrant, DenyReason};
use docflow::core::models::{ActivityEvent, PermissionLevel, Team, UserRole};
use docflow::services::{
    GrantPermissionRequest, SetRoleRequest, UpdateDocumentRequest, UpdatePermissionRequest,
};
use uuid::Uuid;

fn forbidden_code(err: DocflowError) -> String {
    match err {
        DocflowError::Forbidden(code) => code,
        other => panic!("Expected Forbidden, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unrelated_user_is_denied_every_level() {
    let app = TestApp::new().await;
    let owner = app.user("owner@example.com").await;
    let outsider = app.user("outsider@example.com").await;
    let document = app.document(&owner, "SOP-001").await;

    for level in PermissionLevel::ALL {
        let err = assert_err!(app.authorize(&outsider, document.id(), level).await);
        assert_eq!(forbidden_code(err), "no_document_access");
    }
}

#[tokio::test]
async fn test_denial_is_recorded_in_the_audit_trail() {
    let app = TestApp::new().await;
    let owner = app.user("owner@example.com").await;
    let outsider = app.user("outsider@example.com").await;
    let document = app.document(&owner, "SOP-009").await;

    let err = assert_err!(
        app.authorize(&outsider, document.id(), PermissionLevel::Write)
            .await
    );
    assert_eq!(forbidden_code(err), "no_document_access");

    let denied = app.activity(&outsider, "access_denied", 1).await;
    assert_eq!(denied.len(), 1);
    assert_eq!(denied[0].actor_id, Some(outsider.id()));
    assert_eq!(
        denied[0].event,
        ActivityEvent::AccessDenied {
            document_id: document.id(),
            required: PermissionLevel::Write,
            reason: DenyReason::NoRelationship,
        }
    );

    // Granted decisions leave no denial behind
    assert_ok!(
        app.authorize(&owner, document.id(), PermissionLevel::Admin)
            .await
    );
    assert!(app.activity(&owner, "access_denied", 0).await.is_empty());
}

#[tokio::test]
async fn test_missing_document_is_not_found() {
    let app = TestApp::new().await;
    let user = app.user("someone@example.com").await;

    let err = assert_err!(
        app.authorize(&user, Uuid::new_v4(), PermissionLevel::Read)
            .await
    );
    assert!(matches!(err, DocflowError::NotFound(_)));
}

#[tokio::test]
async fn test_admin_reaches_any_document_at_any_level() {
    let app = TestApp::new().await;
    let owner = app.user("owner@example.com").await;
    let document = app.document(&owner, "SOP-002").await;

    for level in PermissionLevel::ALL {
        let authorized = assert_ok!(app.authorize(&app.admin, document.id(), level).await);
        assert_eq!(authorized.grant, AccessGrant::Admin);
    }
}

#[tokio::test]
async fn test_creator_keeps_full_access_without_contributor_entry() {
    let app = TestApp::new().await;
    let owner = app.user("owner@example.com").await;
    let document = app.document(&owner, "SOP-003").await;
    assert!(!document.is_contributor(owner.id()));

    for level in PermissionLevel::ALL {
        let authorized = assert_ok!(app.authorize(&owner, document.id(), level).await);
        assert_eq!(authorized.grant, AccessGrant::Creator);
    }
}

#[tokio::test]
async fn test_explicit_write_permission_allows_edit() {
    let app = TestApp::new().await;
    let owner = app.user("owner@example.com").await;
    let editor = app.user("editor@example.com").await;
    let document = app.document(&owner, "SOP-004").await;

    let (_, created) = assert_ok!(
        app.state
            .permissions
            .grant(
                &owner,
                &document,
                GrantPermissionRequest {
                    user_id: editor.id(),
                    level: PermissionLevel::Write,
                },
                &app.client,
            )
            .await
    );
    assert!(created);

    let authorized = assert_ok!(
        app.authorize(&editor, document.id(), PermissionLevel::Write)
            .await
    );
    let updated = assert_ok!(
        app.state
            .documents
            .update(
                &editor,
                authorized,
                UpdateDocumentRequest {
                    title: Some("Cleaning procedure".to_string()),
                    ..Default::default()
                },
                &app.client,
            )
            .await
    );
    assert_eq!(updated.title, "Cleaning procedure");
    assert_eq!(updated.version(), document.version() + 1);

    let err = assert_err!(
        app.authorize(&editor, document.id(), PermissionLevel::Admin)
            .await
    );
    assert_eq!(forbidden_code(err), "insufficient_access_level");
}

#[tokio::test]
async fn test_downgraded_permission_stops_writes() {
    let app = TestApp::new().await;
    let owner = app.user("owner@example.com").await;
    let editor = app.user("editor@example.com").await;
    let document = app.document(&owner, "SOP-005").await;

    assert_ok!(
        app.state
            .permissions
            .grant(
                &owner,
                &document,
                GrantPermissionRequest {
                    user_id: editor.id(),
                    level: PermissionLevel::Write,
                },
                &app.client,
            )
            .await
    );
    let permission = assert_ok!(
        app.state
            .permissions
            .update(
                &owner,
                &document,
                editor.id(),
                UpdatePermissionRequest {
                    level: PermissionLevel::Read,
                },
                &app.client,
            )
            .await
    );
    assert_eq!(permission.level, PermissionLevel::Read);

    assert_ok!(
        app.authorize(&editor, document.id(), PermissionLevel::Read)
            .await
    );
    let err = assert_err!(
        app.authorize(&editor, document.id(), PermissionLevel::Write)
            .await
    );
    assert_eq!(forbidden_code(err), "insufficient_access_level");

    assert_ok!(
        app.state
            .permissions
            .revoke(&owner, &document, editor.id(), &app.client)
            .await
    );
    let err = assert_err!(
        app.authorize(&editor, document.id(), PermissionLevel::Read)
            .await
    );
    assert_eq!(forbidden_code(err), "no_document_access");
}

#[tokio::test]
async fn test_contributor_can_sign_but_not_administer() {
    let app = TestApp::new().await;
    let owner = app.user("owner@example.com").await;
    let author = app.user("author@example.com").await;
    let document = app.document(&owner, "SOP-006").await;
    app.join(&owner, document.id(), &author, Team::Authors).await;

    let authorized = assert_ok!(
        app.authorize(&author, document.id(), PermissionLevel::Sign)
            .await
    );
    assert_eq!(
        authorized.grant,
        AccessGrant::Contributor {
            team: Team::Authors
        }
    );

    let err = assert_err!(
        app.authorize(&author, document.id(), PermissionLevel::Admin)
            .await
    );
    assert_eq!(forbidden_code(err), "insufficient_access_level");
}

#[tokio::test]
async fn test_admin_deletes_regardless_of_relationships() {
    let app = TestApp::new().await;
    let owner = app.user("owner@example.com").await;
    let author = app.user("author@example.com").await;
    let document = app.document(&owner, "SOP-007").await;
    app.join(&owner, document.id(), &author, Team::Authors).await;

    let document = app.reload(document.id()).await;
    assert_ok!(
        app.state
            .documents
            .delete(&app.admin, document.clone(), &app.client)
            .await
    );

    let err = assert_err!(
        app.authorize(&owner, document.id(), PermissionLevel::Read)
            .await
    );
    assert!(matches!(err, DocflowError::NotFound(_)));
}

#[tokio::test]
async fn test_delete_requires_manager_role() {
    let app = TestApp::new().await;
    let owner = app.user("owner@example.com").await;
    let document = app.document(&owner, "SOP-008").await;

    let err = assert_err!(
        app.state
            .documents
            .delete(&owner, document.clone(), &app.client)
            .await
    );
    assert_eq!(forbidden_code(err), "manager_role_required");

    let manager = assert_ok!(
        app.state
            .users
            .set_role(
                &app.admin,
                owner.id(),
                SetRoleRequest {
                    role: UserRole::Manager,
                },
                &app.client,
            )
            .await
    );
    assert_ok!(
        app.state
            .documents
            .delete(&manager, document, &app.client)
            .await
    );
}

#[tokio::test]
async fn test_listing_only_shows_related_documents() {
    let app = TestApp::new().await;
    let owner = app.user("owner@example.com").await;
    let reader = app.user("reader@example.com").await;
    let outsider = app.user("outsider@example.com").await;

    let shared = app.document(&owner, "SOP-010").await;
    app.document(&owner, "SOP-011").await;
    assert_ok!(
        app.state
            .permissions
            .grant(
                &owner,
                &shared,
                GrantPermissionRequest {
                    user_id: reader.id(),
                    level: PermissionLevel::Read,
                },
                &app.client,
            )
            .await
    );

    let page = assert_ok!(app.state.documents.list(&owner, 1, 20).await);
    assert_eq!(page.total, 2);

    let page = assert_ok!(app.state.documents.list(&reader, 1, 20).await);
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id(), shared.id());

    let page = assert_ok!(app.state.documents.list(&outsider, 1, 20).await);
    assert_eq!(page.total, 0);

    let page = assert_ok!(app.state.documents.list(&app.admin, 1, 20).await);
    assert_eq!(page.total, 2);
}

#[tokio::test]
async fn test_deactivated_account_loses_its_session() {
    let app = TestApp::new().await;
    let user = app.user("leaver@example.com").await;
    let token = app.token("leaver@example.com").await;

    let authenticated = assert_ok!(app.state.users.authenticate(&token).await);
    assert_eq!(authenticated.id(), user.id());

    assert_ok!(
        app.state
            .users
            .deactivate(&app.admin, user.id(), &app.client)
            .await
    );

    let err = assert_err!(app.state.users.authenticate(&token).await);
    assert!(matches!(err, DocflowError::Unauthorized(code) if code == "ACCOUNT_INACTIVE"));
}
