//! Session integration tests
//!
//! Drive the real HTTP client against the in-process mock API.
//!
//! Run with: cargo test -p integration-tests --test session_tests

use std::time::Duration;

use integration_tests::{seeded_login, unique_registration, TestServer, SEEDED_USERNAME};
use storefront_common::AppError;
use storefront_core::LoginRequest;
use storefront_session::{FileCredentialStore, SessionState, StoreTtl};

// ============================================================================
// Sign-in Tests
// ============================================================================

#[tokio::test]
async fn test_login_and_guarded_call() {
    let server = TestServer::start().await.expect("Failed to start server");
    let client = server.client().unwrap();

    let user = client.login(&seeded_login()).await.unwrap();
    assert_eq!(user.username, SEEDED_USERNAME);
    assert_eq!(client.session().state(), SessionState::Authenticated);

    let favorites = client.favorites().await.unwrap();
    assert!(favorites.is_empty());
    assert_eq!(server.api.refresh_calls(), 0);
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let server = TestServer::start().await.expect("Failed to start server");
    let client = server.client().unwrap();

    let err = client
        .login(&LoginRequest::new("ana@example.com", "wrong-password"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidCredentials));
    assert_eq!(client.session().state(), SessionState::Anonymous);
}

#[tokio::test]
async fn test_register_signs_in() {
    let server = TestServer::start().await.expect("Failed to start server");
    let client = server.client().unwrap();
    let registration = unique_registration();

    let user = client.register(&registration).await.unwrap();
    assert_eq!(user.username, registration.username);
    assert!(client.session().is_authenticated());

    // Same email again
    let other = server.client().unwrap();
    let err = other.register(&registration).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_logout_revokes_refresh_token() {
    let server = TestServer::start().await.expect("Failed to start server");
    let client = server.client().unwrap();

    client.login(&seeded_login()).await.unwrap();
    assert_eq!(server.api.live_refresh_tokens(), 1);

    client.logout().await.unwrap();
    assert_eq!(server.api.live_refresh_tokens(), 0);
    assert_eq!(client.session().state(), SessionState::Anonymous);

    let err = client.favorites().await.unwrap_err();
    assert!(matches!(err, AppError::NotAuthenticated));
}

// ============================================================================
// Renewal Tests
// ============================================================================

#[tokio::test]
async fn test_transparent_renewal() {
    let server = TestServer::start().await.expect("Failed to start server");
    let client = server.client().unwrap();
    client.login(&seeded_login()).await.unwrap();

    server.api.expire_access_tokens();

    let favorites = client.favorites().await.unwrap();
    assert!(favorites.is_empty());
    assert_eq!(server.api.refresh_calls(), 1);
    assert_eq!(client.session().state(), SessionState::Authenticated);

    // The renewed token keeps working without another exchange
    client.favorites().await.unwrap();
    assert_eq!(server.api.refresh_calls(), 1);
}

#[tokio::test]
async fn test_failed_renewal_purges_session() {
    let server = TestServer::start().await.expect("Failed to start server");
    let client = server.client().unwrap();
    client.login(&seeded_login()).await.unwrap();

    server.api.expire_access_tokens();
    server.api.revoke_refresh_tokens();

    let err = client.favorites().await.unwrap_err();
    assert!(matches!(err, AppError::SessionExpired));
    assert!(err.requires_login());

    assert_eq!(client.session().state(), SessionState::Anonymous);
    assert!(client.session().user_info().is_none());
    assert!(client.session().refresh_token().is_none());
    assert_eq!(server.api.refresh_calls(), 1);
}

#[tokio::test]
async fn test_concurrent_denials_renew_once() {
    let server = TestServer::start().await.expect("Failed to start server");
    let client = server.client().unwrap();
    client.login(&seeded_login()).await.unwrap();

    server.api.set_refresh_delay(Duration::from_millis(200));
    server.api.expire_access_tokens();

    let (a, b, c, d) = tokio::join!(
        client.favorites(),
        client.orders(1),
        client.favorites(),
        client.orders(1),
    );

    assert!(a.is_ok());
    assert!(b.is_ok());
    assert!(c.is_ok());
    assert!(d.is_ok());
    assert_eq!(server.api.refresh_calls(), 1);
}

#[tokio::test]
async fn test_concurrent_tasks_renew_once() {
    let server = TestServer::start().await.expect("Failed to start server");
    let client = server.client().unwrap();
    client.login(&seeded_login()).await.unwrap();

    server.api.set_refresh_delay(Duration::from_millis(200));
    server.api.expire_access_tokens();

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.favorites().await })
        })
        .collect();

    for task in tasks {
        assert!(task.await.unwrap().is_ok());
    }
    assert_eq!(server.api.refresh_calls(), 1);
}

#[tokio::test]
async fn test_expired_access_token_is_renewed_before_sending() {
    let server = TestServer::start().await.expect("Failed to start server");
    let client = server.client().unwrap();

    server.api.set_access_ttl(-60);
    client.login(&seeded_login()).await.unwrap();
    server.api.set_access_ttl(900);

    client.favorites().await.unwrap();
    assert_eq!(server.api.refresh_calls(), 1);
}

// ============================================================================
// Persistence Tests
// ============================================================================

#[tokio::test]
async fn test_session_survives_restart() {
    let server = TestServer::start().await.expect("Failed to start server");
    let path = std::env::temp_dir()
        .join(format!("storefront-it-{}", uuid::Uuid::new_v4()))
        .join("credentials.json");
    let ttl = StoreTtl::from(&server.config().unwrap().session);

    {
        let store = FileCredentialStore::open(&path, ttl).unwrap();
        let client = server.client_with_store(store).unwrap();
        client.login(&seeded_login()).await.unwrap();
    }

    // A new process only has the refresh token and user info on disk
    let store = FileCredentialStore::open(&path, ttl).unwrap();
    let client = server.client_with_store(store).unwrap();
    assert_eq!(client.session().state(), SessionState::AccessExpired);
    assert_eq!(
        client.session().user_info().unwrap().username,
        SEEDED_USERNAME
    );

    client.favorites().await.unwrap();
    assert_eq!(server.api.refresh_calls(), 1);
    assert_eq!(client.session().state(), SessionState::Authenticated);

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[tokio::test]
async fn test_logout_in_another_process_ends_session() {
    let server = TestServer::start().await.expect("Failed to start server");
    let path = std::env::temp_dir()
        .join(format!("storefront-it-{}", uuid::Uuid::new_v4()))
        .join("credentials.json");
    let ttl = StoreTtl::from(&server.config().unwrap().session);

    let first = server
        .client_with_store(FileCredentialStore::open(&path, ttl).unwrap())
        .unwrap();
    let second = server
        .client_with_store(FileCredentialStore::open(&path, ttl).unwrap())
        .unwrap();
    assert_eq!(second.session().state(), SessionState::Anonymous);

    first.login(&seeded_login()).await.unwrap();
    assert_eq!(second.session().reconcile(), SessionState::AccessExpired);
    assert!(second.session().is_authenticated());

    first.logout().await.unwrap();
    assert_eq!(second.session().reconcile(), SessionState::Anonymous);
    assert!(!second.session().is_authenticated());

    let err = second.favorites().await.unwrap_err();
    assert!(matches!(err, AppError::NotAuthenticated));

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}
