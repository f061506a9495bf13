//! Session lifecycle properties of the auth service and gate

mod common;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use movie_api::auth::{AuthGate, AuthService, LoginRequest, TokenLifetimes};
use movie_api::password;
use movie_api::session::{ClientInfo, InMemorySessionRepository, SessionRepository};
use movie_api::token::TokenMaker;
use movie_api::users::{InMemoryUserRepository, User, UserRepository};
use movie_api::Error;

struct Harness {
    auth: AuthService,
    gate: AuthGate,
    tokens: Arc<TokenMaker>,
    users: Arc<InMemoryUserRepository>,
    sessions: Arc<InMemorySessionRepository>,
    alice: User,
}

async fn harness() -> Harness {
    let tokens = common::token_maker();
    let users = Arc::new(InMemoryUserRepository::new());
    let sessions = Arc::new(InMemorySessionRepository::new());
    let timeout = Duration::from_secs(2);

    let alice = users
        .store(User::new(
            "alice".into(),
            "alice@x.com".into(),
            "Alice".into(),
            password::hash_password("pw123456", 4).unwrap(),
            false,
        ))
        .await
        .unwrap();

    let auth = AuthService::new(
        users.clone(),
        sessions.clone(),
        tokens.clone(),
        TokenLifetimes {
            access: chrono::Duration::minutes(15),
            refresh: chrono::Duration::hours(24),
        },
        timeout,
    );
    let gate = AuthGate::new(tokens.clone(), sessions.clone(), users.clone(), timeout);

    Harness {
        auth,
        gate,
        tokens,
        users,
        sessions,
        alice,
    }
}

fn laptop() -> ClientInfo {
    ClientInfo {
        user_agent: "Firefox".into(),
        client_ip: "192.168.0.10".into(),
    }
}

fn phone() -> ClientInfo {
    ClientInfo {
        user_agent: "Safari Mobile".into(),
        client_ip: "192.168.0.20".into(),
    }
}

fn credentials(username: &str, password: &str) -> LoginRequest {
    LoginRequest {
        username: username.into(),
        password: password.into(),
    }
}

fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

#[tokio::test]
async fn test_authenticate_succeeds_iff_hash_matches() {
    let h = harness().await;

    assert!(h.auth.authenticate("alice", "pw123456").await.is_ok());

    for (login, pw) in [("alice", "pw1234567"), ("alice", ""), ("alicia", "pw123456")] {
        let err = h.auth.authenticate(login, pw).await.unwrap_err();
        assert!(matches!(err, Error::IncorrectCredential), "{login}/{pw}");
    }
}

#[tokio::test]
async fn test_login_issues_pair_sharing_session_id() {
    let h = harness().await;
    let response = h.auth.login(credentials("alice", "pw123456"), &laptop()).await.unwrap();

    let access = h.tokens.verify(&response.access_token).unwrap();
    let refresh = h.tokens.verify(&response.refresh_token).unwrap();
    assert_eq!(access.session_id, response.session_id);
    assert_eq!(refresh.session_id, response.session_id);
    assert_eq!(access.user_id, h.alice.id);
    assert!(response.access_token_expires_at < response.refresh_token_expires_at);

    let stored = h.sessions.find_by_id(response.session_id).await.unwrap().unwrap();
    assert_eq!(stored.user_agent, "Firefox");
    assert_eq!(stored.client_ip, "192.168.0.10");
    assert!(!stored.is_revoked);
}

#[tokio::test]
async fn test_second_login_same_device_keeps_one_row() {
    let h = harness().await;
    let first = h.auth.login(credentials("alice", "pw123456"), &laptop()).await.unwrap();
    let second = h.auth.login(credentials("alice", "pw123456"), &laptop()).await.unwrap();

    assert!(h.sessions.find_by_id(first.session_id).await.unwrap().is_none());
    assert!(h.sessions.find_by_id(second.session_id).await.unwrap().is_some());
    assert_eq!(h.sessions.len().await, 1);

    assert!(matches!(
        h.gate.authorize(Some(&bearer(&first.access_token))).await,
        Err(Error::InvalidToken)
    ));
}

#[tokio::test]
async fn test_logins_from_different_devices_coexist() {
    let h = harness().await;
    let laptop_login = h.auth.login(credentials("alice", "pw123456"), &laptop()).await.unwrap();
    let phone_login = h.auth.login(credentials("alice", "pw123456"), &phone()).await.unwrap();

    assert_eq!(h.sessions.len().await, 2);
    for token in [&laptop_login.access_token, &phone_login.access_token] {
        assert!(h.gate.authorize(Some(&bearer(token))).await.is_ok());
    }
}

#[tokio::test]
async fn test_revocation_beats_token_expiry() {
    let h = harness().await;
    let response = h.auth.login(credentials("alice", "pw123456"), &laptop()).await.unwrap();
    let header = bearer(&response.access_token);
    assert!(h.gate.authorize(Some(&header)).await.is_ok());

    h.auth.revoke_session(response.session_id).await.unwrap();

    // The token itself is still within its lifetime
    assert!(h.tokens.verify(&response.access_token).is_ok());
    assert!(matches!(
        h.gate.authorize(Some(&header)).await,
        Err(Error::InvalidToken)
    ));

    let payload = h.tokens.verify(&response.refresh_token).unwrap();
    assert!(matches!(
        h.auth.verify_session(&payload, &response.refresh_token).await,
        Err(Error::SessionRevoked)
    ));
}

#[tokio::test]
async fn test_verify_session_distinct_failures() {
    let h = harness().await;
    let response = h.auth.login(credentials("alice", "pw123456"), &laptop()).await.unwrap();
    let payload = h.tokens.verify(&response.refresh_token).unwrap();
    let original = h.sessions.find_by_id(response.session_id).await.unwrap().unwrap();

    h.auth
        .verify_session(&payload, &response.refresh_token)
        .await
        .unwrap();

    // Presented refresh token differs from the stored one
    assert!(matches!(
        h.auth.verify_session(&payload, &response.access_token).await,
        Err(Error::InvalidToken)
    ));

    // Refresh lifetime over
    let mut expired = original.clone();
    expired.refresh_token_expires_at = Utc::now() - chrono::Duration::seconds(1);
    h.sessions.replace(expired).await;
    assert!(matches!(
        h.auth.verify_session(&payload, &response.refresh_token).await,
        Err(Error::SessionExpired)
    ));

    // Revoked
    let mut revoked = original.clone();
    revoked.is_revoked = true;
    h.sessions.replace(revoked).await;
    assert!(matches!(
        h.auth.verify_session(&payload, &response.refresh_token).await,
        Err(Error::SessionRevoked)
    ));

    // Session owned by someone else
    let bob = h
        .users
        .store(User::new(
            "bobby".into(),
            "bob@x.com".into(),
            "Bob".into(),
            password::hash_password("pw123456", 4).unwrap(),
            false,
        ))
        .await
        .unwrap();
    let mut foreign = original.clone();
    foreign.user_id = bob.id;
    h.sessions.replace(foreign).await;
    assert!(matches!(
        h.auth.verify_session(&payload, &response.refresh_token).await,
        Err(Error::InvalidToken)
    ));

    // Session gone
    h.sessions.delete(original.id).await.unwrap();
    assert!(matches!(
        h.auth.verify_session(&payload, &response.refresh_token).await,
        Err(Error::NotFound)
    ));
}

#[tokio::test]
async fn test_renewal_replaces_session() {
    let h = harness().await;
    let first = h.auth.login(credentials("alice", "pw123456"), &laptop()).await.unwrap();
    let renewed = h.auth.renew(&first.refresh_token, &phone()).await.unwrap();

    assert_ne!(renewed.session_id, first.session_id);
    assert!(h.sessions.find_by_id(first.session_id).await.unwrap().is_none());
    assert!(h.gate.authorize(Some(&bearer(&renewed.access_token))).await.is_ok());
}

#[tokio::test]
async fn test_renew_rejects_expired_refresh_token() {
    let h = harness().await;
    let response = h.auth.login(credentials("alice", "pw123456"), &laptop()).await.unwrap();

    let (stale, _) = h
        .tokens
        .issue(response.session_id, h.alice.id, chrono::Duration::seconds(-5))
        .unwrap();
    assert!(matches!(
        h.auth.renew(&stale, &laptop()).await,
        Err(Error::ExpiredToken)
    ));
}

#[tokio::test]
async fn test_logout_of_unknown_session() {
    let h = harness().await;
    assert!(matches!(
        h.auth.logout(uuid::Uuid::new_v4()).await,
        Err(Error::NotFound)
    ));
}
