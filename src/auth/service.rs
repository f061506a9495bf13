//! Session lifecycle rules: login, renewal, verification and revocation

use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use super::models::{AuthResponse, LoginRequest};
use crate::error::{Error, Result};
use crate::password;
use crate::session::{ClientInfo, Session, SessionRepository};
use crate::timeout::with_timeout;
use crate::token::{Payload, TokenMaker};
use crate::users::{User, UserProfile, UserRepository};

/// Lifetimes of the two tokens of a session
#[derive(Debug, Clone, Copy)]
pub struct TokenLifetimes {
    pub access: chrono::Duration,
    pub refresh: chrono::Duration,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    tokens: Arc<TokenMaker>,
    lifetimes: TokenLifetimes,
    timeout: Duration,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        tokens: Arc<TokenMaker>,
        lifetimes: TokenLifetimes,
        timeout: Duration,
    ) -> Self {
        Self {
            users,
            sessions,
            tokens,
            lifetimes,
            timeout,
        }
    }

    /// Resolve an account by username or email and check its password.
    ///
    /// Unknown accounts and wrong passwords fail the same way.
    pub async fn authenticate(&self, login: &str, password: &str) -> Result<User> {
        let user = with_timeout(
            self.timeout,
            self.users.find_by_username_or_email(login, login),
        )
        .await?
        .ok_or(Error::IncorrectCredential)?;

        let matches =
            password::verify_password_blocking(password.to_string(), user.password_hash.clone())
                .await?;
        if !matches {
            return Err(Error::IncorrectCredential);
        }
        Ok(user)
    }

    pub async fn create_session(&self, session: Session) -> Result<Session> {
        with_timeout(self.timeout, self.sessions.store(session)).await
    }

    /// Check that a refresh token may still be exchanged for a new pair
    pub async fn verify_session(&self, payload: &Payload, refresh_token: &str) -> Result<()> {
        with_timeout(self.timeout, async {
            let session = self
                .sessions
                .find_by_id(payload.session_id)
                .await?
                .ok_or(Error::NotFound)?;

            if session.refresh_token != refresh_token {
                return Err(Error::InvalidToken);
            }
            if session.refresh_expired() {
                return Err(Error::SessionExpired);
            }
            if session.is_revoked {
                return Err(Error::SessionRevoked);
            }

            let user = self
                .users
                .find_by_id(payload.user_id)
                .await?
                .ok_or(Error::NotFound)?;

            if session.user_id != user.id {
                return Err(Error::InvalidToken);
            }
            Ok(())
        })
        .await
    }

    /// Revoke a session. Rows whose refresh token already expired are deleted.
    pub async fn revoke_session(&self, session_id: Uuid) -> Result<()> {
        with_timeout(self.timeout, async {
            let session = self
                .sessions
                .find_by_id(session_id)
                .await?
                .ok_or(Error::NotFound)?;

            if session.refresh_expired() {
                self.sessions.delete(session.id).await
            } else {
                self.sessions.block(session.id).await
            }
        })
        .await?;

        tracing::info!(session_id = %session_id, "Session revoked");
        Ok(())
    }

    /// Drop earlier sessions of the same user on the same device. Never fails.
    pub async fn delete_old_session(&self, session: &Session) {
        let device = session.device();
        match with_timeout(self.timeout, self.sessions.delete_matching(&device)).await {
            Ok(0) => {}
            Ok(removed) => {
                tracing::debug!(user_id = %device.user_id, removed, "Replaced previous session")
            }
            Err(e) => {
                tracing::warn!(user_id = %device.user_id, error = %e, "Failed to delete old session")
            }
        }
    }

    /// Mint a token pair under a fresh session id and persist it
    pub async fn issue_session(&self, user: &User, client: &ClientInfo) -> Result<AuthResponse> {
        let session_id = Uuid::new_v4();
        let (access_token, access) = self
            .tokens
            .issue(session_id, user.id, self.lifetimes.access)?;
        let (refresh_token, refresh) = self
            .tokens
            .issue(session_id, user.id, self.lifetimes.refresh)?;

        let session = Session {
            id: session_id,
            user_id: user.id,
            access_token,
            refresh_token,
            access_token_created_at: access.issued_at(),
            access_token_expires_at: access.expires_at(),
            refresh_token_created_at: refresh.issued_at(),
            refresh_token_expires_at: refresh.expires_at(),
            user_agent: client.user_agent.clone(),
            client_ip: client.client_ip.clone(),
            is_revoked: false,
        };

        self.delete_old_session(&session).await;
        let session = self.create_session(session).await?;

        tracing::info!(user_id = %user.id, session_id = %session.id, "Session issued");

        Ok(AuthResponse {
            session_id: session.id,
            access_token: session.access_token,
            access_token_expires_at: session.access_token_expires_at,
            refresh_token: session.refresh_token,
            refresh_token_expires_at: session.refresh_token_expires_at,
            user: UserProfile::from(user),
        })
    }

    pub async fn login(&self, request: LoginRequest, client: &ClientInfo) -> Result<AuthResponse> {
        let user = self.authenticate(&request.username, &request.password).await?;
        self.issue_session(&user, client).await
    }

    /// Exchange a refresh token for a new pair. The renewed session is retired.
    pub async fn renew(&self, refresh_token: &str, client: &ClientInfo) -> Result<AuthResponse> {
        let payload = self.tokens.verify(refresh_token)?;
        self.verify_session(&payload, refresh_token).await?;

        let user = with_timeout(self.timeout, self.users.find_by_id(payload.user_id))
            .await?
            .ok_or(Error::NotFound)?;

        let response = self.issue_session(&user, client).await?;

        if let Err(e) = with_timeout(self.timeout, self.sessions.delete(payload.session_id)).await {
            tracing::warn!(session_id = %payload.session_id, error = %e, "Failed to retire renewed session");
        }
        Ok(response)
    }

    pub async fn logout(&self, session_id: Uuid) -> Result<()> {
        self.revoke_session(session_id).await
    }

    /// Remove sessions whose refresh token expired before now
    pub async fn prune_sessions(&self) -> Result<u64> {
        let removed =
            with_timeout(self.timeout, self.sessions.delete_expired(chrono::Utc::now())).await?;
        tracing::info!(removed, "Pruned expired sessions");
        Ok(removed)
    }
}
