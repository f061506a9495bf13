//! Bearer token gate for protected routes

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Duration;

use super::models::AuthContext;
use crate::api::state::AppState;
use crate::error::{Error, Result};
use crate::session::SessionRepository;
use crate::timeout::with_timeout;
use crate::token::TokenMaker;
use crate::users::UserRepository;

const BEARER: &str = "bearer";

/// Resolves an `Authorization` header into the calling user.
///
/// The token signature is checked first so forged or expired tokens are
/// rejected without a store round trip. The session record is then
/// consulted so revocation takes effect before the token's own expiry.
#[derive(Clone)]
pub struct AuthGate {
    tokens: Arc<TokenMaker>,
    sessions: Arc<dyn SessionRepository>,
    users: Arc<dyn UserRepository>,
    timeout: Duration,
}

impl AuthGate {
    pub fn new(
        tokens: Arc<TokenMaker>,
        sessions: Arc<dyn SessionRepository>,
        users: Arc<dyn UserRepository>,
        timeout: Duration,
    ) -> Self {
        Self {
            tokens,
            sessions,
            users,
            timeout,
        }
    }

    pub async fn authorize(&self, header: Option<&str>) -> Result<AuthContext> {
        let header = header
            .filter(|h| !h.is_empty())
            .ok_or_else(Error::unauthorized)?;

        let fields: Vec<&str> = header.split_whitespace().collect();
        if fields.len() < 2 {
            return Err(Error::unauthorized());
        }

        let scheme = fields[0].to_lowercase();
        if scheme != BEARER {
            return Err(Error::Unauthorized(format!(
                "unsupported authorization type {}",
                scheme
            )));
        }

        let token = fields[1];
        let payload = self.tokens.verify(token)?;

        with_timeout(self.timeout, async {
            let session = self
                .sessions
                .find_by_id(payload.session_id)
                .await?
                .ok_or(Error::InvalidToken)?;

            if session.access_token != token || session.access_expired() || session.is_revoked {
                return Err(Error::InvalidToken);
            }

            let user = self
                .users
                .find_by_id(payload.user_id)
                .await?
                .ok_or(Error::NotFound)?;

            if session.user_id != user.id {
                return Err(Error::InvalidToken);
            }

            Ok(AuthContext { payload, user })
        })
        .await
    }
}

/// Middleware that rejects the request unless it carries a live access token.
/// On success the resolved [`AuthContext`] is available as a request extension.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> std::result::Result<Response, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let context = state.gate.authorize(header).await?;
    tracing::debug!(
        user_id = %context.user.id,
        session_id = %context.payload.session_id,
        "Request authorized"
    );

    req.extensions_mut().insert(context);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password;
    use crate::session::{InMemorySessionRepository, Session};
    use crate::users::{InMemoryUserRepository, User};
    use uuid::Uuid;

    const KEY: &str = "0123456789abcdef0123456789abcdef";

    struct Fixture {
        gate: AuthGate,
        tokens: Arc<TokenMaker>,
        sessions: Arc<InMemorySessionRepository>,
        user: User,
    }

    async fn fixture() -> Fixture {
        let tokens = Arc::new(TokenMaker::new(KEY).unwrap());
        let users = Arc::new(InMemoryUserRepository::new());
        let sessions = Arc::new(InMemorySessionRepository::new());
        let user = users
            .store(User::new(
                "alice".into(),
                "alice@x.com".into(),
                "Alice".into(),
                password::hash_password("pw123456", 4).unwrap(),
                false,
            ))
            .await
            .unwrap();

        let gate = AuthGate::new(
            tokens.clone(),
            sessions.clone(),
            users,
            Duration::from_secs(1),
        );
        Fixture {
            gate,
            tokens,
            sessions,
            user,
        }
    }

    async fn login(f: &Fixture) -> (String, Session) {
        let id = Uuid::new_v4();
        let (access, access_payload) = f
            .tokens
            .issue(id, f.user.id, chrono::Duration::minutes(15))
            .unwrap();
        let (refresh, refresh_payload) = f
            .tokens
            .issue(id, f.user.id, chrono::Duration::hours(24))
            .unwrap();
        let session = Session {
            id,
            user_id: f.user.id,
            access_token: access.clone(),
            refresh_token: refresh,
            access_token_created_at: access_payload.issued_at(),
            access_token_expires_at: access_payload.expires_at(),
            refresh_token_created_at: refresh_payload.issued_at(),
            refresh_token_expires_at: refresh_payload.expires_at(),
            user_agent: String::new(),
            client_ip: String::new(),
            is_revoked: false,
        };
        let session = f.sessions.store(session).await.unwrap();
        (access, session)
    }

    #[tokio::test]
    async fn test_missing_or_short_header() {
        let f = fixture().await;
        assert!(matches!(f.gate.authorize(None).await, Err(Error::Unauthorized(_))));
        assert!(matches!(f.gate.authorize(Some("")).await, Err(Error::Unauthorized(_))));
        assert!(matches!(
            f.gate.authorize(Some("Bearer")).await,
            Err(Error::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_unsupported_scheme_is_named() {
        let f = fixture().await;
        match f.gate.authorize(Some("Basic abc")).await {
            Err(Error::Unauthorized(msg)) => assert_eq!(msg, "unsupported authorization type basic"),
            other => panic!("unexpected: {:?}", other.map(|c| c.user.id)),
        }
    }

    #[tokio::test]
    async fn test_valid_token_resolves_user() {
        let f = fixture().await;
        let (access, _) = login(&f).await;
        let ctx = f
            .gate
            .authorize(Some(&format!("bearer {}", access)))
            .await
            .unwrap();
        assert_eq!(ctx.user.id, f.user.id);
    }

    #[tokio::test]
    async fn test_unknown_session_is_invalid() {
        let f = fixture().await;
        let (access, _) = f
            .tokens
            .issue(Uuid::new_v4(), f.user.id, chrono::Duration::minutes(1))
            .unwrap();
        assert!(matches!(
            f.gate.authorize(Some(&format!("Bearer {}", access))).await,
            Err(Error::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_refresh_token_is_not_an_access_token() {
        let f = fixture().await;
        let (_, session) = login(&f).await;
        assert!(matches!(
            f.gate
                .authorize(Some(&format!("Bearer {}", session.refresh_token)))
                .await,
            Err(Error::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_revoked_session_is_invalid() {
        let f = fixture().await;
        let (access, session) = login(&f).await;
        f.sessions.block(session.id).await.unwrap();
        assert!(matches!(
            f.gate.authorize(Some(&format!("Bearer {}", access))).await,
            Err(Error::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_expired_session_record_is_invalid() {
        let f = fixture().await;
        let (access, mut session) = login(&f).await;
        session.access_token_expires_at = chrono::Utc::now() - chrono::Duration::seconds(1);
        f.sessions.replace(session).await;
        assert!(matches!(
            f.gate.authorize(Some(&format!("Bearer {}", access))).await,
            Err(Error::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_session_owner_mismatch_is_invalid() {
        let f = fixture().await;
        let (access, mut session) = login(&f).await;
        session.user_id = Uuid::new_v4();
        f.sessions.replace(session).await;
        assert!(matches!(
            f.gate.authorize(Some(&format!("Bearer {}", access))).await,
            Err(Error::InvalidToken)
        ));
    }
}
