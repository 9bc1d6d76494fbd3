//! Session tokens and per-request identity resolution.
//!
//! The session is an HS256 JWT in an HttpOnly cookie. Every request
//! resolves it back to a [`User`]; any failure along the way (no cookie,
//! bad signature, expired, unknown user, storage error) yields
//! [`Session::Anonymous`].

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;
use tracing::{debug, warn};

use agora_types::api::Claims;
use agora_types::models::User;

use crate::middleware::CurrentUser;
use crate::state::{AppState, AppStateInner};

pub const SESSION_COOKIE: &str = "agora_session";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session lifetime of {0} days gives no valid expiry")]
    Lifetime(i64),
    #[error(transparent)]
    Token(#[from] jsonwebtoken::errors::Error),
}

/// Signing secret and lifetime for session tokens.
#[derive(Clone)]
pub struct SessionConfig {
    secret: String,
    ttl_days: i64,
}

impl SessionConfig {
    pub fn new(secret: impl Into<String>, ttl_days: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl_days,
        }
    }

    pub fn issue(&self, user: &User) -> Result<String, SessionError> {
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            exp: self.expiry()?,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?)
    }

    /// `exp` for a token issued now. Overflow or a pre-epoch instant is an error.
    fn expiry(&self) -> Result<usize, SessionError> {
        chrono::Duration::try_days(self.ttl_days)
            .and_then(|ttl| chrono::Utc::now().checked_add_signed(ttl))
            .and_then(|at| usize::try_from(at.timestamp()).ok())
            .ok_or(SessionError::Lifetime(self.ttl_days))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    Anonymous,
    Authenticated(User),
}

impl Session {
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(user) => Some(user),
        }
    }
}

/// Resolve the session cookie in `jar` to a user.
pub async fn resolve(state: &AppStateInner, jar: &CookieJar) -> Session {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Session::Anonymous;
    };

    let claims = match state.session.verify(cookie.value()) {
        Ok(claims) => claims,
        Err(e) => {
            debug!("Ignoring session token: {}", e);
            return Session::Anonymous;
        }
    };

    let Ok(user_id) = claims.sub.parse::<i64>() else {
        debug!("Ignoring session token with non-numeric subject '{}'", claims.sub);
        return Session::Anonymous;
    };

    match state.db(move |db| db.get_user_by_id(user_id)).await {
        Ok(Some(row)) => Session::Authenticated(row.into()),
        Ok(None) => {
            debug!("Session user {} no longer exists", user_id);
            Session::Anonymous
        }
        Err(e) => {
            warn!("Session lookup for user {} failed: {}", user_id, e);
            Session::Anonymous
        }
    }
}

/// Store a freshly issued token in the jar.
pub fn establish(jar: CookieJar, token: String) -> CookieJar {
    jar.add(
        Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax),
    )
}

/// Drop the session cookie, if the client sent one.
pub fn clear(jar: CookieJar) -> CookieJar {
    if jar.get(SESSION_COOKIE).is_none() {
        return jar;
    }
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

impl FromRequestParts<AppState> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Already resolved by `require_auth` on protected routes.
        if let Some(CurrentUser(user)) = parts.extensions.get::<CurrentUser>() {
            return Ok(Session::Authenticated(user.clone()));
        }

        let jar = CookieJar::from_headers(&parts.headers);
        Ok(resolve(state, &jar).await)
    }
}
