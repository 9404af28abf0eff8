/*!
 * Session-cookie authentication.
 *
 * Login stores a random token in [`SessionStore`] and hands it to the
 * browser as an HttpOnly cookie. Every business route sits behind
 * [`require_session`], which resolves the cookie to a [`CurrentUser`]
 * request extension.
 */

pub mod password;
pub mod session;

pub use password::{hash_password, verify_password};
pub use session::{Session, SessionStore};

use crate::{errors::ServiceError, AppState};
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Authenticated caller, inserted by [`require_session`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: Uuid,
    pub token: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| ServiceError::Unauthorized("Not authenticated".to_string()))
    }
}

/// Reads the session token out of the `Cookie` header.
pub fn session_token_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value carrying a fresh session token.
pub fn session_cookie(
    cookie_name: &str,
    token: &str,
    max_age_secs: u64,
    secure: bool,
) -> Result<HeaderValue, ServiceError> {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        cookie_name, token, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).map_err(|e| ServiceError::InternalError(e.to_string()))
}

/// `Set-Cookie` value that makes the browser drop the session cookie.
pub fn clear_session_cookie(cookie_name: &str, secure: bool) -> Result<HeaderValue, ServiceError> {
    session_cookie(cookie_name, "", 0, secure)
}

/// Rejects requests without a live session with 401.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    let token = session_token_from_headers(request.headers(), &state.config.session_cookie_name)
        .ok_or_else(|| ServiceError::Unauthorized("Not authenticated".to_string()))?;

    let session = state
        .sessions
        .get(&token)
        .ok_or_else(|| ServiceError::Unauthorized("Session expired or invalid".to_string()))?;

    request.extensions_mut().insert(CurrentUser {
        user_id: session.user_id,
        token,
    });

    Ok(next.run(request).await)
}

/// Extension methods for Router to add the session gate
pub trait AuthRouterExt {
    fn with_session(self, state: AppState) -> Self;
}

impl<S> AuthRouterExt for axum::Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_session(self, state: AppState) -> Self {
        self.layer(axum::middleware::from_fn_with_state(state, require_session))
    }
}
