//! Request extractors that hand each handler its own session context.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use super::controller::Page;
use super::{SessionHandle, SESSION_COOKIE};
use crate::errors::AppError;
use crate::models::user::SignedInUser;
use crate::state::AppState;

fn session_id(parts: &Parts) -> Option<Uuid> {
    CookieJar::from_headers(&parts.headers)
        .get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

/// The caller's session if its cookie names a live one. Never creates one;
/// only a successful login does.
pub struct ExistingSession(pub Option<(Uuid, SessionHandle)>);

#[async_trait]
impl FromRequestParts<AppState> for ExistingSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let Some(id) = session_id(parts) else {
            return Ok(Self(None));
        };
        Ok(Self(state.sessions.get(id).await.map(|handle| (id, handle))))
    }
}

/// A session with a signed-in user. Rejects with `Unauthorized` otherwise.
pub struct SignedIn {
    pub handle: SessionHandle,
    pub user: SignedInUser,
}

impl SignedIn {
    /// Moves the page controller to the page whose action is being used.
    pub async fn enter(&self, page: Page) -> Result<(), AppError> {
        self.handle.lock().await.navigate(page).map(|_| ())
    }
}

#[async_trait]
impl FromRequestParts<AppState> for SignedIn {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let id = session_id(parts).ok_or(AppError::Unauthorized)?;
        let handle = state.sessions.get(id).await.ok_or(AppError::Unauthorized)?;
        let user = handle
            .lock()
            .await
            .user
            .clone()
            .ok_or(AppError::Unauthorized)?;
        Ok(Self { handle, user })
    }
}

/// A signed-in session whose role is Admin.
pub struct AdminSession(pub SignedIn);

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let signed_in = SignedIn::from_request_parts(parts, state).await?;
        if !signed_in.user.is_admin() {
            tracing::warn!(
                "User '{}' attempted an admin action",
                signed_in.user.username
            );
            return Err(AppError::Forbidden);
        }
        Ok(Self(signed_in))
    }
}
