use axum::{
    extract::{Path, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use super::controller::{available_pages, Page};
use super::credentials;
use super::extract::{ExistingSession, SignedIn};
use super::{SessionState, SESSION_COOKIE};
use crate::errors::AppError;
use crate::models::user::{Role, SignedInUser};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct NavigateRequest {
    pub page: Page,
}

#[derive(Serialize)]
pub struct SessionView {
    pub page: Page,
    pub title: &'static str,
    pub username: Option<String>,
    pub role: Option<Role>,
    pub available_pages: Vec<Page>,
    pub resume_count: usize,
    pub download_count: usize,
}

impl From<&SessionState> for SessionView {
    fn from(state: &SessionState) -> Self {
        SessionView {
            page: state.page,
            title: state.page.title(),
            username: state.user.as_ref().map(|u| u.username.clone()),
            role: state.user.as_ref().map(|u| u.role),
            available_pages: state.user.as_ref().map(available_pages).unwrap_or_default(),
            resume_count: state.resumes.len(),
            download_count: state.downloads.len(),
        }
    }
}

impl SessionView {
    fn logged_out() -> Self {
        SessionView {
            page: Page::LoggedOut,
            title: Page::LoggedOut.title(),
            username: None,
            role: None,
            available_pages: Vec::new(),
            resume_count: 0,
            download_count: 0,
        }
    }
}

fn session_cookie(id: Uuid) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// POST /api/v1/auth/login
///
/// Checks the password against the caller's session users, or the seeded
/// accounts when there is no session yet. The session and its cookie are
/// created only once the password checks out.
pub async fn handle_login(
    State(state): State<AppState>,
    ExistingSession(existing): ExistingSession,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<SessionView>), AppError> {
    let credential = match &existing {
        Some((_, handle)) => handle.lock().await.users.get(&req.username).cloned(),
        None => state.seed_users.get(&req.username).cloned(),
    };

    let password = req.password;
    let verified: Option<SignedInUser> = tokio::task::spawn_blocking(move || {
        credential.and_then(|c| credentials::verify(&c, &password))
    })
    .await
    .map_err(|e| AppError::Internal(e.into()))?;

    let Some(user) = verified else {
        warn!("Failed login for '{}'", req.username);
        return Err(AppError::Unauthorized);
    };

    let (id, handle) = match existing {
        Some(session) => session,
        None => state.sessions.create(&state.seed_users).await,
    };
    info!("User '{}' signed in as {:?}", user.username, user.role);
    let mut session = handle.lock().await;
    session.sign_in(user);
    let view = SessionView::from(&*session);
    Ok((jar.add(session_cookie(id)), Json(view)))
}

/// POST /api/v1/auth/logout
pub async fn handle_logout(signed_in: SignedIn) -> Json<SessionView> {
    let mut state = signed_in.handle.lock().await;
    state.sign_out();
    info!("User '{}' signed out", signed_in.user.username);
    Json(SessionView::from(&*state))
}

/// GET /api/v1/session
pub async fn handle_get_session(ExistingSession(existing): ExistingSession) -> Json<SessionView> {
    match existing {
        Some((_, handle)) => Json(SessionView::from(&*handle.lock().await)),
        None => Json(SessionView::logged_out()),
    }
}

/// POST /api/v1/navigate
pub async fn handle_navigate(
    signed_in: SignedIn,
    Json(req): Json<NavigateRequest>,
) -> Result<Json<SessionView>, AppError> {
    let mut state = signed_in.handle.lock().await;
    state.navigate(req.page)?;
    Ok(Json(SessionView::from(&*state)))
}

/// GET /api/v1/downloads/:id
pub async fn handle_download(
    signed_in: SignedIn,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let download = signed_in
        .handle
        .lock()
        .await
        .downloads
        .get(&id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Download {id} not found")))?;

    let bytes = tokio::fs::read(&download.path).await.map_err(|e| {
        AppError::Internal(anyhow::anyhow!(
            "download {} unreadable at {}: {e}",
            download.file_name,
            download.path.display()
        ))
    })?;

    attachment(&download.file_name, download.media_type, bytes)
}

/// File body with its media type and an attachment disposition.
pub fn attachment(file_name: &str, media_type: &str, bytes: Vec<u8>) -> Result<Response, AppError> {
    let ascii_name: String = file_name
        .chars()
        .map(|c| if c.is_ascii_graphic() && c != '"' && c != '\\' { c } else { '_' })
        .collect();
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{ascii_name}\""))
        .map_err(|e| AppError::Internal(e.into()))?;
    let content_type =
        HeaderValue::from_str(media_type).map_err(|e| AppError::Internal(e.into()))?;

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

/// GET /api/v1/build-resume
pub async fn handle_build_resume(signed_in: SignedIn) -> Result<Json<serde_json::Value>, AppError> {
    signed_in.enter(Page::BuildResume).await?;
    Ok(Json(serde_json::json!({
        "page": Page::BuildResume,
        "title": Page::BuildResume.title(),
        "status": "work_in_progress",
        "message": "Resume builder is a work in progress. Check back soon."
    })))
}
