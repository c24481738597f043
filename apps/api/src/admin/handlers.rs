use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::user::{Credential, Role};
use crate::session::controller::Page;
use crate::session::env_file::{write_token, EnvFileError};
use crate::session::extract::AdminSession;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AddUserRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Serialize)]
pub struct AddUserResponse {
    pub username: String,
    pub role: Role,
}

#[derive(Deserialize)]
pub struct AddTokenRequest {
    pub token: String,
}

#[derive(Serialize)]
pub struct TokenList {
    pub tokens: Vec<String>,
}

/// POST /api/v1/admin/users
pub async fn handle_add_user(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Json(req): Json<AddUserRequest>,
) -> Result<(StatusCode, Json<AddUserResponse>), AppError> {
    admin.enter(Page::Admin).await?;

    let username = req.username.trim().to_string();
    if username.is_empty() || req.password.is_empty() {
        return Err(AppError::Validation(
            "Please enter both username and password.".to_string(),
        ));
    }

    let cost = state.config.bcrypt_cost;
    let password = req.password;
    let password_hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .map_err(|e| AppError::Internal(e.into()))?;

    admin.handle.lock().await.users.insert(Credential {
        username: username.clone(),
        password_hash,
        role: req.role,
    });
    info!(
        "Admin '{}' added user '{username}' ({:?})",
        admin.user.username, req.role
    );

    Ok((
        StatusCode::CREATED,
        Json(AddUserResponse {
            username,
            role: req.role,
        }),
    ))
}

/// POST /api/v1/admin/tokens
pub async fn handle_add_token(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Json(req): Json<AddTokenRequest>,
) -> Result<(StatusCode, Json<TokenList>), AppError> {
    admin.enter(Page::Admin).await?;

    let token = req.token.trim().to_string();
    if token.is_empty() {
        return Err(AppError::Validation("Please enter a token.".to_string()));
    }

    let env_file = state.config.env_file.clone();
    let to_write = token.clone();
    tokio::task::spawn_blocking(move || write_token(&env_file, &to_write))
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .map_err(|e| match e {
            EnvFileError::InvalidToken => {
                AppError::Validation(format!("Token could not be saved: {e}"))
            }
            EnvFileError::Io(_) => AppError::Internal(e.into()),
        })?;

    let mut session = admin.handle.lock().await;
    session.tokens.push(format!("Bearer {token}"));
    info!("Admin '{}' added a token", admin.user.username);

    Ok((
        StatusCode::CREATED,
        Json(TokenList {
            tokens: session.tokens.clone(),
        }),
    ))
}

/// GET /api/v1/admin/tokens
pub async fn handle_list_tokens(
    AdminSession(admin): AdminSession,
) -> Result<Json<TokenList>, AppError> {
    admin.enter(Page::Admin).await?;
    let tokens = admin.handle.lock().await.tokens.clone();
    Ok(Json(TokenList { tokens }))
}
