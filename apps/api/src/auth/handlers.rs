use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::admins::find_admin_by_username;
use crate::auth::password::verify_password;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    pub username: String,
    pub email: String,
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let username = req.username.trim();
    if username.is_empty() || req.password.is_empty() {
        return Err(AppError::Validation(
            "Username and password are required".to_string(),
        ));
    }

    let admin = find_admin_by_username(&state.db, username).await?;

    // Unknown users and wrong passwords are indistinguishable to the caller.
    let Some(admin) = admin else {
        warn!("Login attempt for unknown admin '{username}'");
        return Err(AppError::Unauthorized);
    };

    let password = req.password;
    let hash = admin.password_hash.clone();
    let valid = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("password check panicked: {e}")))?;
    if !valid {
        warn!("Invalid password for admin '{username}'");
        return Err(AppError::Unauthorized);
    }

    let access_token = state
        .tokens
        .issue(&admin.username)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to sign token: {e}")))?;

    info!("Admin '{}' logged in", admin.username);

    Ok(Json(LoginResponse {
        access_token,
        token_type: "Bearer",
        expires_in: state.tokens.ttl_secs(),
        username: admin.username,
        email: admin.email,
    }))
}
