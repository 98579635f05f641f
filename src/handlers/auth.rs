use axum::{extract::State, response::Json};
use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use validator::Validate;

use crate::dtos::auth_dtos::{
    AuthResponse, LoginRequest, MessageResponse, SignupRequest, UserResponse,
};
use crate::errors::{AppError, Result};
use crate::models::user::User;
use crate::state::AppState;

/// bcrypt cost applied at registration time. The reset path uses a stronger
/// cost for the replacement credential.
pub const REGISTRATION_COST: u32 = 10;

const TOKEN_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<AuthResponse>> {
    payload.validate()?;

    if state
        .store
        .find_by_user_name(&payload.user_name)
        .await?
        .is_some()
    {
        return Err(AppError::UserAlreadyExists);
    }
    if state.store.find_by_github(&payload.github).await?.is_some() {
        return Err(AppError::UserAlreadyExists);
    }

    let password_hash = hash(&payload.password, REGISTRATION_COST)?;
    let user = User::new(payload.user_name, payload.github, password_hash);
    state.store.insert_user(&user).await?;

    let token = issue_token(&user, &state.config.jwt_secret)?;

    Ok(Json(AuthResponse {
        user: UserResponse::from(&user),
        token,
    }))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let user = state
        .store
        .find_by_github(&payload.github)
        .await?
        .ok_or(AppError::UserNotFound)?;

    if !verify(&payload.password, &user.password)? {
        return Err(AppError::InvalidCredentials);
    }

    let token = issue_token(&user, &state.config.jwt_secret)?;

    Ok(Json(AuthResponse {
        user: UserResponse::from(&user),
        token,
    }))
}

pub async fn logout() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Logged out successfully".to_string(),
    })
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let db_status = match state.store.ping().await {
        Ok(()) => "connected",
        Err(_) => "disconnected",
    };

    Json(json!({
        "status": "ok",
        "database": db_status,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

fn issue_token(user: &User, secret: &str) -> Result<String> {
    let claims = Claims {
        sub: user.id.map(|id| id.to_hex()).unwrap_or_default(),
        exp: (Utc::now().timestamp() + TOKEN_TTL_SECONDS) as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}
