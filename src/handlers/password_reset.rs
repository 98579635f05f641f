use axum::{extract::State, response::Json};

use crate::dtos::auth_dtos::{
    ForgotPasswordRequest, ForgotPasswordResponse, MessageResponse, ResetPasswordRequest,
};
use crate::errors::Result;
use crate::state::AppState;

/// Acknowledgment returned whether or not the account exists.
pub const RESET_ACK: &str =
    "If an account with those credentials exists, a reset code has been generated.";

pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<Json<ForgotPasswordResponse>> {
    let plaintext = state
        .reset_service
        .initiate(
            payload.github.as_deref().unwrap_or(""),
            payload.user_name.as_deref().unwrap_or(""),
        )
        .await?;

    // The plaintext code belongs to the out-of-band delivery channel, not to
    // this response. The dev-reset-echo build echoes it for local testing.
    let dev_reset_code = if cfg!(feature = "dev-reset-echo") {
        if let Some(code) = plaintext.as_deref() {
            tracing::debug!("reset code issued: {} (expires in 15 min)", code);
        }
        plaintext
    } else {
        None
    };

    Ok(Json(ForgotPasswordResponse {
        message: RESET_ACK.to_string(),
        dev_reset_code,
    }))
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>> {
    state
        .reset_service
        .finalize(
            payload.github.as_deref().unwrap_or(""),
            payload.user_name.as_deref().unwrap_or(""),
            payload.reset_code.as_deref().unwrap_or(""),
            payload.new_password.as_deref().unwrap_or(""),
        )
        .await?;

    Ok(Json(MessageResponse {
        message: "success".to_string(),
    }))
}
