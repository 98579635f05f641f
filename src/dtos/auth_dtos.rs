use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::user::User;

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[serde(rename = "userName")]
    #[validate(length(min = 1, message = "Display name is required"))]
    pub user_name: String,

    #[validate(length(min = 1, message = "GitHub username is required"))]
    pub github: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub github: String,
    pub password: String,
}

// The reset request fields are optional at the serde level so a missing
// field surfaces as our own 400 validation answer instead of a body
// rejection from the extractor.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub github: Option<String>,

    #[serde(rename = "userName", default)]
    pub user_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub github: Option<String>,

    #[serde(rename = "userName", default)]
    pub user_name: Option<String>,

    #[serde(rename = "resetCode", default)]
    pub reset_code: Option<String>,

    #[serde(rename = "newPassword", default)]
    pub new_password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ForgotPasswordResponse {
    pub message: String,

    /// Development-only echo of the plaintext code, compiled in solely by
    /// the `dev-reset-echo` feature.
    #[serde(rename = "devResetCode", skip_serializing_if = "Option::is_none")]
    pub dev_reset_code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    #[serde(rename = "userName")]
    pub user_name: String,
    pub github: String,
    pub image: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        UserResponse {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            user_name: user.user_name.clone(),
            github: user.github.clone(),
            image: user.image.clone(),
        }
    }
}
