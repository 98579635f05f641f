// src/errors.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("MongoDB error: {0}")]
    MongoDB(#[from] mongodb::error::Error),

    #[error("Hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("{0}")]
    ValidationError(String),

    #[error("Password must be at least 6 characters")]
    WeakPassword,

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("User does not exist")]
    UserNotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid or expired reset request")]
    InvalidResetRequest,

    #[error("Reset code has expired. Please request a new one.")]
    ResetCodeExpired,

    #[error("Too many failed attempts. Please request a new reset code.")]
    TooManyResetAttempts,

    #[error("Invalid reset code. {remaining} attempts remaining.")]
    InvalidResetCode { remaining: i32 },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            // Collaborator failures: log the detail server-side, keep the
            // client message generic.
            AppError::MongoDB(e) => {
                tracing::error!("database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Hashing(e) => {
                tracing::error!("hashing error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Token(e) => {
                tracing::error!("token error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }

            AppError::ValidationError(_)
            | AppError::WeakPassword
            | AppError::UserAlreadyExists
            | AppError::UserNotFound
            | AppError::InvalidCredentials
            | AppError::InvalidResetRequest
            | AppError::ResetCodeExpired
            | AppError::InvalidResetCode { .. } => (StatusCode::BAD_REQUEST, self.to_string()),

            AppError::TooManyResetAttempts => (StatusCode::TOO_MANY_REQUESTS, self.to_string()),
        };

        let body = Json(json!({ "message": message }));

        (status, body).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
