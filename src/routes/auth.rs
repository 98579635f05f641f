use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(crate::handlers::auth::health))
        .route("/signup", post(crate::handlers::auth::signup))
        .route("/login", post(crate::handlers::auth::login))
        .route("/logout", get(crate::handlers::auth::logout))
        .route(
            "/forgot-password",
            post(crate::handlers::password_reset::forgot_password),
        )
        .route(
            "/reset-password",
            post(crate::handlers::password_reset::reset_password),
        )
}
