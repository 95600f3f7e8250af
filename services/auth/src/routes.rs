//! Authentication service routes

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use common::{error::StoreError, token::SESSION_COOKIE};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    AppState,
    models::{Credentials, UserResponse},
};

/// Response for user login
#[derive(Serialize)]
pub struct LoginResponse {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub message: String,
}

/// Create the router for the authentication service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "auth-service"
    }))
}

/// User registration endpoint
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<impl IntoResponse, AuthError> {
    let Json(credentials) = payload.map_err(|e| AuthError::BadRequest(e.body_text()))?;
    info!("Registration attempt for user: {}", credentials.username);

    let existing = state
        .user_repository
        .find_by_username(&credentials.username)
        .await
        .map_err(|e| {
            error!("Failed to look up user: {}", e);
            AuthError::InternalServerError
        })?;

    if existing.is_some() {
        return Err(AuthError::Conflict);
    }

    // A concurrent registration can still take the name after the check above
    let user = state
        .user_repository
        .create(&credentials)
        .await
        .map_err(|e| match e.downcast_ref::<StoreError>() {
            Some(StoreError::Conflict { .. }) => AuthError::Conflict,
            _ => {
                error!("Failed to create user: {}", e);
                AuthError::InternalServerError
            }
        })?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// User login endpoint
///
/// Sets the session cookie read by the catalog API.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<impl IntoResponse, AuthError> {
    let Json(credentials) = payload.map_err(|e| AuthError::BadRequest(e.body_text()))?;
    info!("Login attempt for user: {}", credentials.username);

    let user = state
        .user_repository
        .find_by_username(&credentials.username)
        .await
        .map_err(|e| {
            error!("Failed to look up user: {}", e);
            AuthError::InternalServerError
        })?
        .ok_or(AuthError::Unauthorized)?;

    let valid = state
        .user_repository
        .verify_password(&user, &credentials.password)
        .map_err(|e| {
            error!("Failed to verify password: {}", e);
            AuthError::InternalServerError
        })?;

    if !valid {
        warn!("Invalid password for user: {}", credentials.username);
        return Err(AuthError::Unauthorized);
    }

    let token = state.token_service.issue(user.id).map_err(|e| {
        error!("Failed to issue session token: {}", e);
        AuthError::InternalServerError
    })?;

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    let response = LoginResponse {
        user_id: user.id,
        message: "Logged in successfully".to_string(),
    };

    Ok((jar.add(cookie), Json(response)))
}

/// Logout endpoint
///
/// Tokens are stateless: this only drops the cookie from the client.
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    info!("Logout request");

    let jar = jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/"));

    (
        jar,
        Json(serde_json::json!({"message": "Logged out successfully"})),
    )
}

/// Custom error type for authentication errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Username already taken")]
    Conflict,

    #[error("Internal server error")]
    InternalServerError,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AuthError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AuthError::Conflict => (StatusCode::CONFLICT, "Username already taken".to_string()),
            AuthError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error".to_string(),
            ),
        };

        let body = Json(serde_json::json!({
            "message": message,
        }));

        (status, body).into_response()
    }
}
