//! Session guard for the catalog routes

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use common::token::SESSION_COOKIE;
use tracing::warn;
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

/// Identity of the caller, attached to every request that passed the guard
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Session {
    pub user_id: Uuid,
}

/// Reject requests without a valid session cookie
///
/// On success the verified [`Session`] is added to the request extensions
/// before the handler runs.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = jar.get(SESSION_COOKIE).ok_or(ApiError::Unauthorized)?;

    let claims = state.tokens.verify(token.value()).map_err(|e| {
        warn!("Rejected session token: {}", e);
        ApiError::Unauthorized
    })?;

    req.extensions_mut().insert(Session {
        user_id: claims.user_id,
    });

    Ok(next.run(req).await)
}
