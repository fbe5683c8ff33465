use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use ratedesk_auth::{AdminSessions, AuthError};

use crate::app::errors;

/// Header carrying the admin session token.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

pub async fn admin_auth(
    State(sessions): State<Arc<AdminSessions>>,
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let verified = extract_admin_token(req.headers())
        .and_then(|token| sessions.verify(token, Utc::now()));

    match verified {
        Ok(()) => next.run(req).await,
        Err(e) => errors::auth_error_to_response(e),
    }
}

pub fn extract_admin_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(ADMIN_TOKEN_HEADER)
        .ok_or(AuthError::MissingToken)?;

    let token = value.to_str().map_err(|_| AuthError::InvalidToken)?.trim();
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }

    Ok(token)
}
