use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use ratedesk_auth::AuthError;
use ratedesk_core::DomainError;
use ratedesk_ledger::LedgerError;

/// Maps a ledger failure onto the wire.
///
/// Business-rule rejections are ordinary outcomes for the client UI and go out
/// as `200` with `success: false`; malformed input, unknown accounts and
/// storage faults get real status codes.
pub fn ledger_error_to_response(err: LedgerError) -> axum::response::Response {
    let status = match &err {
        LedgerError::InvalidAmount => StatusCode::BAD_REQUEST,
        LedgerError::AccountNotFound(_) => StatusCode::NOT_FOUND,
        LedgerError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::OK,
    };
    json_error(status, err.code(), err.to_string())
}

pub fn auth_error_to_response(err: AuthError) -> axum::response::Response {
    let code = match err {
        AuthError::InvalidCredentials => "invalid_credentials",
        AuthError::MissingToken => "missing_token",
        AuthError::InvalidToken => "invalid_token",
    };
    json_error(StatusCode::UNAUTHORIZED, code, err.to_string())
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "success": false,
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
