//! Admin panel endpoints. Everything except `login` sits behind
//! [`crate::middleware::admin_auth`].

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde_json::json;

use ratedesk_ledger::{AdjustBalance, UserAccount};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::middleware::extract_admin_token;

pub fn router() -> Router {
    Router::new()
        .route("/logout", post(logout))
        .route("/accounts", get(list_accounts))
        .route("/settings", get(get_settings))
        .route("/settings/toggle-rating", post(toggle_rating))
        .route("/settings/toggle-withdraw", post(toggle_withdraw))
        .route("/stats", get(stats))
        .route("/ratings", get(rating_history))
        .route("/withdrawals", get(pending_withdrawals))
        .route("/withdrawals/process", post(process_withdraw))
        .route("/balance", post(adjust_balance))
        .route("/can-rate", post(set_can_rate))
        .route("/reset-ratings", post(reset_ratings))
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    dto::JsonBody(body): dto::JsonBody<dto::AdminLoginRequest>,
) -> axum::response::Response {
    match services.sessions.login(&body.username, &body.password, Utc::now()) {
        Ok(session) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "token": session.token.as_str(),
                "expiresAt": session.expires_at,
            })),
        )
            .into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}

pub async fn logout(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> axum::response::Response {
    let result = extract_admin_token(&headers).and_then(|token| services.sessions.logout(token, Utc::now()));
    match result {
        Ok(()) => (StatusCode::OK, Json(json!({ "success": true }))).into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}

pub async fn list_accounts(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.run_ledger(|ledger| ledger.list_accounts()).await {
        Ok(accounts) => {
            let accounts = accounts
                .into_iter()
                .map(|(id, account)| (id.to_string(), account))
                .collect::<BTreeMap<String, UserAccount>>();
            (StatusCode::OK, Json(json!({ "success": true, "accounts": accounts }))).into_response()
        }
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn get_settings(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.run_ledger(|ledger| ledger.settings()).await {
        Ok(settings) => (StatusCode::OK, Json(json!({ "success": true, "settings": settings }))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn toggle_rating(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.run_ledger(|ledger| ledger.toggle_rating_enabled()).await {
        Ok(settings) => (StatusCode::OK, Json(json!({ "success": true, "settings": settings }))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn toggle_withdraw(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.run_ledger(|ledger| ledger.toggle_withdraw_enabled()).await {
        Ok(settings) => (StatusCode::OK, Json(json!({ "success": true, "settings": settings }))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn stats(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.run_ledger(|ledger| ledger.stats()).await {
        Ok(stats) => (StatusCode::OK, Json(json!({ "success": true, "stats": stats }))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn rating_history(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.run_ledger(|ledger| ledger.list_rating_history()).await {
        Ok(ratings) => (StatusCode::OK, Json(json!({ "success": true, "ratings": ratings }))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn pending_withdrawals(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.run_ledger(|ledger| ledger.list_pending_withdraws()).await {
        Ok(withdrawals) => {
            (StatusCode::OK, Json(json!({ "success": true, "withdrawals": withdrawals }))).into_response()
        }
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn process_withdraw(
    Extension(services): Extension<Arc<AppServices>>,
    dto::JsonBody(body): dto::JsonBody<dto::ProcessWithdrawRequest>,
) -> axum::response::Response {
    let account_id = match dto::require_account_id(body.user_id.as_ref()) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.run_ledger(move |ledger| ledger.process_withdraw(&account_id, Utc::now())).await {
        Ok(account) => (StatusCode::OK, Json(json!({ "success": true, "account": account }))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn adjust_balance(
    Extension(services): Extension<Arc<AppServices>>,
    dto::JsonBody(body): dto::JsonBody<dto::AdjustBalanceRequest>,
) -> axum::response::Response {
    let account_id = match dto::require_account_id(body.user_id.as_ref()) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let direction = match dto::parse_direction(body.direction.as_deref()) {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    let cmd = AdjustBalance {
        account_id,
        amount: body.amount,
        direction,
        occurred_at: Utc::now(),
    };

    match services.run_ledger(move |ledger| ledger.adjust_balance(cmd)).await {
        Ok(account) => (StatusCode::OK, Json(json!({ "success": true, "account": account }))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn set_can_rate(
    Extension(services): Extension<Arc<AppServices>>,
    dto::JsonBody(body): dto::JsonBody<dto::SetCanRateRequest>,
) -> axum::response::Response {
    let account_id = match dto::require_account_id(body.user_id.as_ref()) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Some(can_rate) = body.can_rate else {
        return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", "canRate must be a boolean");
    };

    match services.run_ledger(move |ledger| ledger.set_can_rate(&account_id, can_rate)).await {
        Ok(account) => (StatusCode::OK, Json(json!({ "success": true, "account": account }))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn reset_ratings(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.run_ledger(|ledger| ledger.reset_all_rating_counts()).await {
        Ok(reset) => (StatusCode::OK, Json(json!({ "success": true, "reset": reset }))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
