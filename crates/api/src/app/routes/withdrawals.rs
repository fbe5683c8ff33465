use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde_json::json;

use ratedesk_ledger::RequestWithdraw;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

/// Moves `amount` from the account's earnings into its pending withdrawal.
pub async fn request_withdraw(
    Extension(services): Extension<Arc<AppServices>>,
    dto::JsonBody(body): dto::JsonBody<dto::WithdrawRequest>,
) -> axum::response::Response {
    let account_id = match dto::require_account_id(body.user_id.as_ref()) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let cmd = RequestWithdraw {
        account_id,
        amount: body.amount,
        occurred_at: Utc::now(),
    };

    match services.run_ledger(move |ledger| ledger.request_withdraw(cmd)).await {
        Ok(account) => (StatusCode::OK, Json(json!({ "success": true, "account": account }))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
