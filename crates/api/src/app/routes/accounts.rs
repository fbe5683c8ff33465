use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use ratedesk_ledger::SaveBankDetails;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

/// Returns the account, creating it with the starting balance on first sight.
pub async fn get_account(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let account_id = match dto::parse_account_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.run_ledger(move |ledger| ledger.get_or_create_account(&account_id)).await {
        Ok(account) => (StatusCode::OK, Json(json!({ "success": true, "account": account }))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn save_bank_details(
    Extension(services): Extension<Arc<AppServices>>,
    dto::JsonBody(body): dto::JsonBody<dto::BankDetailsRequest>,
) -> axum::response::Response {
    let account_id = match dto::require_account_id(body.user_id.as_ref()) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let cmd = SaveBankDetails {
        account_id,
        details: body.details(),
    };

    match services.run_ledger(move |ledger| ledger.save_bank_details(cmd)).await {
        Ok(account) => (StatusCode::OK, Json(json!({ "success": true, "account": account }))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
