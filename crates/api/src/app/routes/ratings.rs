use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde_json::json;

use ratedesk_ledger::SubmitRating;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn submit_rating(
    Extension(services): Extension<Arc<AppServices>>,
    dto::JsonBody(body): dto::JsonBody<dto::SubmitRatingRequest>,
) -> axum::response::Response {
    let account_id = match dto::require_account_id(body.user_id.as_ref()) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let cmd = SubmitRating {
        account_id,
        commission: body.commission,
        stars: body.stars,
        hotel: body.hotel,
        occurred_at: Utc::now(),
    };

    match services.run_ledger(move |ledger| ledger.submit_rating(cmd)).await {
        Ok(receipt) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "newTotalEarned": receipt.total_earned,
                "newRatingsDone": receipt.ratings_done,
                "account": receipt.account,
            })),
        )
            .into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
