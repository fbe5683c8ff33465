use axum::{
    routing::{get, post},
    Router,
};

pub mod accounts;
pub mod admin;
pub mod ratings;
pub mod system;
pub mod withdrawals;

/// Routes open to account holders (no admin session).
pub fn public_router() -> Router {
    Router::new()
        .route("/api/accounts/:id", get(accounts::get_account))
        .route("/api/bank-details", post(accounts::save_bank_details))
        .route("/api/ratings", post(ratings::submit_rating))
        .route("/api/withdrawals", post(withdrawals::request_withdraw))
}
