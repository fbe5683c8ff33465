//! Request bodies and small parsing helpers shared by the route handlers.

use axum::{
    extract::{FromRequest, Request},
    http::StatusCode,
    Json,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use ratedesk_core::AccountId;
use ratedesk_ledger::{AdjustDirection, BankDetails, LooseInt};

use crate::app::errors;

/// JSON body extractor whose rejections use the API error schema.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = axum::response::Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_body",
                rejection.body_text(),
            )),
        }
    }
}

/// Account id as sent by clients: a string or a bare JSON number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawUserId {
    Text(String),
    Number(serde_json::Number),
}

impl RawUserId {
    pub fn to_text(&self) -> String {
        match self {
            RawUserId::Text(s) => s.clone(),
            RawUserId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRatingRequest {
    pub user_id: Option<RawUserId>,
    #[serde(default)]
    pub commission: Option<LooseInt>,
    #[serde(default)]
    pub stars: Option<LooseInt>,
    #[serde(default)]
    pub hotel: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawRequest {
    pub user_id: Option<RawUserId>,
    #[serde(default)]
    pub amount: Option<LooseInt>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankDetailsRequest {
    pub user_id: Option<RawUserId>,
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub account_holder: Option<String>,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default, alias = "ifsc")]
    pub routing_code: Option<String>,
}

impl BankDetailsRequest {
    pub fn details(&self) -> BankDetails {
        BankDetails {
            bank_name: self.bank_name.clone(),
            account_holder: self.account_holder.clone(),
            account_number: self.account_number.clone(),
            routing_code: self.routing_code.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustBalanceRequest {
    pub user_id: Option<RawUserId>,
    #[serde(default)]
    pub amount: Option<LooseInt>,
    #[serde(default)]
    pub direction: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetCanRateRequest {
    pub user_id: Option<RawUserId>,
    pub can_rate: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessWithdrawRequest {
    pub user_id: Option<RawUserId>,
}

pub fn require_account_id(raw: Option<&RawUserId>) -> Result<AccountId, axum::response::Response> {
    let raw = raw.ok_or_else(|| errors::json_error(StatusCode::BAD_REQUEST, "missing_user_id", "Missing userId"))?;
    parse_account_id(&raw.to_text())
}

pub fn parse_account_id(raw: &str) -> Result<AccountId, axum::response::Response> {
    AccountId::parse(raw).map_err(errors::domain_error_to_response)
}

pub fn parse_direction(raw: Option<&str>) -> Result<AdjustDirection, axum::response::Response> {
    match raw {
        Some(s) => s.parse().map_err(errors::domain_error_to_response),
        None => Err(errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "direction must be one of: add, cut",
        )),
    }
}
