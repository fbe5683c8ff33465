//! Ledger commands (inputs to [`crate::Ledger`] operations).

use chrono::{DateTime, Utc};
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use ratedesk_core::{AccountId, DomainError};

use crate::account::BankDetails;
use crate::input::LooseInt;

/// Command: SubmitRating.
///
/// `commission` and `stars` are taken as sent by the client and coerced by
/// the ledger (non-numeric → 0).
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitRating {
    pub account_id: AccountId,
    pub commission: Option<LooseInt>,
    pub stars: Option<LooseInt>,
    pub hotel: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RequestWithdraw.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestWithdraw {
    pub account_id: AccountId,
    pub amount: Option<LooseInt>,
    pub occurred_at: DateTime<Utc>,
}

/// Direction of an admin balance adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustDirection {
    Add,
    Cut,
}

impl FromStr for AdjustDirection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "add" => Ok(AdjustDirection::Add),
            "cut" => Ok(AdjustDirection::Cut),
            other => Err(DomainError::validation(format!(
                "direction must be one of: add, cut (got '{other}')"
            ))),
        }
    }
}

/// Command: AdminAdjustBalance.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustBalance {
    pub account_id: AccountId,
    pub amount: Option<LooseInt>,
    pub direction: AdjustDirection,
    pub occurred_at: DateTime<Utc>,
}

/// Command: SaveBankDetails.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveBankDetails {
    pub account_id: AccountId,
    pub details: BankDetails,
}
