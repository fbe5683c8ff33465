use thiserror::Error;

use ratedesk_core::AccountId;

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Failures of ledger operations.
///
/// Everything except [`LedgerError::StorageUnavailable`] is a business-rule
/// rejection: recoverable, reported back to the caller, and guaranteed to
/// leave the book untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("ratings are currently disabled")]
    RatingsDisabledGlobally,

    #[error("rating disabled by admin")]
    RatingsDisabledForUser,

    #[error("max {cap} ratings done today")]
    DailyCapReached { cap: u32 },

    #[error("balance must be at least {floor} to give ratings")]
    InsufficientBalance { floor: i64 },

    #[error("invalid amount")]
    InvalidAmount,

    #[error("not enough earnings")]
    InsufficientEarnings,

    #[error("withdrawals are currently disabled")]
    WithdrawDisabledGlobally,

    #[error("no pending withdraw for user")]
    NoPendingWithdraw,

    #[error("account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl LedgerError {
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::StorageUnavailable(msg.into())
    }

    /// Stable machine-readable code (snake_case) for transport layers.
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::RatingsDisabledGlobally => "ratings_disabled_globally",
            LedgerError::RatingsDisabledForUser => "ratings_disabled_for_user",
            LedgerError::DailyCapReached { .. } => "daily_cap_reached",
            LedgerError::InsufficientBalance { .. } => "insufficient_balance",
            LedgerError::InvalidAmount => "invalid_amount",
            LedgerError::InsufficientEarnings => "insufficient_earnings",
            LedgerError::WithdrawDisabledGlobally => "withdraw_disabled_globally",
            LedgerError::NoPendingWithdraw => "no_pending_withdraw",
            LedgerError::AccountNotFound(_) => "account_not_found",
            LedgerError::StorageUnavailable(_) => "storage_unavailable",
        }
    }

    /// `true` for rule rejections, `false` for infrastructure faults.
    pub fn is_business_rule(&self) -> bool {
        !matches!(self, LedgerError::StorageUnavailable(_))
    }
}
