use serde::{Deserialize, Serialize};

/// Process-wide feature switches, flipped only by admin toggles.
///
/// These gate the two public mutating operations for everyone, independent
/// of the per-account `can_rate` override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlatformSettings {
    pub rating_enabled: bool,
    pub withdraw_enabled: bool,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            rating_enabled: true,
            withdraw_enabled: true,
        }
    }
}

/// Tunable constants of the reward ruleset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerRules {
    /// Balance of a freshly created account.
    pub starting_balance: i64,
    /// Ratings allowed per period before `DailyCapReached`.
    pub daily_cap: u32,
    /// Minimum balance required to submit a rating.
    pub eligibility_floor: i64,
    /// Whether `withdraw_enabled = false` blocks withdrawal requests.
    pub enforce_withdraw_toggle: bool,
}

impl Default for LedgerRules {
    fn default() -> Self {
        Self {
            starting_balance: 9_000,
            daily_cap: 25,
            eligibility_floor: 8_500,
            enforce_withdraw_toggle: true,
        }
    }
}
