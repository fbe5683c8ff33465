use serde::{Deserialize, Serialize};

use crate::entry::{EntryKind, LedgerEntry};

/// Payout destination supplied by the account holder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BankDetails {
    pub bank_name: Option<String>,
    pub account_holder: Option<String>,
    pub account_number: Option<String>,
    #[serde(alias = "ifsc")]
    pub routing_code: Option<String>,
}

impl BankDetails {
    pub fn is_empty(&self) -> bool {
        self.bank_name.is_none()
            && self.account_holder.is_none()
            && self.account_number.is_none()
            && self.routing_code.is_none()
    }
}

/// Per-user reward account.
///
/// `history` is append-only: entries are pushed through [`UserAccount::record`]
/// and never edited or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub balance: i64,
    #[serde(default)]
    pub total_earned: i64,
    #[serde(default, alias = "ratingCount")]
    pub ratings_done: u32,
    #[serde(default)]
    pub pending_withdraw: i64,
    #[serde(default = "default_can_rate")]
    pub can_rate: bool,
    #[serde(default)]
    pub bank_details: Option<BankDetails>,
    #[serde(default)]
    history: Vec<LedgerEntry>,
}

fn default_can_rate() -> bool {
    true
}

impl UserAccount {
    pub fn new(starting_balance: i64) -> Self {
        Self {
            balance: starting_balance.max(0),
            total_earned: 0,
            ratings_done: 0,
            pending_withdraw: 0,
            can_rate: true,
            bank_details: None,
            history: Vec::new(),
        }
    }

    pub fn history(&self) -> &[LedgerEntry] {
        &self.history
    }

    pub(crate) fn record(&mut self, entry: LedgerEntry) {
        self.history.push(entry);
    }

    /// Entries of the given kinds, in append order.
    pub fn entries_of<'a>(
        &'a self,
        kinds: &'a [EntryKind],
    ) -> impl Iterator<Item = &'a LedgerEntry> + 'a {
        self.history.iter().filter(move |e| kinds.contains(&e.kind()))
    }

    /// Credit `amount` to both the balance and withdrawable earnings.
    ///
    /// Returns `false` and leaves the account untouched if either total
    /// would overflow.
    #[must_use]
    pub(crate) fn credit(&mut self, amount: i64) -> bool {
        match (
            self.balance.checked_add(amount),
            self.total_earned.checked_add(amount),
        ) {
            (Some(balance), Some(total_earned)) => {
                self.balance = balance;
                self.total_earned = total_earned;
                true
            }
            _ => false,
        }
    }

    /// Debit the balance, clamped at zero. Returns what was actually removed.
    pub(crate) fn debit_balance(&mut self, amount: i64) -> i64 {
        let removed = amount.min(self.balance).max(0);
        self.balance -= removed;
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_account_has_defaults() {
        let acct = UserAccount::new(9_000);
        assert_eq!(acct.balance, 9_000);
        assert_eq!(acct.total_earned, 0);
        assert_eq!(acct.ratings_done, 0);
        assert_eq!(acct.pending_withdraw, 0);
        assert!(acct.can_rate);
        assert!(acct.bank_details.is_none());
        assert!(acct.history().is_empty());
    }

    #[test]
    fn debit_balance_clamps_at_zero() {
        let mut acct = UserAccount::new(200);
        assert_eq!(acct.debit_balance(500), 200);
        assert_eq!(acct.balance, 0);
        assert_eq!(acct.debit_balance(10), 0);
        assert_eq!(acct.balance, 0);
    }

    #[test]
    fn credit_refuses_to_overflow() {
        let mut acct = UserAccount::new(9_000);
        assert!(!acct.credit(i64::MAX));
        assert_eq!(acct.balance, 9_000);
        assert_eq!(acct.total_earned, 0);

        assert!(acct.credit(i64::MAX - 9_000));
        assert_eq!(acct.balance, i64::MAX);
        assert!(!acct.credit(1));
        assert_eq!(acct.total_earned, i64::MAX - 9_000);
    }

    #[test]
    fn legacy_records_fill_in_missing_fields() {
        let json = r#"{
            "balance": 9100,
            "ratingCount": 3,
            "bankDetails": {"bankName": "SBI", "ifsc": "SBIN0001"}
        }"#;
        let acct: UserAccount = serde_json::from_str(json).unwrap();
        assert_eq!(acct.ratings_done, 3);
        assert!(acct.can_rate);
        assert_eq!(acct.total_earned, 0);
        let bank = acct.bank_details.unwrap();
        assert_eq!(bank.routing_code.as_deref(), Some("SBIN0001"));
    }

    #[test]
    fn serializes_camel_case_fields() {
        let json = serde_json::to_value(UserAccount::new(9_000)).unwrap();
        for key in ["balance", "totalEarned", "ratingsDone", "pendingWithdraw", "canRate", "bankDetails", "history"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }
}
