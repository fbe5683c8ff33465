//! The full ledger state and its read-only views.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use ratedesk_core::AccountId;

use crate::account::{BankDetails, UserAccount};
use crate::entry::{EntryKind, LedgerEntry};
use crate::settings::PlatformSettings;

/// Everything the platform persists: settings plus every known account.
///
/// Accounts iterate in identifier order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerBook {
    #[serde(default)]
    pub settings: PlatformSettings,
    #[serde(default, alias = "users")]
    accounts: BTreeMap<AccountId, UserAccount>,
}

/// An account with an outstanding payout request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingWithdraw {
    pub user_id: AccountId,
    pub pending_withdraw: i64,
    pub bank: Option<BankDetails>,
}

/// One history entry tagged with its owning account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingHistoryRow {
    pub user_id: AccountId,
    #[serde(flatten)]
    pub entry: LedgerEntry,
}

/// Dashboard totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStats {
    pub total_users: usize,
    pub total_ratings: usize,
    pub total_earnings: i64,
    pub total_pending_withdraw: i64,
}

impl LedgerBook {
    pub fn new(settings: PlatformSettings) -> Self {
        Self {
            settings,
            accounts: BTreeMap::new(),
        }
    }

    pub fn account(&self, id: &AccountId) -> Option<&UserAccount> {
        self.accounts.get(id)
    }

    pub fn accounts(&self) -> impl Iterator<Item = (&AccountId, &UserAccount)> {
        self.accounts.iter()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub(crate) fn account_mut(&mut self, id: &AccountId) -> Option<&mut UserAccount> {
        self.accounts.get_mut(id)
    }

    pub(crate) fn accounts_mut(&mut self) -> impl Iterator<Item = &mut UserAccount> {
        self.accounts.values_mut()
    }

    /// Returns the account, inserting `make()` first if the id is unseen.
    /// The flag is `true` when the account was just created.
    pub(crate) fn get_or_insert_with(
        &mut self,
        id: &AccountId,
        make: impl FnOnce() -> UserAccount,
    ) -> (&mut UserAccount, bool) {
        let created = !self.accounts.contains_key(id);
        let account = self.accounts.entry(id.clone()).or_insert_with(make);
        (account, created)
    }

    /// Accounts with `pending_withdraw > 0`, paired with their bank details.
    pub fn pending_withdraws(&self) -> Vec<PendingWithdraw> {
        self.accounts
            .iter()
            .filter(|(_, a)| a.pending_withdraw > 0)
            .map(|(id, a)| PendingWithdraw {
                user_id: id.clone(),
                pending_withdraw: a.pending_withdraw,
                bank: a.bank_details.clone(),
            })
            .collect()
    }

    /// All `rating` and `admin_add` entries, account by account, in append
    /// order within each account (not re-sorted by timestamp).
    pub fn rating_history(&self) -> Vec<RatingHistoryRow> {
        const KINDS: [EntryKind; 2] = [EntryKind::Rating, EntryKind::AdminAdd];

        self.accounts
            .iter()
            .flat_map(|(id, a)| {
                a.entries_of(&KINDS).map(move |entry| RatingHistoryRow {
                    user_id: id.clone(),
                    entry: entry.clone(),
                })
            })
            .collect()
    }

    pub fn stats(&self) -> PlatformStats {
        let mut stats = PlatformStats {
            total_users: self.accounts.len(),
            ..PlatformStats::default()
        };

        for account in self.accounts.values() {
            stats.total_pending_withdraw = stats.total_pending_withdraw.saturating_add(account.pending_withdraw);
            for entry in account.history() {
                match entry.kind() {
                    EntryKind::Rating => {
                        stats.total_ratings += 1;
                        stats.total_earnings = stats.total_earnings.saturating_add(entry.amount());
                    }
                    EntryKind::AdminAdd => {
                        stats.total_earnings = stats.total_earnings.saturating_add(entry.amount());
                    }
                    _ => {}
                }
            }
        }

        stats
    }
}
