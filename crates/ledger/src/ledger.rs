use chrono::{DateTime, Utc};

use ratedesk_core::AccountId;

use crate::account::{BankDetails, UserAccount};
use crate::book::LedgerBook;
use crate::command::{AdjustBalance, AdjustDirection, RequestWithdraw, SaveBankDetails, SubmitRating};
use crate::entry::LedgerEntry;
use crate::error::{LedgerError, LedgerResult};
use crate::input::LooseInt;
use crate::settings::{LedgerRules, PlatformSettings};

const UNKNOWN_HOTEL: &str = "Unknown";

/// Result of [`Ledger::get_or_create_account`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountLookup {
    pub account: UserAccount,
    /// `true` when this call created the account.
    pub created: bool,
}

/// Result of a successful [`Ledger::submit_rating`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingReceipt {
    pub total_earned: i64,
    pub ratings_done: u32,
    pub account: UserAccount,
}

/// Business rules applied to a [`LedgerBook`].
///
/// Every operation is a single read-modify-write over the book. A rejected
/// operation returns before touching any field, except that a lazily created
/// account may remain in the book (callers discard the book on error).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ledger {
    rules: LedgerRules,
}

impl Ledger {
    pub fn new(rules: LedgerRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &LedgerRules {
        &self.rules
    }

    fn open<'b>(&self, book: &'b mut LedgerBook, id: &AccountId) -> (&'b mut UserAccount, bool) {
        let starting_balance = self.rules.starting_balance;
        book.get_or_insert_with(id, || UserAccount::new(starting_balance))
    }

    pub fn get_or_create_account(&self, book: &mut LedgerBook, id: &AccountId) -> AccountLookup {
        let (account, created) = self.open(book, id);
        AccountLookup {
            account: account.clone(),
            created,
        }
    }

    /// Preconditions, first failure wins: global switch, per-user switch,
    /// daily cap, eligibility floor.
    pub fn submit_rating(&self, book: &mut LedgerBook, cmd: &SubmitRating) -> LedgerResult<RatingReceipt> {
        let rating_enabled = book.settings.rating_enabled;
        let (account, _) = self.open(book, &cmd.account_id);

        if !rating_enabled {
            return Err(LedgerError::RatingsDisabledGlobally);
        }
        if !account.can_rate {
            return Err(LedgerError::RatingsDisabledForUser);
        }
        if account.ratings_done >= self.rules.daily_cap {
            return Err(LedgerError::DailyCapReached {
                cap: self.rules.daily_cap,
            });
        }
        if account.balance < self.rules.eligibility_floor {
            return Err(LedgerError::InsufficientBalance {
                floor: self.rules.eligibility_floor,
            });
        }

        let commission = LooseInt::or_zero(cmd.commission.as_ref()).max(0);
        let stars = LooseInt::or_zero(cmd.stars.as_ref());
        let hotel = cmd
            .hotel
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .unwrap_or(UNKNOWN_HOTEL)
            .to_string();

        if !account.credit(commission) {
            return Err(LedgerError::InvalidAmount);
        }
        account.ratings_done += 1;
        account.record(LedgerEntry::Rating {
            time: cmd.occurred_at,
            hotel,
            stars,
            amount: commission,
        });

        Ok(RatingReceipt {
            total_earned: account.total_earned,
            ratings_done: account.ratings_done,
            account: account.clone(),
        })
    }

    pub fn request_withdraw(&self, book: &mut LedgerBook, cmd: &RequestWithdraw) -> LedgerResult<UserAccount> {
        let withdraw_enabled = book.settings.withdraw_enabled;
        let (account, _) = self.open(book, &cmd.account_id);

        if self.rules.enforce_withdraw_toggle && !withdraw_enabled {
            return Err(LedgerError::WithdrawDisabledGlobally);
        }

        let amount = positive_amount(cmd.amount.as_ref())?;
        if amount > account.total_earned {
            return Err(LedgerError::InsufficientEarnings);
        }

        let pending = account
            .pending_withdraw
            .checked_add(amount)
            .ok_or(LedgerError::InvalidAmount)?;
        account.total_earned -= amount;
        account.pending_withdraw = pending;
        account.record(LedgerEntry::WithdrawRequest {
            time: cmd.occurred_at,
            amount,
        });

        Ok(account.clone())
    }

    /// Settles the whole outstanding request. Never creates the account.
    pub fn process_withdraw(
        &self,
        book: &mut LedgerBook,
        id: &AccountId,
        occurred_at: DateTime<Utc>,
    ) -> LedgerResult<UserAccount> {
        let account = book
            .account_mut(id)
            .ok_or_else(|| LedgerError::AccountNotFound(id.clone()))?;

        let amount = account.pending_withdraw;
        if amount <= 0 {
            return Err(LedgerError::NoPendingWithdraw);
        }

        account.record(LedgerEntry::WithdrawProcessed {
            time: occurred_at,
            amount,
            note: "Processed by admin".to_string(),
        });
        account.pending_withdraw = 0;

        Ok(account.clone())
    }

    /// `add` credits balance and earnings; `cut` debits the balance only,
    /// clamped at zero. The `admin_cut` entry records what was removed.
    pub fn adjust_balance(&self, book: &mut LedgerBook, cmd: &AdjustBalance) -> LedgerResult<UserAccount> {
        let amount = positive_amount(cmd.amount.as_ref())?;
        let (account, _) = self.open(book, &cmd.account_id);

        match cmd.direction {
            AdjustDirection::Add => {
                if !account.credit(amount) {
                    return Err(LedgerError::InvalidAmount);
                }
                account.record(LedgerEntry::AdminAdd {
                    time: cmd.occurred_at,
                    amount,
                    note: "Added by admin".to_string(),
                });
            }
            AdjustDirection::Cut => {
                let removed = account.debit_balance(amount);
                account.record(LedgerEntry::AdminCut {
                    time: cmd.occurred_at,
                    amount: removed,
                    note: "Cut by admin".to_string(),
                });
            }
        }

        Ok(account.clone())
    }

    pub fn set_can_rate(&self, book: &mut LedgerBook, id: &AccountId, can_rate: bool) -> UserAccount {
        let (account, _) = self.open(book, id);
        account.can_rate = can_rate;
        account.clone()
    }

    pub fn save_bank_details(&self, book: &mut LedgerBook, cmd: &SaveBankDetails) -> UserAccount {
        let (account, _) = self.open(book, &cmd.account_id);
        let details = normalize_bank_details(&cmd.details);
        account.bank_details = (!details.is_empty()).then_some(details);
        account.clone()
    }

    pub fn toggle_rating_enabled(&self, book: &mut LedgerBook) -> PlatformSettings {
        book.settings.rating_enabled = !book.settings.rating_enabled;
        book.settings
    }

    pub fn toggle_withdraw_enabled(&self, book: &mut LedgerBook) -> PlatformSettings {
        book.settings.withdraw_enabled = !book.settings.withdraw_enabled;
        book.settings
    }

    /// Zeroes `ratings_done` everywhere. Returns the number of accounts touched.
    pub fn reset_all_rating_counts(&self, book: &mut LedgerBook) -> usize {
        let mut n = 0;
        for account in book.accounts_mut() {
            account.ratings_done = 0;
            n += 1;
        }
        n
    }
}

fn positive_amount(raw: Option<&LooseInt>) -> LedgerResult<i64> {
    match raw.and_then(LooseInt::to_int) {
        Some(v) if v > 0 => Ok(v),
        _ => Err(LedgerError::InvalidAmount),
    }
}

fn normalize_bank_details(details: &BankDetails) -> BankDetails {
    fn clean(v: &Option<String>) -> Option<String> {
        v.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    BankDetails {
        bank_name: clean(&details.bank_name),
        account_holder: clean(&details.account_holder),
        account_number: clean(&details.account_number),
        routing_code: clean(&details.routing_code),
    }
}
